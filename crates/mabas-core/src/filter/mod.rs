//! Image filters: resampling, intensity thresholds, smoothing, label clean-up
//! and weighted label fusion.

pub mod resample;
pub mod intensity;
pub mod gaussian;
pub mod label;
pub mod vote;

pub use resample::ResampleImageFilter;
pub use intensity::{normalize_by_max, ThresholdFilter, PROBABILITY_CEILING, PROBABILITY_FLOOR};
pub use gaussian::GaussianFilter;
pub use label::clean_probability_map;
pub use vote::{LocalWeightedVote, VoteError};

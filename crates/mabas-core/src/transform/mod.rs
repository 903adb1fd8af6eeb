//! Spatial transforms applied by the in-process resampler.

pub mod trait_;
pub mod displacement_field;

pub use trait_::Transform;
pub use displacement_field::DisplacementField;

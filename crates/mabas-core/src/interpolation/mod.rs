//! Interpolation of volume values at continuous indices.
//!
//! The resampler picks an interpolator from an [`InterpolationOrder`]:
//! 0 is nearest neighbour, 1 is trilinear, 2 and above use a cubic B-spline
//! kernel.

pub mod trait_;
pub mod nearest;
pub mod linear;
pub mod bspline;
pub mod order;

pub use trait_::Interpolator;
pub use nearest::NearestNeighborInterpolator;
pub use linear::LinearInterpolator;
pub use bspline::BSplineInterpolator;
pub use order::{InterpolationOrder, InterpolatorKind};

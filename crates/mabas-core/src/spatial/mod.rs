//! Spatial types for image geometry: points, vectors, spacing and direction.
//!
//! All types wrap nalgebra statics and use `(x, y, z)` component order.

pub mod point;
pub mod vector;
pub mod direction;

pub use point::Point;
pub use vector::{Spacing, Vector};
pub use direction::Direction;

pub type Point3 = Point<3>;
pub type Vector3 = Vector<3>;
pub type Spacing3 = Spacing<3>;
pub type Direction3 = Direction<3>;

/// Absolute tolerance used when comparing geometry read back from disk.
///
/// NIfTI stores the affine in single precision.
pub const GEOMETRY_TOLERANCE: f64 = 1e-4;

//! Core types for the MABAS registration tools.
//!
//! Images are burn tensors tagged with physical geometry and a storage pixel
//! type. Parameter maps describe elastix configurations. The interpolation,
//! transform and filter modules make up the in-process displacement-field
//! resampler.

pub mod image;
pub mod spatial;
pub mod transform;
pub mod interpolation;
pub mod filter;
pub mod parameter;

pub use image::{Image, ImageKind, ImageMetadata, PixelType};
pub use spatial::{Direction, Point, Spacing, Vector};
pub use interpolation::{InterpolationOrder, InterpolatorKind};
pub use parameter::{ParameterMap, ParameterOverrides, ParameterParseError};
pub use transform::{DisplacementField, Transform};

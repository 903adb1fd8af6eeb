//! Image types and operations.
//!
//! An [`Image`] is a float tensor plus the physical geometry of its voxels
//! and the pixel type it is stored as on disk.

pub mod image;
pub mod metadata;
pub mod grid;
pub mod pixel;
pub mod kind;

pub use image::Image;
pub use metadata::ImageMetadata;
pub use grid::{generate_grid_3d, inside_buffer_mask};
pub use pixel::{PixelType, F32_EXACT_INTEGER_LIMIT};
pub use kind::ImageKind;

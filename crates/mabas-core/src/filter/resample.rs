//! Resample image filter.
//!
//! [`ResampleImageFilter`] pulls values from an input image onto a reference
//! grid: every output voxel centre is mapped to physical space, sent through
//! the transform, and sampled from the input with the interpolator.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use burn::tensor::{Shape, Tensor};
use crate::image::{generate_grid_3d, inside_buffer_mask, Image, ImageMetadata, PixelType};
use crate::interpolation::Interpolator;
use crate::transform::Transform;

/// Resample filter over a fixed output grid.
///
/// The transform maps output physical points to input physical points.
/// Samples that land outside the input buffer take the default pixel value.
/// The output is Float32; callers apply their own pixel type policy.
pub struct ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B>,
    I: Interpolator<B>,
{
    shape: [usize; 3],
    metadata: ImageMetadata<3>,
    transform: T,
    interpolator: I,
    default_pixel_value: f64,
    _phantom: PhantomData<B>,
}

impl<B, T, I> ResampleImageFilter<B, T, I>
where
    B: Backend,
    T: Transform<B>,
    I: Interpolator<B>,
{
    /// `shape` is the output tensor shape (`[Z, Y, X]`).
    pub fn new(shape: [usize; 3], metadata: ImageMetadata<3>, transform: T, interpolator: I) -> Self {
        Self {
            shape,
            metadata,
            transform,
            interpolator,
            default_pixel_value: 0.0,
            _phantom: PhantomData,
        }
    }

    /// Output grid taken from a reference image.
    pub fn new_from_reference(reference: &Image<B, 3>, transform: T, interpolator: I) -> Self {
        Self::new(reference.shape(), *reference.metadata(), transform, interpolator)
    }

    pub fn with_default_pixel_value(mut self, value: f64) -> Self {
        self.default_pixel_value = value;
        self
    }

    pub fn default_pixel_value(&self) -> f64 {
        self.default_pixel_value
    }

    /// Resample with the configured default pixel value.
    pub fn apply(&self, input: &Image<B, 3>) -> Image<B, 3> {
        self.apply_with_default(input, self.default_pixel_value)
    }

    /// Resample with a per-call default pixel value.
    pub fn apply_with_default(&self, input: &Image<B, 3>, default_pixel_value: f64) -> Image<B, 3> {
        let device = input.data().device();

        let output_indices = generate_grid_3d::<B>(self.shape, &device);
        let output_points = self.metadata.index_to_world_tensor(output_indices);
        let input_points = self.transform.transform_points(output_points);
        let input_indices = input.metadata().world_to_index_tensor(input_points);

        let inside = inside_buffer_mask(&input_indices, input.shape());
        let coefficients = self.interpolator.coefficients(input.data());
        let sampled = self.interpolator.interpolate(&coefficients, input_indices);

        // inside * v + (1 - inside) * default
        let outside = inside.clone().neg() + 1.0;
        let values = sampled * inside + outside * default_pixel_value;

        let data = values.reshape(Shape::new(self.shape));
        Image::new(data, self.metadata, PixelType::Float32)
    }
}

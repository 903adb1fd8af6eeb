//! Dense displacement field transform.
//!
//! Each voxel of the field stores a physical offset. A point `p` maps to
//! `p + u(p)`, where `u` is trilinearly interpolated from the field and is zero
//! outside the field's buffer.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use crate::image::{inside_buffer_mask, ImageMetadata};
use crate::interpolation::{Interpolator, LinearInterpolator};
use super::trait_::Transform;

/// Dense 3-D displacement field in physical units.
///
/// Components are stored as three `[Z, Y, X]` tensors (x, y and z offsets)
/// sharing one grid geometry.
#[derive(Debug, Clone)]
pub struct DisplacementField<B: Backend> {
    components: [Tensor<B, 3>; 3],
    metadata: ImageMetadata<3>,
}

impl<B: Backend> DisplacementField<B> {
    /// # Panics
    /// If the three component tensors do not share one shape.
    pub fn new(components: [Tensor<B, 3>; 3], metadata: ImageMetadata<3>) -> Self {
        let shape = components[0].dims();
        assert!(
            components.iter().all(|c| c.dims() == shape),
            "displacement components must share one shape"
        );
        Self {
            components,
            metadata,
        }
    }

    /// A field that leaves every point where it is.
    pub fn zeros(shape: [usize; 3], metadata: ImageMetadata<3>, device: &B::Device) -> Self {
        let zero = || Tensor::<B, 3>::zeros(shape, device);
        Self::new([zero(), zero(), zero()], metadata)
    }

    pub fn components(&self) -> &[Tensor<B, 3>; 3] {
        &self.components
    }

    pub fn metadata(&self) -> &ImageMetadata<3> {
        &self.metadata
    }

    pub fn shape(&self) -> [usize; 3] {
        self.components[0].dims()
    }

    pub fn with_metadata(mut self, metadata: ImageMetadata<3>) -> Self {
        self.metadata = metadata;
        self
    }

    /// Interpolated offsets at `[N, 3]` physical points, zero outside the field.
    pub fn displacement_at(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let indices = self.metadata.world_to_index_tensor(points);
        let inside = inside_buffer_mask(&indices, self.shape());
        let interpolator = LinearInterpolator::new();

        let columns = self
            .components
            .iter()
            .map(|component| {
                let value = interpolator.interpolate(component, indices.clone());
                (value * inside.clone()).unsqueeze_dim(1)
            })
            .collect();
        Tensor::cat(columns, 1)
    }
}

impl<B: Backend> Transform<B> for DisplacementField<B> {
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2> {
        let offsets = self.displacement_at(points.clone());
        points + offsets
    }
}

//! Transform trait for spatial coordinate transformations.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Maps physical points of the output grid to physical points of the input.
///
/// Resampling pulls values: for every output voxel the transform says where to
/// sample the input image.
pub trait Transform<B: Backend> {
    /// Transform a `[N, 3]` batch of physical points.
    fn transform_points(&self, points: Tensor<B, 2>) -> Tensor<B, 2>;
}

//! Interpolator trait.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;

/// Samples a `[Z, Y, X]` volume at continuous indices.
pub trait Interpolator<B: Backend> {
    /// Interpolate `data` at `indices`.
    ///
    /// # Arguments
    /// * `data` - Volume in `[Z, Y, X]` layout
    /// * `indices` - `[N, 3]` continuous indices as `(x, y, z)` rows
    ///
    /// # Returns
    /// `[N]` sampled values. Indices outside the volume are clamped to the edge;
    /// callers mask them when they need a default value instead.
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1>;

    /// Volume that [`Interpolator::interpolate`] should sample for `data`.
    ///
    /// Kernels that do not pass through their samples (B-splines) return
    /// prefiltered coefficients here; everything else samples `data` as is.
    fn coefficients(&self, data: &Tensor<B, 3>) -> Tensor<B, 3> {
        data.clone()
    }
}

/// Split `[N, 3]` indices into their x, y and z columns.
pub(crate) fn columns<B: Backend>(indices: Tensor<B, 2>) -> [Tensor<B, 1>; 3] {
    let x = indices.clone().narrow(1, 0, 1).squeeze::<1>(1);
    let y = indices.clone().narrow(1, 1, 1).squeeze::<1>(1);
    let z = indices.narrow(1, 2, 1).squeeze::<1>(1);
    [x, y, z]
}

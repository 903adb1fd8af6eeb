//! Nearest neighbour interpolation.

use burn::tensor::backend::Backend;
use burn::tensor::Tensor;
use super::trait_::{columns, Interpolator};

/// Rounds each index to the closest voxel centre.
#[derive(Debug, Clone, Copy, Default)]
pub struct NearestNeighborInterpolator;

impl NearestNeighborInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for NearestNeighborInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1, d2] = data.dims();
        let [x, y, z] = columns(indices);

        let x_i = x.round().clamp(0.0, (d2 - 1) as f64).int();
        let y_i = y.round().clamp(0.0, (d1 - 1) as f64).int();
        let z_i = z.round().clamp(0.0, (d0 - 1) as f64).int();

        let idx = z_i * (d1 * d2) as i32 + y_i * d2 as i32 + x_i;
        data.clone().reshape([d0 * d1 * d2]).gather(0, idx)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_rounds_to_closest_voxel() {
        let device = Default::default();
        let values: Vec<f32> = (0..8).map(|v| v as f32).collect();
        let data = Tensor::<TestBackend, 3>::from_data(TensorData::new(values, Shape::new([2, 2, 2])), &device);
        let indices = Tensor::<TestBackend, 2>::from_floats(
            [[0.4, 0.4, 0.4], [0.6, 0.0, 0.0], [0.0, 0.6, 0.0], [0.0, 0.0, 0.6], [5.0, 5.0, 5.0]],
            &device,
        );
        let out = NearestNeighborInterpolator::new().interpolate(&data, indices).into_data();
        assert_eq!(out.as_slice::<f32>().unwrap(), &[0.0, 1.0, 2.0, 4.0, 7.0]);
    }
}

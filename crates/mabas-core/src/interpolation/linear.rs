//! Trilinear interpolation.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Tensor};
use super::trait_::{columns, Interpolator};

/// Trilinear interpolation between the eight surrounding voxels.
#[derive(Debug, Clone, Copy, Default)]
pub struct LinearInterpolator;

impl LinearInterpolator {
    pub fn new() -> Self {
        Self
    }
}

impl<B: Backend> Interpolator<B> for LinearInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1, d2] = data.dims();
        let [x, y, z] = columns(indices);

        let x0 = x.clone().floor();
        let y0 = y.clone().floor();
        let z0 = z.clone().floor();

        let wx = x - x0.clone();
        let wy = y - y0.clone();
        let wz = z - z0.clone();

        let x1 = (x0.clone() + 1.0).clamp(0.0, (d2 - 1) as f64).int();
        let y1 = (y0.clone() + 1.0).clamp(0.0, (d1 - 1) as f64).int();
        let z1 = (z0.clone() + 1.0).clamp(0.0, (d0 - 1) as f64).int();
        let x0 = x0.clamp(0.0, (d2 - 1) as f64).int();
        let y0 = y0.clamp(0.0, (d1 - 1) as f64).int();
        let z0 = z0.clamp(0.0, (d0 - 1) as f64).int();

        let stride_z = (d1 * d2) as i32;
        let stride_y = d2 as i32;
        let flat = data.clone().reshape([d0 * d1 * d2]);
        let g = |xi: &Tensor<B, 1, Int>, yi: &Tensor<B, 1, Int>, zi: &Tensor<B, 1, Int>| {
            let idx = zi.clone() * stride_z + yi.clone() * stride_y + xi.clone();
            flat.clone().gather(0, idx)
        };

        let ux = wx.clone().neg() + 1.0;
        let uy = wy.clone().neg() + 1.0;
        let uz = wz.clone().neg() + 1.0;

        let c00 = g(&x0, &y0, &z0) * ux.clone() + g(&x1, &y0, &z0) * wx.clone();
        let c01 = g(&x0, &y0, &z1) * ux.clone() + g(&x1, &y0, &z1) * wx.clone();
        let c10 = g(&x0, &y1, &z0) * ux.clone() + g(&x1, &y1, &z0) * wx.clone();
        let c11 = g(&x0, &y1, &z1) * ux + g(&x1, &y1, &z1) * wx;

        let c0 = c00 * uy.clone() + c10 * wy.clone();
        let c1 = c01 * uy + c11 * wy;

        c0 * uz + c1 * wz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::{Shape, TensorData};
    use burn_ndarray::NdArray;

    type TestBackend = NdArray<f32>;

    fn cube() -> Tensor<TestBackend, 3> {
        // value = x + 10 y + 100 z on a 2x2x2 grid
        let mut values = Vec::new();
        for z in 0..2 {
            for y in 0..2 {
                for x in 0..2 {
                    values.push((x + 10 * y + 100 * z) as f32);
                }
            }
        }
        Tensor::from_data(TensorData::new(values, Shape::new([2, 2, 2])), &Default::default())
    }

    #[test]
    fn test_exact_at_voxel_centres() {
        let indices = Tensor::<TestBackend, 2>::from_floats([[1.0, 0.0, 1.0], [0.0, 1.0, 0.0]], &Default::default());
        let out = LinearInterpolator::new().interpolate(&cube(), indices).into_data();
        assert_eq!(out.as_slice::<f32>().unwrap(), &[101.0, 10.0]);
    }

    #[test]
    fn test_linear_field_is_reproduced() {
        let indices = Tensor::<TestBackend, 2>::from_floats([[0.25, 0.5, 0.75]], &Default::default());
        let out = LinearInterpolator::new().interpolate(&cube(), indices).into_data();
        let value = out.as_slice::<f32>().unwrap()[0];
        assert!((value - (0.25 + 5.0 + 75.0)).abs() < 1e-4);
    }

    #[test]
    fn test_edge_is_clamped() {
        let indices = Tensor::<TestBackend, 2>::from_floats([[1.4, 0.0, 0.0]], &Default::default());
        let out = LinearInterpolator::new().interpolate(&cube(), indices).into_data();
        assert!((out.as_slice::<f32>().unwrap()[0] - 1.0).abs() < 1e-5);
    }
}

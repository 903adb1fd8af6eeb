//! Cubic B-spline interpolation.
//!
//! Samples are a weighted sum over the 4x4x4 neighbourhood of a coefficient
//! volume using the cubic B-spline basis:
//! - (2/3) - |x|^2 + (1/2)|x|^3    for |x| < 1
//! - (1/6)(2 - |x|)^3              for 1 <= |x| < 2
//!
//! The coefficients come from the recursive prefilter in [`prefilter`]
//! (single pole `sqrt(3) - 2`, mirror-symmetric boundaries), so the
//! interpolant passes through every voxel value. Taps beyond the edge are
//! mirrored to match the prefilter's boundary condition.

use burn::tensor::backend::Backend;
use burn::tensor::{Int, Shape, Tensor, TensorData};
use super::trait_::{columns, Interpolator};

/// Pole of the cubic B-spline prefilter, `sqrt(3) - 2`.
const POLE: f64 = -0.267_949_192_431_122_7;

/// Cubic B-spline interpolator over prefiltered coefficients.
#[derive(Debug, Clone, Copy, Default)]
pub struct BSplineInterpolator;

impl BSplineInterpolator {
    pub fn new() -> Self {
        Self
    }

    /// Mirrored tap indices and basis weights along one axis.
    fn taps<B: Backend>(coord: Tensor<B, 1>, extent: usize) -> [(Tensor<B, 1, Int>, Tensor<B, 1>); 4] {
        let base = coord.clone().floor();
        let t = coord - base.clone();
        let t2 = t.clone() * t.clone();
        let t3 = t2.clone() * t.clone();
        let u = t.clone().neg() + 1.0;

        let w0 = u.clone() * u.clone() * u / 6.0;
        let w1 = (t3.clone() * 3.0 - t2.clone() * 6.0 + 4.0) / 6.0;
        let w2 = (t3.clone() * -3.0 + t2 * 3.0 + t * 3.0 + 1.0) / 6.0;
        let w3 = t3 / 6.0;

        let hi = (extent - 1) as f64;
        let at = |offset: f64| {
            // i -> |i| at the first voxel, then i -> hi - |hi - i| at the last
            let index = (base.clone() + offset).abs();
            let index = (index.neg() + hi).abs().neg() + hi;
            index.clamp(0.0, hi).int()
        };
        [(at(-1.0), w0), (at(0.0), w1), (at(1.0), w2), (at(2.0), w3)]
    }
}

/// In-place cubic B-spline prefilter of one line of samples.
fn prefilter_line(line: &mut [f64]) {
    let n = line.len();
    if n < 2 {
        return;
    }
    let z = POLE;
    let gain = (1.0 - z) * (1.0 - 1.0 / z);
    for c in line.iter_mut() {
        *c *= gain;
    }

    // Causal initialisation for a mirror-symmetric extension.
    let iz = 1.0 / z;
    let mut zn = z;
    let mut z2n = z.powi(n as i32 - 1);
    let mut sum = line[0] + z2n * line[n - 1];
    z2n *= z2n * iz;
    for k in 1..n - 1 {
        sum += (zn + z2n) * line[k];
        zn *= z;
        z2n *= iz;
    }
    line[0] = sum / (1.0 - zn * zn);
    for k in 1..n {
        line[k] += z * line[k - 1];
    }

    line[n - 1] = (z / (z * z - 1.0)) * (z * line[n - 2] + line[n - 1]);
    for k in (0..n - 1).rev() {
        line[k] = z * (line[k + 1] - line[k]);
    }
}

/// Cubic B-spline coefficients of a `[Z, Y, X]` volume.
///
/// Runs the 1-D prefilter along x, y and z in turn. Axes of extent 1 are left
/// untouched.
pub fn prefilter<B: Backend>(data: &Tensor<B, 3>) -> Tensor<B, 3> {
    let [d0, d1, d2] = data.dims();
    let total = d0 * d1 * d2;
    let mut values: Vec<f64> = data.clone().into_data().iter::<f32>().map(f64::from).collect();

    let mut line = Vec::new();
    for (extent, stride) in [(d2, 1), (d1, d2), (d0, d1 * d2)] {
        if extent < 2 {
            continue;
        }
        line.resize(extent, 0.0);
        for start in (0..total).filter(|i| (i / stride) % extent == 0) {
            for (k, c) in line.iter_mut().enumerate() {
                *c = values[start + k * stride];
            }
            prefilter_line(&mut line);
            for (k, c) in line.iter().enumerate() {
                values[start + k * stride] = *c;
            }
        }
    }

    let values: Vec<f32> = values.into_iter().map(|v| v as f32).collect();
    Tensor::from_data(TensorData::new(values, Shape::new([d0, d1, d2])), &data.device())
}

impl<B: Backend> Interpolator<B> for BSplineInterpolator {
    fn interpolate(&self, data: &Tensor<B, 3>, indices: Tensor<B, 2>) -> Tensor<B, 1> {
        let [d0, d1, d2] = data.dims();
        let n = indices.dims()[0];
        let device = indices.device();
        let [x, y, z] = columns(indices);

        let xs = Self::taps(x, d2);
        let ys = Self::taps(y, d1);
        let zs = Self::taps(z, d0);

        let flat = data.clone().reshape([d0 * d1 * d2]);
        let stride_z = (d1 * d2) as i32;
        let stride_y = d2 as i32;

        let mut result = Tensor::<B, 1>::zeros([n], &device);
        for (zi, wz) in &zs {
            for (yi, wy) in &ys {
                let row = zi.clone() * stride_z + yi.clone() * stride_y;
                let wzy = wz.clone() * wy.clone();
                for (xi, wx) in &xs {
                    let sample = flat.clone().gather(0, row.clone() + xi.clone());
                    result = result + sample * wzy.clone() * wx.clone();
                }
            }
        }
        result
    }

    fn coefficients(&self, data: &Tensor<B, 3>) -> Tensor<B, 3> {
        prefilter(data)
    }
}

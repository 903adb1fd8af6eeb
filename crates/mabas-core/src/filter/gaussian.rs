//! Discrete Gaussian smoothing.
//!
//! Separable 1-D convolutions, one per axis. The variance is given in
//! physical units (mm²) and converted to voxels with the image spacing.
//! Borders replicate the edge voxel so constant regions stay constant.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use burn::tensor::module::conv1d;
use burn::tensor::ops::ConvOptions;
use burn::tensor::Tensor;
use crate::image::{Image, PixelType};
use crate::spatial::Spacing;

/// Widest kernel used along any axis.
pub const DEFAULT_MAX_KERNEL_WIDTH: usize = 32;

pub struct GaussianFilter<B: Backend> {
    variance: f64,
    max_kernel_width: usize,
    _b: PhantomData<B>,
}

impl<B: Backend> GaussianFilter<B> {
    /// `variance` is in physical units, the same along every axis.
    pub fn new(variance: f64) -> Self {
        Self {
            variance,
            max_kernel_width: DEFAULT_MAX_KERNEL_WIDTH,
            _b: PhantomData,
        }
    }

    /// Kernel width is `2 * radius + 1`, capped at `width`.
    pub fn with_max_kernel_width(mut self, width: usize) -> Self {
        self.max_kernel_width = width.max(1);
        self
    }

    /// Smoothed copy with the same geometry, stored as Float32.
    pub fn apply(&self, image: &Image<B, 3>) -> Image<B, 3> {
        let data = self.apply_tensor(image.data().clone(), image.spacing());
        Image::new(data, *image.metadata(), PixelType::Float32)
    }

    /// `input` is `[Z, Y, X]`; tensor dim `d` uses `spacing[2 - d]`.
    pub fn apply_tensor(&self, input: Tensor<B, 3>, spacing: &Spacing<3>) -> Tensor<B, 3> {
        if self.variance <= 1e-12 {
            return input;
        }
        let sigma = self.variance.sqrt();
        let device = input.device();

        let mut data = input;
        for dim in 0..3 {
            let pixel_sigma = sigma / spacing[2 - dim];
            let radius = (3.0 * pixel_sigma).ceil() as usize;
            let width = (2 * radius + 1).min(self.max_kernel_width);
            let radius = (width - 1) / 2;
            if radius == 0 {
                continue;
            }
            let kernel = generate_kernel(pixel_sigma, radius);
            let kernel = Tensor::<B, 1>::from_floats(kernel.as_slice(), &device);
            data = convolve_1d(data, kernel, dim, radius);
        }
        data
    }
}

/// Sampled Gaussian of `2 * radius + 1` taps, normalized to unit sum.
fn generate_kernel(sigma: f64, radius: usize) -> Vec<f32> {
    let two_sigma2 = 2.0 * sigma * sigma;
    let taps: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            let x = i as f64 - radius as f64;
            (-x * x / two_sigma2).exp()
        })
        .collect();
    let sum: f64 = taps.iter().sum();
    taps.into_iter().map(|t| (t / sum) as f32).collect()
}

fn convolve_1d<B: Backend>(input: Tensor<B, 3>, kernel: Tensor<B, 1>, dim: usize, radius: usize) -> Tensor<B, 3> {
    // Bring the axis last, then fold the other two into the batch.
    let moved = input.swap_dims(dim, 2);
    let [a, b, len] = moved.dims();

    let first = moved.clone().narrow(2, 0, 1);
    let last = moved.clone().narrow(2, len - 1, 1);
    let mut parts = vec![first; radius];
    parts.push(moved);
    parts.extend(std::iter::repeat(last).take(radius));
    let padded = Tensor::cat(parts, 2).reshape([a * b, 1, len + 2 * radius]);

    let width = kernel.dims()[0];
    let options = ConvOptions::new([1], [0], [1], 1);
    let output = conv1d(padded, kernel.reshape([1, 1, width]), None, options);

    output.reshape([a, b, len]).swap_dims(dim, 2)
}

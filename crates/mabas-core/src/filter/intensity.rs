//! Voxel-wise intensity filters.

use burn::tensor::backend::Backend;
use crate::image::{Image, PixelType};

/// Lower bound of the probability band kept after higher-order resampling.
pub const PROBABILITY_FLOOR: f64 = 1e-5;
/// Upper bound of the probability band kept after higher-order resampling.
pub const PROBABILITY_CEILING: f64 = 100.0;

/// Keeps values in `[lower, upper]` and replaces everything else.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdFilter {
    lower: f64,
    upper: f64,
    outside_value: f64,
}

impl ThresholdFilter {
    pub fn new(lower: f64, upper: f64) -> Self {
        Self {
            lower,
            upper,
            outside_value: 0.0,
        }
    }

    /// Band used to clean B-spline ringing out of resampled label images.
    pub fn probability_band() -> Self {
        Self::new(PROBABILITY_FLOOR, PROBABILITY_CEILING)
    }

    pub fn with_outside_value(mut self, value: f64) -> Self {
        self.outside_value = value;
        self
    }

    /// Geometry and pixel type are kept.
    pub fn apply<B: Backend, const D: usize>(&self, image: &Image<B, D>) -> Image<B, D> {
        let data = image.data().clone();
        let keep = data
            .clone()
            .greater_equal_elem(self.lower)
            .float()
            * data.clone().lower_equal_elem(self.upper).float();
        let drop = keep.clone().neg() + 1.0;
        let values = data * keep + drop * self.outside_value;
        Image::new(values, *image.metadata(), image.pixel_type())
    }
}

/// Divide every voxel by the image's own maximum.
///
/// Returns `None` when the maximum is not a positive finite number, since
/// dividing by it would flip signs or produce infinities. The result is Float32.
pub fn normalize_by_max<B: Backend, const D: usize>(image: &Image<B, D>) -> Option<Image<B, D>> {
    let max = image.max_value();
    if !(max.is_finite() && max > 0.0) {
        return None;
    }
    let data = image.data().clone() / max;
    Some(Image::new(data, *image.metadata(), PixelType::Float32))
}

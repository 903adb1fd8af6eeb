//! Output pixel-type policies.
//!
//! Each workflow decides what a resampled image is stored as. Label images
//! resampled with nearest or linear interpolation go back to integers; with
//! higher orders they are kept as floats and the out-of-band ringing removed.

use burn::tensor::backend::Backend;
use mabas_core::filter::ThresholdFilter;
use mabas_core::image::{Image, ImageKind, PixelType};
use mabas_core::interpolation::InterpolationOrder;

/// Storage type plus optional clean-up for a resampled image.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OutputPolicy {
    pub pixel_type: PixelType,
    pub threshold: Option<ThresholdFilter>,
}

impl OutputPolicy {
    /// Store as `pixel_type` with no clean-up.
    pub fn cast(pixel_type: PixelType) -> Self {
        Self {
            pixel_type,
            threshold: None,
        }
    }

    /// Float32 with values outside the probability band zeroed.
    pub fn thresholded_float() -> Self {
        Self {
            pixel_type: PixelType::Float32,
            threshold: Some(ThresholdFilter::probability_band()),
        }
    }

    /// Rigid transform propagation.
    pub fn rigid_propagation(kind: ImageKind, order: InterpolationOrder, moving: PixelType) -> Self {
        match kind {
            ImageKind::Structure if order.is_higher_order() => {
                tracing::warn!(
                    "Higher order interpolation ({}) on a structure image; saving as 32-bit float",
                    order
                );
                Self::thresholded_float()
            }
            ImageKind::Structure => Self::cast(PixelType::UInt8),
            ImageKind::Intensity => Self::cast(moving),
        }
    }

    /// B-spline transform propagation.
    pub fn bspline_propagation(binary: bool) -> Self {
        if binary {
            Self::cast(PixelType::UInt8)
        } else {
            Self::cast(PixelType::Float32)
        }
    }

    /// Displacement-field application, decided per image.
    ///
    /// Only nearest-neighbour output of a structure image is label-safe; any
    /// blending interpolator keeps the fractional values as Float32.
    pub fn field_application(kind: ImageKind, order: InterpolationOrder, original: PixelType) -> Self {
        if kind == ImageKind::Structure && order != InterpolationOrder::NEAREST {
            tracing::warn!(
                "Interpolation order {} on a structure image; saving as 32-bit float",
                order
            );
            Self::cast(PixelType::Float32)
        } else {
            Self::cast(original)
        }
    }

    /// Threshold (when set), then cast.
    pub fn apply<B: Backend>(&self, image: &Image<B, 3>) -> Image<B, 3> {
        let image = match &self.threshold {
            Some(threshold) => threshold.apply(image),
            None => image.clone(),
        };
        image.cast(self.pixel_type)
    }
}

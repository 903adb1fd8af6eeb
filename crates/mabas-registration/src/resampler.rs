//! In-process resampling through a dense displacement field.

use burn::tensor::backend::Backend;
use mabas_core::filter::ResampleImageFilter;
use mabas_core::image::{Image, ImageKind, PixelType};
use mabas_core::interpolation::{InterpolationOrder, InterpolatorKind};
use mabas_core::transform::DisplacementField;
use crate::engine::Resampler;
use crate::error::Result;

/// Resampler configured once per batch: reference grid, interpolator and field.
pub struct DisplacementFieldResampler<B: Backend> {
    filter: ResampleImageFilter<B, DisplacementField<B>, InterpolatorKind>,
}

impl<B: Backend> DisplacementFieldResampler<B> {
    /// Output grid is taken from `reference`.
    pub fn new(reference: &Image<B, 3>, field: DisplacementField<B>, order: InterpolationOrder) -> Self {
        let interpolator = order.interpolator();
        tracing::debug!(
            "Resampler: {} interpolation, reference size {:?}",
            interpolator.name(),
            reference.size()
        );
        Self {
            filter: ResampleImageFilter::new_from_reference(reference, field, interpolator),
        }
    }
}

impl<B: Backend> Resampler<B> for DisplacementFieldResampler<B> {
    fn resample(&self, image: &Image<B, 3>, kind: ImageKind) -> Result<Image<B, 3>> {
        let input = image.cast(PixelType::Float32);
        Ok(self.filter.apply_with_default(&input, kind.default_pixel_value()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use burn::tensor::Tensor;
    use burn_ndarray::NdArray;
    use mabas_core::image::ImageMetadata;

    type TestBackend = NdArray<f32>;

    #[test]
    fn test_default_value_follows_kind() {
        let device = Default::default();
        let image = Image::<TestBackend, 3>::from_values(
            vec![10.0; 8],
            [2, 2, 2],
            ImageMetadata::default(),
            PixelType::Int16,
            &device,
        );
        let away = Tensor::<TestBackend, 3>::ones([2, 2, 2], &device) * 50.0;
        let zero = Tensor::<TestBackend, 3>::zeros([2, 2, 2], &device);
        let field = DisplacementField::new([away, zero.clone(), zero], ImageMetadata::default());
        let resampler = DisplacementFieldResampler::new(&image, field, InterpolationOrder::NEAREST);

        let ct = resampler.resample(&image, ImageKind::Intensity).unwrap();
        assert!(ct.to_vec().iter().all(|&v| v == -1024.0));
        let label = resampler.resample(&image, ImageKind::Structure).unwrap();
        assert!(label.to_vec().iter().all(|&v| v == 0.0));
        assert_eq!(label.pixel_type(), PixelType::Float32);
    }
}

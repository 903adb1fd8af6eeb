//! Applying dense displacement fields to images.

use std::path::{Path, PathBuf};
use anyhow::{bail, Context, Result};
use burn::tensor::backend::Backend;
use mabas_core::image::{Image, ImageKind};
use mabas_core::interpolation::InterpolationOrder;
use mabas_io::{read_displacement_field, read_image, write_image};
use crate::engine::Resampler;
use crate::error::EngineError;
use crate::policy::OutputPolicy;
use crate::resampler::DisplacementFieldResampler;

/// One image to push through the field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldTarget {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Decides the background value and the output type.
    pub kind: ImageKind,
}

/// Substitute `token` for `{0}` or `{}` in a file-name template.
pub fn expand_template(template: &str, token: &str) -> String {
    template.replace("{0}", token).replace("{}", token)
}

/// One target per suffix token, all of the same kind.
pub fn expand_targets(
    input_template: &str,
    output_template: &str,
    tokens: &[String],
    kind: ImageKind,
) -> Vec<FieldTarget> {
    if tokens.len() > 1 && expand_template(output_template, "") == output_template {
        tracing::warn!(
            "Output template {} has no {{0}} placeholder; outputs will overwrite each other",
            output_template
        );
    }
    tokens
        .iter()
        .map(|token| FieldTarget {
            input: PathBuf::from(expand_template(input_template, token)),
            output: PathBuf::from(expand_template(output_template, token)),
            kind,
        })
        .collect()
}

/// Resample every image and apply its output policy.
pub fn apply_field<B, R>(
    resampler: &R,
    images: &[(Image<B, 3>, ImageKind)],
    order: InterpolationOrder,
) -> Result<Vec<Image<B, 3>>, EngineError>
where
    B: Backend,
    R: Resampler<B>,
{
    images
        .iter()
        .map(|(image, kind)| -> Result<Image<B, 3>, EngineError> {
            tracing::info!("Resampling {:?} image of size {:?}", kind, image.size());
            let resampled = resampler.resample(image, *kind)?;
            Ok(OutputPolicy::field_application(*kind, order, image.pixel_type()).apply(&resampled))
        })
        .collect()
}

/// Load the field and every input, resample them all, then write each target in order.
///
/// The first input defines the output grid. Nothing is written unless every
/// input loaded and resampled; a write failure stops the batch and keeps
/// earlier outputs.
pub fn run_field_application<B: Backend>(
    field: &Path,
    targets: &[FieldTarget],
    order: InterpolationOrder,
    device: &B::Device,
) -> Result<Vec<PathBuf>> {
    if targets.is_empty() {
        bail!("no images to apply the displacement field to");
    }

    let field = read_displacement_field::<B, _>(field, device)?;
    let images = targets
        .iter()
        .map(|target| -> Result<(Image<B, 3>, ImageKind)> {
            Ok((read_image::<B, _>(&target.input, device)?, target.kind))
        })
        .collect::<Result<Vec<_>>>()?;

    let resampler = DisplacementFieldResampler::new(&images[0].0, field, order);
    let outputs = apply_field(&resampler, &images, order).context("failed to resample images through the field")?;

    let mut written = Vec::with_capacity(targets.len());
    for (target, output) in targets.iter().zip(&outputs) {
        tracing::info!("Saving image to {}", target.output.display());
        write_image(&target.output, output)?;
        written.push(target.output.clone());
    }
    Ok(written)
}

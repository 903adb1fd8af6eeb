//! Probability map to binary structure.

use std::path::PathBuf;
use anyhow::{ensure, Result};
use burn::tensor::backend::Backend;
use mabas_core::filter::clean_probability_map;
use mabas_io::{read_image, write_image};

#[derive(Debug, Clone, PartialEq)]
pub struct ThresholdProbability {
    pub input: PathBuf,
    pub output: PathBuf,
    /// Lowest probability counted as foreground.
    pub threshold: f32,
}

pub fn run_threshold_probability<B: Backend>(request: &ThresholdProbability, device: &B::Device) -> Result<PathBuf> {
    ensure!(
        request.threshold.is_finite(),
        "threshold must be a finite number, got {}",
        request.threshold
    );
    let image = read_image::<B, _>(&request.input, device)?;
    if request.threshold > 1.0 {
        tracing::warn!("Threshold {} is above 1; the output will be empty", request.threshold);
    }

    let binary = clean_probability_map(&image, request.threshold);
    tracing::info!("Saving image to {}", request.output.display());
    write_image(&request.output, &binary)?;
    Ok(request.output.clone())
}

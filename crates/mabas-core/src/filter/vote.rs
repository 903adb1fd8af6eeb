//! Local weighted voting of propagated atlas labels.
//!
//! Each atlas gets a per-voxel weight from how well its registered intensity
//! image matches the target locally:
//!
//! ```text
//! w = 1 / (G_nbhd * (T - M)² + eps)
//! ```
//!
//! Labels are averaged with these weights, smoothed and rescaled so the
//! largest probability is 1.

use burn::tensor::backend::Backend;
use thiserror::Error;
use super::gaussian::GaussianFilter;
use super::intensity::normalize_by_max;
use crate::image::{Image, PixelType};

pub const DEFAULT_NEIGHBOURHOOD_VARIANCE: f64 = 4.0;
pub const DEFAULT_SMOOTHING_VARIANCE: f64 = 0.25;
pub const DEFAULT_EPSILON: f64 = 1e-5;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VoteError {
    #[error("image of size {found:?} does not match the target size {expected:?}")]
    ShapeMismatch { expected: [usize; 3], found: [usize; 3] },
    #[error("{labels} label images for {weights} weight maps")]
    CountMismatch { weights: usize, labels: usize },
    #[error("no atlases to vote with")]
    NoAtlases,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalWeightedVote {
    /// Variance (mm²) of the window the squared difference is averaged over.
    pub neighbourhood_variance: f64,
    /// Variance (mm²) of the smoothing applied to the fused probability.
    pub smoothing_variance: f64,
    /// Keeps the weight finite where target and atlas agree exactly.
    pub epsilon: f64,
}

impl Default for LocalWeightedVote {
    fn default() -> Self {
        Self {
            neighbourhood_variance: DEFAULT_NEIGHBOURHOOD_VARIANCE,
            smoothing_variance: DEFAULT_SMOOTHING_VARIANCE,
            epsilon: DEFAULT_EPSILON,
        }
    }
}

fn ensure_same_shape(expected: [usize; 3], found: [usize; 3]) -> Result<(), VoteError> {
    if expected != found {
        return Err(VoteError::ShapeMismatch { expected, found });
    }
    Ok(())
}

impl LocalWeightedVote {
    /// Weight map of one registered atlas image against the target.
    pub fn weight<B: Backend>(&self, target: &Image<B, 3>, atlas: &Image<B, 3>) -> Result<Image<B, 3>, VoteError> {
        ensure_same_shape(target.shape(), atlas.shape())?;
        let diff = target.data().clone() - atlas.data().clone();
        let squared = Image::new(diff.clone() * diff, *target.metadata(), PixelType::Float32);
        let local = GaussianFilter::new(self.neighbourhood_variance).apply(&squared);
        let weight = (local.data().clone() + self.epsilon).recip();
        Ok(Image::new(weight, *target.metadata(), PixelType::Float32))
    }

    /// Probability map of one structure from per-atlas weights and labels.
    ///
    /// `weights[i]` pairs with `labels[i]`. A structure absent from every
    /// atlas stays all-zero instead of being divided by a zero maximum.
    pub fn fuse<B: Backend>(&self, weights: &[Image<B, 3>], labels: &[Image<B, 3>]) -> Result<Image<B, 3>, VoteError> {
        if weights.len() != labels.len() {
            return Err(VoteError::CountMismatch {
                weights: weights.len(),
                labels: labels.len(),
            });
        }
        let Some(first) = weights.first() else {
            return Err(VoteError::NoAtlases);
        };
        let shape = first.shape();

        let mut weight_sum = first.data().zeros_like();
        let mut weighted_labels = first.data().zeros_like();
        for (weight, label) in weights.iter().zip(labels) {
            ensure_same_shape(shape, weight.shape())?;
            ensure_same_shape(shape, label.shape())?;
            weight_sum = weight_sum + weight.data().clone();
            weighted_labels = weighted_labels + weight.data().clone() * label.data().clone();
        }

        let fused = Image::new(weighted_labels / weight_sum, *first.metadata(), PixelType::Float32);
        let smoothed = GaussianFilter::new(self.smoothing_variance).apply(&fused);
        Ok(normalize_by_max(&smoothed).unwrap_or_else(|| {
            tracing::warn!("Fused probability has no positive maximum; leaving it unscaled");
            smoothed
        }))
    }
}

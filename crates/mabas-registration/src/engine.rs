//! Engine traits the workflows delegate to.
//!
//! Workflows never talk to elastix or transformix directly; they go through
//! these traits so tests can substitute in-memory engines.

use burn::tensor::backend::Backend;
use mabas_core::image::{Image, ImageKind};
use mabas_core::parameter::ParameterMap;
use mabas_core::transform::DisplacementField;
use crate::error::Result;

/// Output of a registration run.
#[derive(Debug, Clone)]
pub struct Registration<B: Backend> {
    /// Moving image resampled into the fixed frame.
    pub image: Image<B, 3>,
    /// Transform found by the registration.
    pub transform: ParameterMap,
}

/// Output of applying a transform.
#[derive(Debug, Clone)]
pub struct Transformed<B: Backend> {
    pub image: Image<B, 3>,
    /// Dense deformation field, when requested.
    pub deformation_field: Option<DisplacementField<B>>,
}

/// Registers a moving image onto a fixed image.
pub trait RegistrationEngine<B: Backend> {
    fn register(
        &self,
        fixed: &Image<B, 3>,
        moving: &Image<B, 3>,
        parameters: &ParameterMap,
    ) -> Result<Registration<B>>;
}

/// Applies a stored transform to an image.
pub trait TransformEngine<B: Backend> {
    fn transform(
        &self,
        moving: &Image<B, 3>,
        transform: &ParameterMap,
        deformation_field: bool,
    ) -> Result<Transformed<B>>;
}

/// Resamples images through a preconfigured spatial mapping.
///
/// The default value for samples outside the input comes from each image's kind.
pub trait Resampler<B: Backend> {
    fn resample(&self, image: &Image<B, 3>, kind: ImageKind) -> Result<Image<B, 3>>;
}

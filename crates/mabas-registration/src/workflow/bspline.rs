//! Non-rigid B-spline registration.

use std::path::PathBuf;
use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use mabas_core::image::{Image, PixelType};
use mabas_core::parameter::ParameterMap;
use mabas_io::{read_image, read_parameter_file, write_image, write_parameter_file};
use crate::engine::{Registration, RegistrationEngine};
use crate::error::EngineError;
use super::RegistrationOutputs;

/// Inputs of one B-spline registration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BSplineRegistration {
    pub fixed: PathBuf,
    pub moving: PathBuf,
    pub parameters: PathBuf,
    pub output_base: PathBuf,
}

/// Registered image is stored as Int32.
pub const REGISTERED_PIXEL_TYPE: PixelType = PixelType::Int32;

/// Register in Float32 and return the result on the fixed grid as Int32.
pub fn register_bspline<B, E>(
    engine: &E,
    fixed: &Image<B, 3>,
    moving: &Image<B, 3>,
    parameters: &ParameterMap,
) -> Result<Registration<B>, EngineError>
where
    B: Backend,
    E: RegistrationEngine<B>,
{
    tracing::info!("Fixed image size: {:?}", fixed.size());
    tracing::info!("Moving image size: {:?}", moving.size());

    let fixed = fixed.cast(PixelType::Float32);
    let moving = moving.cast(PixelType::Float32);
    let registration = engine.register(&fixed, &moving, parameters)?;

    let mut image = registration.image;
    image.copy_information(&fixed);
    Ok(Registration {
        image: image.cast(REGISTERED_PIXEL_TYPE),
        transform: registration.transform,
    })
}

pub fn run_bspline_registration<B, E>(
    engine: &E,
    request: &BSplineRegistration,
    device: &B::Device,
) -> Result<RegistrationOutputs>
where
    B: Backend,
    E: RegistrationEngine<B>,
{
    let fixed = read_image::<B, _>(&request.fixed, device)?;
    let moving = read_image::<B, _>(&request.moving, device)?;
    let parameters = read_parameter_file(&request.parameters)?;

    let registration =
        register_bspline(engine, &fixed, &moving, &parameters).context("B-spline registration failed")?;

    let outputs = RegistrationOutputs::from_base(&request.output_base);
    tracing::info!("Saving image to {}", outputs.image.display());
    write_image(&outputs.image, &registration.image)?;
    tracing::info!("Saving transform to {}", outputs.transform.display());
    write_parameter_file(&outputs.transform, &registration.transform)?;
    Ok(outputs)
}

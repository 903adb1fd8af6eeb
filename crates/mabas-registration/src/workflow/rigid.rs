//! Rigid registration.

use std::path::PathBuf;
use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use mabas_core::filter::{normalize_by_max, ThresholdFilter};
use mabas_core::image::{Image, PixelType};
use mabas_core::parameter::{keys, ParameterMap, ParameterOverrides};
use mabas_io::{read_image, write_image, write_parameter_file, ParameterLibrary};
use crate::engine::{Registration, RegistrationEngine};
use crate::error::EngineError;
use super::RegistrationOutputs;

/// Inputs of one rigid registration run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigidRegistration {
    pub fixed: PathBuf,
    pub moving: PathBuf,
    pub output_base: PathBuf,
    /// Parameter file name, resolved through the parameter library.
    pub parameters: PathBuf,
    /// Normalize intensities and register as probability-like maps.
    pub structure_guided: bool,
}

fn normalized<B: Backend>(image: &Image<B, 3>, role: &str) -> Image<B, 3> {
    match normalize_by_max(image) {
        Some(image) => image,
        None => {
            tracing::warn!(
                "{} image maximum is {}; leaving it un-normalized",
                role,
                image.max_value()
            );
            image.clone()
        }
    }
}

/// Overrides forced for structure-guided registration.
pub fn structure_guided_overrides() -> ParameterOverrides {
    ParameterOverrides::new()
        .set(keys::FINAL_BSPLINE_INTERPOLATION_ORDER, 1)
        .set(keys::DEFAULT_PIXEL_VALUE, 0)
}

/// Register `moving` onto `fixed` and post-process the result.
///
/// The returned image carries the fixed image's geometry and the pixel type
/// of the moving image as it was handed to the engine.
pub fn register_rigid<B, E>(
    engine: &E,
    fixed: &Image<B, 3>,
    moving: &Image<B, 3>,
    parameters: &ParameterMap,
    structure_guided: bool,
) -> Result<Registration<B>, EngineError>
where
    B: Backend,
    E: RegistrationEngine<B>,
{
    tracing::info!("Fixed image size: {:?}", fixed.size());
    tracing::info!("Moving image size: {:?}", moving.size());

    let (fixed, moving, parameters) = if structure_guided {
        tracing::info!("Normalising images");
        (
            normalized(fixed, "fixed"),
            normalized(moving, "moving"),
            structure_guided_overrides().apply(parameters),
        )
    } else {
        (fixed.clone(), moving.clone(), parameters.clone())
    };

    let registration = engine.register(&fixed, &moving, &parameters)?;
    let mut image = registration.image;
    if structure_guided {
        image = ThresholdFilter::probability_band().apply(&image.cast(PixelType::Float32));
    }
    image.copy_information(&fixed);

    Ok(Registration {
        image: image.cast(moving.pixel_type()),
        transform: registration.transform,
    })
}

/// Read inputs, resolve parameters, register, write `<base>.nii.gz` and `<base>.txt`.
pub fn run_rigid_registration<B, E>(
    engine: &E,
    library: &ParameterLibrary,
    request: &RigidRegistration,
    device: &B::Device,
) -> Result<RegistrationOutputs>
where
    B: Backend,
    E: RegistrationEngine<B>,
{
    let fixed = read_image::<B, _>(&request.fixed, device)?;
    let moving = read_image::<B, _>(&request.moving, device)?;
    let resolved = library
        .resolve(&request.parameters)
        .context("failed to load rigid registration parameters")?;

    let registration = register_rigid(engine, &fixed, &moving, &resolved.map, request.structure_guided)
        .context("rigid registration failed")?;

    let outputs = RegistrationOutputs::from_base(&request.output_base);
    tracing::info!("Saving image to {}", outputs.image.display());
    write_image(&outputs.image, &registration.image)?;
    tracing::info!("Saving transform to {}", outputs.transform.display());
    write_parameter_file(&outputs.transform, &registration.transform)?;
    Ok(outputs)
}

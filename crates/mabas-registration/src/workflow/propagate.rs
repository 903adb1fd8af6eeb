//! Propagating stored transforms to new images.

use std::path::PathBuf;
use anyhow::{Context, Result};
use burn::tensor::backend::Backend;
use mabas_core::image::{Image, ImageKind, PixelType};
use mabas_core::interpolation::InterpolationOrder;
use mabas_core::parameter::{keys, ParameterMap, ParameterOverrides};
use mabas_io::{read_image, read_parameter_file, write_displacement_field, write_image};
use crate::engine::{TransformEngine, Transformed};
use crate::error::EngineError;
use crate::policy::OutputPolicy;
use super::{with_suffix, IMAGE_EXTENSION};

/// Suffix of an exported deformation field.
pub const DEFORMATION_FIELD_SUFFIX: &str = "_DeformationField.nii.gz";

/// Inputs of a rigid propagation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RigidPropagation {
    pub fixed: PathBuf,
    pub moving: PathBuf,
    pub transform: PathBuf,
    pub kind: ImageKind,
    pub order: InterpolationOrder,
    /// Written exactly as given.
    pub output: PathBuf,
}

/// Inputs of a B-spline propagation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BSplinePropagation {
    pub fixed: PathBuf,
    pub moving: PathBuf,
    pub transform: PathBuf,
    pub binary: bool,
    pub order: InterpolationOrder,
    pub save_deformation_field: bool,
    pub output_base: PathBuf,
}

/// Files written by a propagation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropagationOutputs {
    pub image: PathBuf,
    pub deformation_field: Option<PathBuf>,
}

pub fn rigid_overrides(kind: ImageKind, order: InterpolationOrder) -> ParameterOverrides {
    let overrides = match kind {
        ImageKind::Structure => ParameterOverrides::new().set(keys::DEFAULT_PIXEL_VALUE, 0),
        ImageKind::Intensity => ParameterOverrides::new(),
    };
    overrides.set(keys::FINAL_BSPLINE_INTERPOLATION_ORDER, order)
}

pub fn bspline_overrides(binary: bool, order: InterpolationOrder) -> ParameterOverrides {
    let overrides = if binary {
        ParameterOverrides::new().set(keys::DEFAULT_PIXEL_VALUE, 0)
    } else {
        ParameterOverrides::new()
    };
    overrides
        .set(keys::RESAMPLE_INTERPOLATOR, keys::FINAL_BSPLINE_INTERPOLATOR)
        .set(keys::FINAL_BSPLINE_INTERPOLATION_ORDER, order)
}

/// Apply a rigid transform to `moving` and store it on `fixed`'s grid.
pub fn propagate_rigid<B, E>(
    engine: &E,
    fixed: &Image<B, 3>,
    moving: &Image<B, 3>,
    transform: &ParameterMap,
    kind: ImageKind,
    order: InterpolationOrder,
) -> Result<Image<B, 3>, EngineError>
where
    B: Backend,
    E: TransformEngine<B>,
{
    let transform = rigid_overrides(kind, order).apply(transform);
    let result = engine.transform(&moving.cast(PixelType::Float32), &transform, false)?;

    let policy = OutputPolicy::rigid_propagation(kind, order, moving.pixel_type());
    Ok(policy.apply(&result.image).with_metadata(*fixed.metadata()))
}

/// Apply a B-spline transform to `moving`, optionally returning the
/// deformation field. Image and field both carry `fixed`'s geometry.
pub fn propagate_bspline<B, E>(
    engine: &E,
    fixed: &Image<B, 3>,
    moving: &Image<B, 3>,
    transform: &ParameterMap,
    binary: bool,
    order: InterpolationOrder,
    deformation_field: bool,
) -> Result<Transformed<B>, EngineError>
where
    B: Backend,
    E: TransformEngine<B>,
{
    let transform = bspline_overrides(binary, order).apply(transform);
    let result = engine.transform(&moving.cast(PixelType::Float32), &transform, deformation_field)?;

    let image = OutputPolicy::bspline_propagation(binary)
        .apply(&result.image)
        .with_metadata(*fixed.metadata());
    let deformation_field = result
        .deformation_field
        .map(|field| field.with_metadata(*fixed.metadata()));
    Ok(Transformed {
        image,
        deformation_field,
    })
}

pub fn run_rigid_propagation<B, E>(engine: &E, request: &RigidPropagation, device: &B::Device) -> Result<PathBuf>
where
    B: Backend,
    E: TransformEngine<B>,
{
    let fixed = read_image::<B, _>(&request.fixed, device)?;
    let moving = read_image::<B, _>(&request.moving, device)?;
    let transform = read_parameter_file(&request.transform)?;

    let image = propagate_rigid(engine, &fixed, &moving, &transform, request.kind, request.order)
        .context("rigid transform propagation failed")?;

    tracing::info!("Saving image to {}", request.output.display());
    write_image(&request.output, &image)?;
    Ok(request.output.clone())
}

pub fn run_bspline_propagation<B, E>(
    engine: &E,
    request: &BSplinePropagation,
    device: &B::Device,
) -> Result<PropagationOutputs>
where
    B: Backend,
    E: TransformEngine<B>,
{
    let fixed = read_image::<B, _>(&request.fixed, device)?;
    let moving = read_image::<B, _>(&request.moving, device)?;
    let transform = read_parameter_file(&request.transform)?;

    let result = propagate_bspline(
        engine,
        &fixed,
        &moving,
        &transform,
        request.binary,
        request.order,
        request.save_deformation_field,
    )
    .context("B-spline transform propagation failed")?;

    let image_path = with_suffix(&request.output_base, IMAGE_EXTENSION);
    tracing::info!("Saving image to {}", image_path.display());
    write_image(&image_path, &result.image)?;

    let field_path = match (&result.deformation_field, request.save_deformation_field) {
        (Some(field), true) => {
            let path = with_suffix(&request.output_base, DEFORMATION_FIELD_SUFFIX);
            tracing::info!("Saving deformation field to {}", path.display());
            write_displacement_field(&path, field)?;
            Some(path)
        }
        (None, true) => anyhow::bail!("transform engine did not return the requested deformation field"),
        _ => None,
    };

    Ok(PropagationOutputs {
        image: image_path,
        deformation_field: field_path,
    })
}

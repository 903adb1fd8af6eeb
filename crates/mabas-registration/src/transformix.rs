//! Transform application through the transformix executable.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use mabas_core::image::Image;
use mabas_core::parameter::ParameterMap;
use mabas_io::{read_displacement_field, read_image, write_image, write_parameter_file};
use crate::config::ElastixConfig;
use crate::elastix::result_overrides;
use crate::engine::{TransformEngine, Transformed};
use crate::error::{EngineError, Result};
use crate::process::{self, Workspace};

const RESULT_IMAGES: &[&str] = &["result.nii.gz", "result.nii"];
const DEFORMATION_FIELDS: &[&str] = &["deformationField.nii.gz", "deformationField.nii"];

/// Runs `transformix -in -tp -out [-def all]` in a private workspace.
#[derive(Debug, Clone)]
pub struct TransformixEngine<B: Backend> {
    config: ElastixConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> TransformixEngine<B> {
    pub fn new(config: ElastixConfig) -> Self {
        Self {
            config,
            _backend: PhantomData,
        }
    }
}

impl<B: Backend> TransformEngine<B> for TransformixEngine<B> {
    fn transform(
        &self,
        moving: &Image<B, 3>,
        transform: &ParameterMap,
        deformation_field: bool,
    ) -> Result<Transformed<B>> {
        let workspace = Workspace::new("mabas-transformix-")?;
        let moving_path = workspace.join("moving.nii.gz");
        let transform_path = workspace.join("TransformParameters.txt");

        write_image(&moving_path, moving).map_err(EngineError::io)?;
        write_parameter_file(&transform_path, &result_overrides().apply(transform)).map_err(EngineError::io)?;

        let mut args = vec![
            "-in".into(),
            moving_path.into_os_string(),
            "-tp".into(),
            transform_path.into_os_string(),
            "-out".into(),
            workspace.path().as_os_str().to_owned(),
        ];
        if deformation_field {
            args.push("-def".into());
            args.push("all".into());
        }
        args.extend(self.config.thread_args().into_iter().map(Into::into));

        tracing::info!("Running transformix ({})", self.config.transformix.display());
        process::run(&self.config.transformix, args)?;

        let device = moving.data().device();
        let image_path = workspace.find_output("transformix", RESULT_IMAGES)?;
        let image = read_image::<B, _>(&image_path, &device).map_err(EngineError::io)?;

        let deformation_field = if deformation_field {
            let field_path = workspace.find_output("transformix", DEFORMATION_FIELDS)?;
            Some(read_displacement_field::<B, _>(&field_path, &device).map_err(EngineError::io)?)
        } else {
            None
        };

        Ok(Transformed {
            image,
            deformation_field,
        })
    }
}

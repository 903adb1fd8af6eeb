//! Registration through the elastix executable.

use std::marker::PhantomData;
use burn::tensor::backend::Backend;
use mabas_core::image::Image;
use mabas_core::parameter::{keys, ParameterMap, ParameterOverrides};
use mabas_io::{read_image, read_parameter_file, write_image, write_parameter_file};
use crate::config::ElastixConfig;
use crate::engine::{Registration, RegistrationEngine};
use crate::error::{EngineError, Result};
use crate::process::{self, Workspace};

const RESULT_IMAGES: &[&str] = &["result.0.nii.gz", "result.0.nii"];
const TRANSFORM_PARAMETERS: &[&str] = &["TransformParameters.0.txt"];

/// Settings every run needs so the result can be read back.
pub(crate) fn result_overrides() -> ParameterOverrides {
    ParameterOverrides::new()
        .set(keys::RESULT_IMAGE_FORMAT, "nii.gz")
        .set(keys::RESULT_IMAGE_PIXEL_TYPE, "float")
}

/// Runs `elastix -f -m -p -out` in a private workspace.
#[derive(Debug, Clone)]
pub struct ElastixEngine<B: Backend> {
    config: ElastixConfig,
    _backend: PhantomData<B>,
}

impl<B: Backend> ElastixEngine<B> {
    pub fn new(config: ElastixConfig) -> Self {
        Self {
            config,
            _backend: PhantomData,
        }
    }

    pub fn config(&self) -> &ElastixConfig {
        &self.config
    }
}

impl<B: Backend> RegistrationEngine<B> for ElastixEngine<B> {
    fn register(
        &self,
        fixed: &Image<B, 3>,
        moving: &Image<B, 3>,
        parameters: &ParameterMap,
    ) -> Result<Registration<B>> {
        let workspace = Workspace::new("mabas-elastix-")?;
        let fixed_path = workspace.join("fixed.nii.gz");
        let moving_path = workspace.join("moving.nii.gz");
        let parameter_path = workspace.join("parameters.txt");

        let parameters = result_overrides()
            .set(keys::WRITE_RESULT_IMAGE, "true")
            .apply(parameters);
        write_image(&fixed_path, fixed).map_err(EngineError::io)?;
        write_image(&moving_path, moving).map_err(EngineError::io)?;
        write_parameter_file(&parameter_path, &parameters).map_err(EngineError::io)?;

        let mut args = vec![
            "-f".into(),
            fixed_path.into_os_string(),
            "-m".into(),
            moving_path.into_os_string(),
            "-p".into(),
            parameter_path.into_os_string(),
            "-out".into(),
            workspace.path().as_os_str().to_owned(),
        ];
        args.extend(self.config.thread_args().into_iter().map(Into::into));

        tracing::info!("Running elastix ({})", self.config.elastix.display());
        process::run(&self.config.elastix, args)?;

        let image_path = workspace.find_output("elastix", RESULT_IMAGES)?;
        let transform_path = workspace.find_output("elastix", TRANSFORM_PARAMETERS)?;
        let image = read_image::<B, _>(&image_path, &moving.data().device()).map_err(EngineError::io)?;
        let transform = read_parameter_file(&transform_path).map_err(EngineError::io)?;

        Ok(Registration { image, transform })
    }
}

//! Registration engines and workflows for the MABAS tools.
//!
//! Registration and transform propagation are delegated to elastix and
//! transformix child processes; displacement fields are applied in process.
//! Workflows depend only on the engine traits in [`engine`].

pub mod config;
pub mod elastix;
pub mod engine;
pub mod error;
pub mod policy;
pub mod process;
pub mod resampler;
pub mod transformix;
pub mod workflow;

pub use config::ElastixConfig;
pub use elastix::ElastixEngine;
pub use engine::{Registration, RegistrationEngine, Resampler, TransformEngine, Transformed};
pub use error::{EngineError, Result};
pub use policy::OutputPolicy;
pub use resampler::DisplacementFieldResampler;
pub use transformix::TransformixEngine;

//! Error types for engine invocations.

use thiserror::Error;

/// Failure while running a registration, transform or resampling engine.
#[derive(Error, Debug)]
pub enum EngineError {
    /// The engine executable could not be started.
    #[error("failed to start {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The engine ran but reported failure.
    #[error("{program} exited with {status}; last log lines:\n{log_tail}")]
    ProcessFailed {
        program: String,
        status: String,
        log_tail: String,
    },

    /// The engine finished without writing an expected result.
    #[error("{program} did not produce {expected}")]
    MissingOutput { program: String, expected: String },

    /// Staging inputs or collecting outputs failed.
    #[error("engine I/O error: {0}")]
    Io(String),
}

/// Result type for engine operations.
pub type Result<T> = std::result::Result<T, EngineError>;

impl EngineError {
    /// Wrap an I/O failure, keeping its full context chain.
    pub fn io(err: impl std::fmt::Display) -> Self {
        Self::Io(format!("{err:#}"))
    }

    pub fn missing_output(program: impl Into<String>, expected: impl Into<String>) -> Self {
        Self::MissingOutput {
            program: program.into(),
            expected: expected.into(),
        }
    }
}

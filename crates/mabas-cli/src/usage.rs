//! Argument parsing with usage-and-exit semantics, and logging setup.

use std::ffi::OsString;
use anyhow::Result;
use clap::error::ErrorKind;
use clap::{CommandFactory, Parser};
use tracing_subscriber::EnvFilter;

/// Outcome of parsing a command line.
#[derive(Debug)]
pub enum Parsed<T> {
    Run(T),
    /// Wrong number of positional arguments; holds the text to print.
    Usage(String),
}

fn is_count_error(kind: ErrorKind) -> bool {
    matches!(
        kind,
        ErrorKind::MissingRequiredArgument
            | ErrorKind::UnknownArgument
            | ErrorKind::TooFewValues
            | ErrorKind::TooManyValues
            | ErrorKind::WrongNumberOfValues
    )
}

/// Parse `args` (program name first).
///
/// Argument-count errors become [`Parsed::Usage`]; every other clap error
/// (help, version, invalid values) is returned for clap to report.
pub fn parse_args<T, I, A>(args: I) -> Result<Parsed<T>, clap::Error>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
{
    match T::try_parse_from(args) {
        Ok(parsed) => Ok(Parsed::Run(parsed)),
        Err(err) if is_count_error(err.kind()) => Ok(Parsed::Usage(T::command().render_help().to_string())),
        Err(err) => Err(err),
    }
}

/// Install the global `tracing` subscriber; `RUST_LOG` overrides the `info` default.
pub fn init_logging() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    // A subscriber may already be installed when tools run inside tests.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}

/// Parse, print usage on a count error, otherwise set up logging and run.
pub fn run_tool<T, I, A, F>(args: I, run: F) -> Result<()>
where
    T: Parser,
    I: IntoIterator<Item = A>,
    A: Into<OsString> + Clone,
    F: FnOnce(T) -> Result<()>,
{
    let parsed = match parse_args::<T, _, _>(args) {
        Ok(parsed) => parsed,
        Err(err) => err.exit(),
    };
    match parsed {
        Parsed::Usage(text) => {
            print!("{}", text);
            Ok(())
        }
        Parsed::Run(args) => {
            init_logging();
            run(args)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::args::ThresholdProbabilityArgs;

    #[test]
    fn test_missing_argument_is_usage() {
        let parsed = parse_args::<ThresholdProbabilityArgs, _, _>(["mabas-threshold-probability", "in.nii.gz"]).unwrap();
        match parsed {
            Parsed::Usage(text) => assert!(text.contains("Usage")),
            Parsed::Run(_) => panic!("expected usage"),
        }
    }

    #[test]
    fn test_extra_argument_is_usage() {
        let parsed = parse_args::<ThresholdProbabilityArgs, _, _>([
            "mabas-threshold-probability",
            "in.nii.gz",
            "out.nii.gz",
            "0.5",
            "extra",
        ])
        .unwrap();
        assert!(matches!(parsed, Parsed::Usage(_)));
    }

    #[test]
    fn test_bad_value_is_a_clap_error() {
        let err = parse_args::<ThresholdProbabilityArgs, _, _>([
            "mabas-threshold-probability",
            "in.nii.gz",
            "out.nii.gz",
            "half",
        ])
        .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValueValidation);
    }
}

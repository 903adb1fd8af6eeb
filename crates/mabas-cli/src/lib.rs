//! Command-line front ends for the MABAS registration tools.
//!
//! Each binary in `src/bin` parses one argument struct from [`args`] and hands
//! it to the matching function in [`commands`] through [`run_tool`].

pub mod args;
pub mod commands;
pub mod usage;

pub use usage::{init_logging, parse_args, run_tool, Parsed};

/// Backend every tool runs on.
pub type Backend = burn_ndarray::NdArray<f32>;

//! Argument structs, one per tool.
//!
//! Positional arguments are fixed in number and order. Engine locations, the
//! thread count and the parameter library are named options with environment
//! fallbacks.

use std::path::PathBuf;
use clap::{ArgAction, Args, Parser};
use mabas_core::image::ImageKind;
use mabas_core::interpolation::InterpolationOrder;
use mabas_io::parameter_library::PARAMETER_DIR_ENV;
use mabas_registration::config::{ELASTIX_ENV, THREADS_ENV, TRANSFORMIX_ENV};
use mabas_registration::ElastixConfig;

/// `0` or `1`.
pub fn parse_flag(value: &str) -> Result<bool, String> {
    match value.trim() {
        "0" => Ok(false),
        "1" => Ok(true),
        other => Err(format!("expected 0 or 1, got `{}`", other)),
    }
}

/// `0` for a structure (label) image, `1` for an intensity image.
pub fn parse_kind(value: &str) -> Result<ImageKind, String> {
    parse_flag(value).map(|intensity| ImageKind::from_flag(u8::from(intensity)))
}

/// Where the elastix and transformix executables live.
#[derive(Debug, Clone, Args)]
pub struct EngineArgs {
    /// elastix executable
    #[arg(long, env = ELASTIX_ENV, default_value = "elastix")]
    pub elastix: PathBuf,

    /// transformix executable
    #[arg(long, env = TRANSFORMIX_ENV, default_value = "transformix")]
    pub transformix: PathBuf,

    /// Threads passed to the engine
    #[arg(long, env = THREADS_ENV)]
    pub threads: Option<usize>,
}

impl EngineArgs {
    pub fn config(&self) -> ElastixConfig {
        ElastixConfig::new()
            .with_elastix(&self.elastix)
            .with_transformix(&self.transformix)
            .with_threads(self.threads)
    }
}

#[derive(Debug, Parser)]
#[command(name = "mabas-rigid-register")]
#[command(about = "Rigid registration using elastix")]
pub struct RigidRegisterArgs {
    /// Fixed image
    pub fixed: PathBuf,
    /// Moving image
    pub moving: PathBuf,
    /// Output base name; writes <name>.nii.gz and <name>.txt
    pub output: PathBuf,
    /// Parameter file, looked up in the working directory then the library
    pub parameters: PathBuf,
    /// Structure-guided registration (0 or 1)
    #[arg(value_name = "STRUCTURE_GUIDED", default_value = "0", value_parser = parse_flag, action = ArgAction::Set)]
    pub structure_guided: bool,

    /// Directory of stock parameter files
    #[arg(long, env = PARAMETER_DIR_ENV)]
    pub parameter_dir: Option<PathBuf>,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-bspline-register")]
#[command(about = "B-spline (non-rigid) registration using elastix")]
pub struct BSplineRegisterArgs {
    /// Fixed image
    pub fixed: PathBuf,
    /// Moving image
    pub moving: PathBuf,
    /// Parameter file
    pub parameters: PathBuf,
    /// Output base name; writes <name>.nii.gz and <name>.txt
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-propagate-rigid")]
#[command(about = "Apply a rigid elastix transform to an image using transformix")]
pub struct PropagateRigidArgs {
    /// Fixed image; defines the output geometry
    pub fixed: PathBuf,
    /// Moving image
    pub moving: PathBuf,
    /// Transform parameter file
    pub transform: PathBuf,
    /// Structure (0) or image (1)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    pub kind: ImageKind,
    /// Interpolation order (0 nearest, 1 linear, 2-5 B-spline)
    pub order: InterpolationOrder,
    /// Output image
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-propagate-bspline")]
#[command(about = "Apply a B-spline elastix transform to an image using transformix")]
pub struct PropagateBSplineArgs {
    /// Fixed image; defines the output geometry
    pub fixed: PathBuf,
    /// Moving image
    pub moving: PathBuf,
    /// Transform parameter file
    pub transform: PathBuf,
    /// Binary label image (0 or 1)
    #[arg(value_name = "BINARY", value_parser = parse_flag, action = ArgAction::Set)]
    pub binary: bool,
    /// Interpolation order (0 nearest, 1 linear, 2-5 B-spline)
    pub order: InterpolationOrder,
    /// Also write <name>_DeformationField.nii.gz (0 or 1)
    #[arg(value_name = "SAVE_FIELD", value_parser = parse_flag, action = ArgAction::Set)]
    pub save_deformation_field: bool,
    /// Output base name; writes <name>.nii.gz
    pub output: PathBuf,

    #[command(flatten)]
    pub engine: EngineArgs,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-apply-field")]
#[command(about = "Apply a displacement field to an image")]
pub struct ApplyFieldArgs {
    /// Displacement field
    pub field: PathBuf,
    /// Output image
    pub output: PathBuf,
    /// Interpolation order (0 nearest, 1 linear, 2-5 B-spline)
    pub order: InterpolationOrder,
    /// Structure (0) or image (1)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    pub kind: ImageKind,
    /// Input image
    pub input: PathBuf,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-apply-field-multiple")]
#[command(about = "Apply a displacement field to several images sharing a name template")]
pub struct ApplyFieldMultipleArgs {
    /// Displacement field
    pub field: PathBuf,
    /// Output template, e.g. Case_01_to_Case_02_{0}_DEMONS.nii.gz
    pub output: String,
    /// Interpolation order (0 nearest, 1 linear, 2-5 B-spline)
    pub order: InterpolationOrder,
    /// Structure (0) or image (1)
    #[arg(value_name = "KIND", value_parser = parse_kind)]
    pub kind: ImageKind,
    /// Input template, e.g. Case_01_{0}.nii.gz
    pub input: String,
    /// Values substituted for {0}, e.g. WHOLEHEART RIGHTATRIUM
    #[arg(required = true, num_args = 1..)]
    pub tokens: Vec<String>,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-threshold-probability")]
#[command(about = "Threshold a probability map, fill holes and keep the largest component")]
pub struct ThresholdProbabilityArgs {
    /// Probability map
    pub input: PathBuf,
    /// Binary output image
    pub output: PathBuf,
    /// Lowest probability counted as foreground
    pub threshold: f32,
}

#[derive(Debug, Parser)]
#[command(name = "mabas-local-weighted-vote")]
#[command(about = "Fuse propagated atlas labels with a local weighted vote")]
pub struct LocalWeightedVoteArgs {
    /// Target image the atlases were registered to
    pub target: PathBuf,
    /// Glob of registered atlas images, e.g. "atlas/Case_*_to_Target.nii.gz"
    pub atlases: String,
    /// Glob of propagated labels, {0} is the structure, e.g. "labels/Case_*_{0}.nii.gz"
    pub labels: String,
    /// Text file with one structure name per line
    pub structures: PathBuf,
    /// Output template, e.g. Target_{0}.nii.gz
    pub output: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_argument_structs_are_well_formed() {
        RigidRegisterArgs::command().debug_assert();
        BSplineRegisterArgs::command().debug_assert();
        PropagateRigidArgs::command().debug_assert();
        PropagateBSplineArgs::command().debug_assert();
        ApplyFieldArgs::command().debug_assert();
        ApplyFieldMultipleArgs::command().debug_assert();
        ThresholdProbabilityArgs::command().debug_assert();
        LocalWeightedVoteArgs::command().debug_assert();
    }

    #[test]
    fn test_flags() {
        assert_eq!(parse_flag("0"), Ok(false));
        assert_eq!(parse_flag("1"), Ok(true));
        assert!(parse_flag("2").is_err());
        assert_eq!(parse_kind("0"), Ok(ImageKind::Structure));
        assert_eq!(parse_kind("1"), Ok(ImageKind::Intensity));
    }

    #[test]
    fn test_structure_guided_defaults_off() {
        let args = RigidRegisterArgs::try_parse_from(["rigid", "f.nii.gz", "m.nii.gz", "out", "Rigid.txt"]).unwrap();
        assert!(!args.structure_guided);
        let args = RigidRegisterArgs::try_parse_from(["rigid", "f.nii.gz", "m.nii.gz", "out", "Rigid.txt", "1"]).unwrap();
        assert!(args.structure_guided);
    }

    #[test]
    fn test_engine_options() {
        let args = PropagateRigidArgs::try_parse_from([
            "propagate",
            "f.nii.gz",
            "m.nii.gz",
            "t.txt",
            "1",
            "3",
            "out.nii.gz",
            "--transformix",
            "/opt/elastix/bin/transformix",
            "--threads",
            "4",
        ])
        .unwrap();
        assert_eq!(args.kind, ImageKind::Intensity);
        assert_eq!(args.order, InterpolationOrder::CUBIC);
        let config = args.engine.config();
        assert_eq!(config.transformix, PathBuf::from("/opt/elastix/bin/transformix"));
        assert_eq!(config.threads, Some(4));
    }

    #[test]
    fn test_order_out_of_range_is_rejected() {
        let err = ApplyFieldArgs::try_parse_from(["apply", "field.nii.gz", "out.nii.gz", "7", "0", "in.nii.gz"]).unwrap_err();
        assert_eq!(err.kind(), clap::error::ErrorKind::ValueValidation);
    }

    #[test]
    fn test_tokens_collected() {
        let args = ApplyFieldMultipleArgs::try_parse_from([
            "multi",
            "field.nii.gz",
            "out_{0}.nii.gz",
            "0",
            "0",
            "in_{0}.nii.gz",
            "WHOLEHEART",
            "RIGHTATRIUM",
        ])
        .unwrap();
        assert_eq!(args.tokens, vec!["WHOLEHEART", "RIGHTATRIUM"]);
    }

    #[test]
    fn test_vote_patterns_are_kept_verbatim() {
        let args = LocalWeightedVoteArgs::try_parse_from([
            "vote",
            "target.nii.gz",
            "atlas/*.nii.gz",
            "labels/*_{0}.nii.gz",
            "structures.txt",
            "Target_{0}.nii.gz",
        ])
        .unwrap();
        assert_eq!(args.atlases, "atlas/*.nii.gz");
        assert_eq!(args.labels, "labels/*_{0}.nii.gz");
        assert_eq!(args.output, "Target_{0}.nii.gz");
    }
}

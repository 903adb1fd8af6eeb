//! End-to-end workflows behind the command-line tools.
//!
//! Each workflow has an in-memory core that takes images and engines, and a
//! `run_*` wrapper that reads its inputs from disk and writes its outputs.

pub mod rigid;
pub mod bspline;
pub mod propagate;
pub mod deformation;
pub mod threshold;
pub mod vote;

use std::ffi::OsString;
use std::path::{Path, PathBuf};

pub use rigid::{register_rigid, run_rigid_registration, RigidRegistration};
pub use bspline::{register_bspline, run_bspline_registration, BSplineRegistration};
pub use propagate::{
    propagate_bspline, propagate_rigid, run_bspline_propagation, run_rigid_propagation, BSplinePropagation,
    PropagationOutputs, RigidPropagation,
};
pub use deformation::{apply_field, expand_targets, expand_template, run_field_application, FieldTarget};
pub use threshold::{run_threshold_probability, ThresholdProbability};
pub use vote::{glob_sorted, read_structure_list, run_local_weighted_vote, FusedStructure, WeightedVote};

/// Extension of every image a workflow derives from a base name.
pub const IMAGE_EXTENSION: &str = ".nii.gz";
/// Extension of a written transform parameter file.
pub const TRANSFORM_EXTENSION: &str = ".txt";

/// `base` with `suffix` appended verbatim (no extension replacement).
pub fn with_suffix(base: &Path, suffix: &str) -> PathBuf {
    let mut name: OsString = base.as_os_str().to_owned();
    name.push(suffix);
    PathBuf::from(name)
}

/// Files written by a registration workflow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrationOutputs {
    pub image: PathBuf,
    pub transform: PathBuf,
}

impl RegistrationOutputs {
    /// `<base>.nii.gz` and `<base>.txt`.
    pub fn from_base(base: &Path) -> Self {
        Self {
            image: with_suffix(base, IMAGE_EXTENSION),
            transform: with_suffix(base, TRANSFORM_EXTENSION),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_suffix_is_appended_not_replaced() {
        assert_eq!(with_suffix(Path::new("out/Case_01.rigid"), ".nii.gz"), PathBuf::from("out/Case_01.rigid.nii.gz"));
        let outputs = RegistrationOutputs::from_base(Path::new("Case_01_to_02"));
        assert_eq!(outputs.image, PathBuf::from("Case_01_to_02.nii.gz"));
        assert_eq!(outputs.transform, PathBuf::from("Case_01_to_02.txt"));
    }
}

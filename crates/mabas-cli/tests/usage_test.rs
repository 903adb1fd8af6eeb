use std::fs;
use std::path::Path;
use tempfile::tempdir;
use mabas_cli::args::{
    ApplyFieldArgs, ApplyFieldMultipleArgs, BSplineRegisterArgs, LocalWeightedVoteArgs, PropagateBSplineArgs,
    PropagateRigidArgs, RigidRegisterArgs, ThresholdProbabilityArgs,
};
use mabas_cli::{commands, parse_args, run_tool, Parsed};

fn arg(dir: &Path, name: &str) -> String {
    dir.join(name).display().to_string()
}

fn entries(dir: &Path) -> usize {
    fs::read_dir(dir).unwrap().count()
}

#[test]
fn test_rigid_register_wrong_counts_touch_nothing() {
    let dir = tempdir().unwrap();
    let d = dir.path();
    let short = vec!["mabas-rigid-register".to_string(), arg(d, "fixed.nii.gz"), arg(d, "moving.nii.gz")];
    run_tool::<RigidRegisterArgs, _, _, _>(short, commands::rigid_register).unwrap();

    let long = vec![
        "mabas-rigid-register".to_string(),
        arg(d, "fixed.nii.gz"),
        arg(d, "moving.nii.gz"),
        arg(d, "out"),
        "Rigid.txt".to_string(),
        "0".to_string(),
        "surplus".to_string(),
    ];
    run_tool::<RigidRegisterArgs, _, _, _>(long, commands::rigid_register).unwrap();
    assert_eq!(entries(d), 0);
}

#[test]
fn test_every_tool_prints_usage_without_arguments() {
    let dir = tempdir().unwrap();
    run_tool::<BSplineRegisterArgs, _, _, _>(["mabas-bspline-register"], commands::bspline_register).unwrap();
    run_tool::<PropagateRigidArgs, _, _, _>(["mabas-propagate-rigid"], commands::propagate_rigid).unwrap();
    run_tool::<PropagateBSplineArgs, _, _, _>(["mabas-propagate-bspline"], commands::propagate_bspline).unwrap();
    run_tool::<ApplyFieldArgs, _, _, _>(["mabas-apply-field"], commands::apply_field).unwrap();
    run_tool::<ApplyFieldMultipleArgs, _, _, _>(["mabas-apply-field-multiple"], commands::apply_field_multiple)
        .unwrap();
    run_tool::<ThresholdProbabilityArgs, _, _, _>(["mabas-threshold-probability"], commands::threshold_probability)
        .unwrap();
    run_tool::<LocalWeightedVoteArgs, _, _, _>(["mabas-local-weighted-vote"], commands::local_weighted_vote).unwrap();
    assert_eq!(entries(dir.path()), 0);
}

#[test]
fn test_apply_field_multiple_needs_a_token() {
    let dir = tempdir().unwrap();
    let d = dir.path();
    let args = vec![
        "mabas-apply-field-multiple".to_string(),
        arg(d, "field.nii.gz"),
        arg(d, "out_{0}.nii.gz"),
        "1".to_string(),
        "0".to_string(),
        arg(d, "in_{0}.nii.gz"),
    ];
    let parsed = parse_args::<ApplyFieldMultipleArgs, _, _>(args.clone()).unwrap();
    assert!(matches!(parsed, Parsed::Usage(_)));
    run_tool::<ApplyFieldMultipleArgs, _, _, _>(args, commands::apply_field_multiple).unwrap();
    assert_eq!(entries(d), 0);
}

#[test]
fn test_propagate_bspline_extra_argument_is_usage() {
    let parsed = parse_args::<PropagateBSplineArgs, _, _>([
        "mabas-propagate-bspline",
        "fixed.nii.gz",
        "moving.nii.gz",
        "t.txt",
        "1",
        "3",
        "0",
        "out",
        "surplus",
    ])
    .unwrap();
    match parsed {
        Parsed::Usage(text) => assert!(text.contains("mabas-propagate-bspline")),
        Parsed::Run(_) => panic!("expected usage"),
    }
}

#[test]
fn test_full_argument_list_reaches_the_tool() {
    let dir = tempdir().unwrap();
    let d = dir.path();
    // Parses, then fails on the missing input rather than printing usage.
    let result = run_tool::<ThresholdProbabilityArgs, _, _, _>(
        vec![
            "mabas-threshold-probability".to_string(),
            arg(d, "missing.nii.gz"),
            arg(d, "out.nii.gz"),
            "0.5".to_string(),
        ],
        commands::threshold_probability,
    );
    assert!(result.is_err());
    assert!(!d.join("out.nii.gz").exists());
}

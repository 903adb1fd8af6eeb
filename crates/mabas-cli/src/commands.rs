//! Tool bodies: turn parsed arguments into workflow requests and run them.

use anyhow::Result;
use mabas_io::ParameterLibrary;
use mabas_registration::workflow::{
    expand_targets, run_bspline_propagation, run_bspline_registration, run_field_application,
    run_local_weighted_vote, run_rigid_propagation, run_rigid_registration, run_threshold_probability,
    BSplinePropagation, BSplineRegistration, FieldTarget, RigidPropagation, RigidRegistration,
    ThresholdProbability, WeightedVote,
};
use mabas_registration::{ElastixEngine, TransformixEngine};
use crate::args::{
    ApplyFieldArgs, ApplyFieldMultipleArgs, BSplineRegisterArgs, LocalWeightedVoteArgs, PropagateBSplineArgs,
    PropagateRigidArgs, RigidRegisterArgs, ThresholdProbabilityArgs,
};
use crate::Backend;

pub fn rigid_register(args: RigidRegisterArgs) -> Result<()> {
    tracing::info!("Rigid registration using elastix");
    if args.structure_guided {
        tracing::warn!("Structure-guided registration: images are normalised by their maximum");
    }
    let engine = ElastixEngine::<Backend>::new(args.engine.config());
    let library = ParameterLibrary::new(args.parameter_dir);
    let request = RigidRegistration {
        fixed: args.fixed,
        moving: args.moving,
        output_base: args.output,
        parameters: args.parameters,
        structure_guided: args.structure_guided,
    };
    let outputs = run_rigid_registration::<Backend, _>(&engine, &library, &request, &Default::default())?;
    tracing::info!("Wrote {} and {}", outputs.image.display(), outputs.transform.display());
    Ok(())
}

pub fn bspline_register(args: BSplineRegisterArgs) -> Result<()> {
    tracing::info!("B-spline registration using elastix");
    let engine = ElastixEngine::<Backend>::new(args.engine.config());
    let request = BSplineRegistration {
        fixed: args.fixed,
        moving: args.moving,
        parameters: args.parameters,
        output_base: args.output,
    };
    let outputs = run_bspline_registration::<Backend, _>(&engine, &request, &Default::default())?;
    tracing::info!("Wrote {} and {}", outputs.image.display(), outputs.transform.display());
    Ok(())
}

pub fn propagate_rigid(args: PropagateRigidArgs) -> Result<()> {
    let engine = TransformixEngine::<Backend>::new(args.engine.config());
    let request = RigidPropagation {
        fixed: args.fixed,
        moving: args.moving,
        transform: args.transform,
        kind: args.kind,
        order: args.order,
        output: args.output,
    };
    run_rigid_propagation::<Backend, _>(&engine, &request, &Default::default())?;
    Ok(())
}

pub fn propagate_bspline(args: PropagateBSplineArgs) -> Result<()> {
    let engine = TransformixEngine::<Backend>::new(args.engine.config());
    let request = BSplinePropagation {
        fixed: args.fixed,
        moving: args.moving,
        transform: args.transform,
        binary: args.binary,
        order: args.order,
        save_deformation_field: args.save_deformation_field,
        output_base: args.output,
    };
    run_bspline_propagation::<Backend, _>(&engine, &request, &Default::default())?;
    Ok(())
}

pub fn apply_field(args: ApplyFieldArgs) -> Result<()> {
    let targets = [FieldTarget {
        input: args.input,
        output: args.output,
        kind: args.kind,
    }];
    run_field_application::<Backend>(&args.field, &targets, args.order, &Default::default())?;
    Ok(())
}

pub fn apply_field_multiple(args: ApplyFieldMultipleArgs) -> Result<()> {
    let targets = expand_targets(&args.input, &args.output, &args.tokens, args.kind);
    let written = run_field_application::<Backend>(&args.field, &targets, args.order, &Default::default())?;
    tracing::info!("Resampled {} images", written.len());
    Ok(())
}

pub fn threshold_probability(args: ThresholdProbabilityArgs) -> Result<()> {
    let request = ThresholdProbability {
        input: args.input,
        output: args.output,
        threshold: args.threshold,
    };
    run_threshold_probability::<Backend>(&request, &Default::default())?;
    Ok(())
}

pub fn local_weighted_vote(args: LocalWeightedVoteArgs) -> Result<()> {
    let request = WeightedVote {
        target: args.target,
        atlases: args.atlases,
        labels: args.labels,
        structures: args.structures,
        output: args.output,
    };
    let fused = run_local_weighted_vote::<Backend>(&request, &Default::default())?;
    tracing::info!("Fused {} structures", fused.len());
    Ok(())
}

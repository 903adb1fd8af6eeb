use mabas_cli::args::PropagateRigidArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<PropagateRigidArgs, _, _, _>(std::env::args_os(), commands::propagate_rigid)
}

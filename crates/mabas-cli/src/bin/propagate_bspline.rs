use mabas_cli::args::PropagateBSplineArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<PropagateBSplineArgs, _, _, _>(std::env::args_os(), commands::propagate_bspline)
}

use mabas_cli::args::BSplineRegisterArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<BSplineRegisterArgs, _, _, _>(std::env::args_os(), commands::bspline_register)
}

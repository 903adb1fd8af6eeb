use mabas_cli::args::ApplyFieldArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<ApplyFieldArgs, _, _, _>(std::env::args_os(), commands::apply_field)
}

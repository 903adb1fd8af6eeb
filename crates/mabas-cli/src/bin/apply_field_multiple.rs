use mabas_cli::args::ApplyFieldMultipleArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<ApplyFieldMultipleArgs, _, _, _>(std::env::args_os(), commands::apply_field_multiple)
}

use mabas_cli::args::RigidRegisterArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<RigidRegisterArgs, _, _, _>(std::env::args_os(), commands::rigid_register)
}

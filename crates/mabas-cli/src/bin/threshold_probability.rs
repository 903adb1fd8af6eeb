use mabas_cli::args::ThresholdProbabilityArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<ThresholdProbabilityArgs, _, _, _>(std::env::args_os(), commands::threshold_probability)
}

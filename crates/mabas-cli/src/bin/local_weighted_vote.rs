use mabas_cli::args::LocalWeightedVoteArgs;
use mabas_cli::{commands, run_tool};

fn main() -> anyhow::Result<()> {
    run_tool::<LocalWeightedVoteArgs, _, _, _>(std::env::args_os(), commands::local_weighted_vote)
}

mod run;
mod stats;
mod util;

use anyhow::Result;
use clap::{Parser, Subcommand};
use run::{run_simulation, RunArgs};
use stats::{run_stats, StatsArgs};

#[derive(Parser, Debug)]
#[command(version, about)]
struct CLIParser {
    /// Log every generation and pattern parsing details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    action: Action,
}

#[derive(Subcommand, Debug)]
enum Action {
    /// Run the simulation on a toroidal grid, one fork-join step per frame
    Run(RunArgs),
    /// Print size, population and bounding box of a pattern file
    Stats(StatsArgs),
}

fn main() -> Result<()> {
    let args = CLIParser::parse();
    util::init_logging(args.verbose);

    match args.action {
        Action::Run(args) => run_simulation(args),
        Action::Stats(args) => run_stats(args),
    }
}

use std::error::Error;

use clap::{Parser, Subcommand};
use commands::{
    classify::{self, ClassifyArgs},
    results::{self, ResultsArgs},
    run::{self, RunArgs},
    sweep::{self, SweepArgs},
};

mod commands;
mod logging;

#[derive(Parser, Debug)]
#[command(name = "ljs", about = "Lennard-Jones parameter sweep driver")]
struct Cli {
    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "info")]
    log_level: String,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Derive, dispatch and classify every point of a sweep.
    Sweep(SweepArgs),
    /// Run a single simulation from a run config.
    Run(RunArgs),
    /// Classify one event log and print the record as JSON.
    Classify(ClassifyArgs),
    /// Aggregate the outcomes of an existing sweep without running it.
    Results(ResultsArgs),
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();
    logging::init(&cli.log_level)?;
    match cli.command {
        Command::Sweep(args) => sweep::run(&args),
        Command::Run(args) => run::run(&args),
        Command::Classify(args) => classify::run(&args),
        Command::Results(args) => results::run(&args),
    }
}

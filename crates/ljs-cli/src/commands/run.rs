use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use ljs_config::RunConfig;
use ljs_sweep::{classify_point, run_single};

use super::{EngineArgs, SeedMode};

#[derive(Args, Debug)]
pub struct RunArgs {
    /// Run config file; outputs land in its directory.
    pub config: PathBuf,
    #[command(flatten)]
    pub engine: EngineArgs,
    /// Write a default run config to CONFIG first (overwrites).
    #[arg(long)]
    pub init: bool,
    /// Seed mode: recorded, random, derived:<master>, or a fixed integer.
    #[arg(long, default_value = "recorded")]
    pub seed: SeedMode,
}

pub fn run(args: &RunArgs) -> Result<(), Box<dyn Error>> {
    let engine = args.engine.build();
    let object = args.init.then(RunConfig::default);
    let mut seeds = args.seed.policy();
    let job = run_single(&args.config, object, &mut seeds, &engine)?;
    let record = classify_point(&job.config_file)?;
    println!(
        "{}: {:?} after {} steps (seed {})",
        job.directory.display(),
        record.status,
        record.total_time_steps,
        job.config.system.random_seed
    );
    Ok(())
}

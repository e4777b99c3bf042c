use std::error::Error;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Args;
use ljs_config::SweepConfig;
use ljs_sweep::{write_reports, ChunkSelection, PoolStatus, SweepRunner, SweepSummary};
use tracing::info;

use super::{parse_seconds, print_failures, EngineArgs, SeedMode};

#[derive(Args, Debug)]
pub struct SweepArgs {
    /// Sweep config file; point directories are created next to it.
    pub config: PathBuf,
    #[command(flatten)]
    pub engine: EngineArgs,
    /// Write a default sweep config to CONFIG first (overwrites).
    #[arg(long)]
    pub init: bool,
    /// Worker threads; defaults to the available cores.
    #[arg(long)]
    pub threads: Option<usize>,
    /// Seconds between progress reports.
    #[arg(long, default_value = "1", value_parser = parse_seconds)]
    pub poll_interval: Duration,
    /// Number of chunks the grid is split into.
    #[arg(long, default_value_t = 1)]
    pub chunk_count: usize,
    /// Chunks to run: `all` or a list such as `[0-2,5]`.
    #[arg(long, default_value = "all")]
    pub chunks: ChunkSelection,
    /// Seconds to rest between consecutive chunks.
    #[arg(long, default_value = "0", value_parser = parse_seconds)]
    pub rest_time: Duration,
    /// Seed mode: recorded, random, derived:<master>, or a fixed integer.
    #[arg(long, default_value = "recorded")]
    pub seed: SeedMode,
    /// Write the chunk reports as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &SweepArgs) -> Result<(), Box<dyn Error>> {
    let mut runner = SweepRunner::new(Arc::new(args.engine.build()))
        .polling_interval(args.poll_interval)
        .seeds(args.seed.policy());
    if let Some(threads) = args.threads {
        runner = runner.thread_count(threads);
    }
    let object = args.init.then(SweepConfig::default);

    let mut last = None;
    let reports = runner.run_chunks(
        &args.config,
        object,
        &args.chunks,
        args.chunk_count,
        args.rest_time,
        |status: PoolStatus| {
            if last != Some(status) {
                info!(
                    queued = status.queued,
                    running = status.running,
                    completed = status.completed,
                    "progress"
                );
                last = Some(status);
            }
        },
    )?;

    let mut total = SweepSummary::default();
    for report in &reports {
        println!(
            "chunk {}/{}: {}",
            report.chunk_index + 1,
            report.chunk_count,
            report.summary
        );
        print_failures(&report.result);
        total.merge(&report.summary);
    }
    if reports.len() > 1 {
        println!("total: {total}");
    }
    if let Some(path) = &args.report {
        write_reports(&reports, path)?;
    }
    Ok(())
}

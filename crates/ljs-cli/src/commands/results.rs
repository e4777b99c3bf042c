use std::error::Error;
use std::path::PathBuf;

use clap::Args;
use ljs_sweep::{collect_results, load_sweep, plan_chunk, sweep_root, ChunkSpec, SweepReport};

use super::print_failures;

#[derive(Args, Debug)]
pub struct ResultsArgs {
    /// Sweep config file of a sweep that has already run.
    pub config: PathBuf,
    /// Number of chunks the grid was split into.
    #[arg(long, default_value_t = 1)]
    pub chunk_count: usize,
    /// Chunk to aggregate.
    #[arg(long, default_value_t = 0)]
    pub chunk: usize,
    /// Write the report as JSON.
    #[arg(long)]
    pub report: Option<PathBuf>,
}

pub fn run(args: &ResultsArgs) -> Result<(), Box<dyn Error>> {
    let chunk = ChunkSpec::new(args.chunk_count, args.chunk)?;
    let sweep = load_sweep(&args.config, None)?;
    let points = plan_chunk(&sweep.grid(), chunk)?;
    let result = collect_results(&sweep, &sweep_root(&args.config), &points)?;
    let report = SweepReport::new(&sweep, chunk, result)?;

    println!("{}", report.summary);
    print_failures(&report.result);
    if let Some(path) = &args.report {
        report.write(path)?;
    }
    Ok(())
}

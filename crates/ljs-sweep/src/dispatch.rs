use std::collections::BTreeSet;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use ljs_config::{read_config, write_config, RunConfig, SweepConfig};
use ljs_core::errors::{ErrorInfo, SweepError};
use tracing::{info, warn};

use crate::aggregate::collect_results;
use crate::coordinator::{Coordinator, PoolStatus};
use crate::derive::{RunConfigDeriver, SeedPolicy};
use crate::engine::{RunJob, SimulationEngine};
use crate::grid::{plan_chunk, ChunkSpec};
use crate::report::SweepReport;

fn selection_info(input: &str, message: &str) -> ErrorInfo {
    ErrorInfo::new("chunk_selection", message)
        .with_context("selection", input)
        .with_hint("use `all` or a list such as `[0-2,5]`")
}

fn selection_error(input: &str, message: &str) -> SweepError {
    SweepError::Grid(selection_info(input, message))
}

/// Which chunks of a split grid to run.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ChunkSelection {
    /// Every chunk in order.
    #[default]
    All,
    /// Listed chunk indices in the given order.
    Indices(Vec<usize>),
}

impl ChunkSelection {
    /// Parses `all` or a comma list of indices and inclusive ranges, with
    /// optional surrounding brackets: `[0-2,5]`.
    ///
    /// An empty list and an index listed twice are rejected.
    pub fn parse(input: &str) -> Result<Self, SweepError> {
        let trimmed = input.trim();
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(ChunkSelection::All);
        }
        let inner = trimmed
            .strip_prefix('[')
            .and_then(|rest| rest.strip_suffix(']'))
            .unwrap_or(trimmed);

        let mut indices = Vec::new();
        for part in inner.split(',').map(str::trim).filter(|part| !part.is_empty()) {
            let parse = |text: &str| {
                text.trim()
                    .parse::<usize>()
                    .map_err(|_| selection_error(input, "chunk index is not a number"))
            };
            match part.split_once('-') {
                Some((first, last)) => {
                    let (first, last) = (parse(first)?, parse(last)?);
                    if first > last {
                        return Err(selection_error(input, "chunk range runs backwards"));
                    }
                    indices.extend(first..=last);
                }
                None => indices.push(parse(part)?),
            }
        }
        if indices.is_empty() {
            return Err(selection_error(input, "no chunks selected"));
        }
        let mut seen = BTreeSet::new();
        if let Some(&repeated) = indices.iter().find(|&&index| !seen.insert(index)) {
            return Err(SweepError::Grid(
                selection_info(input, "chunk listed more than once")
                    .with_context("chunk_index", repeated.to_string()),
            ));
        }
        Ok(ChunkSelection::Indices(indices))
    }

    /// Validated chunks for a grid split `chunk_count` ways.
    pub fn resolve(&self, chunk_count: usize) -> Result<Vec<ChunkSpec>, SweepError> {
        ChunkSpec::new(chunk_count, 0)?;
        match self {
            ChunkSelection::All => (0..chunk_count)
                .map(|index| ChunkSpec::new(chunk_count, index))
                .collect(),
            ChunkSelection::Indices(indices) => indices
                .iter()
                .map(|&index| ChunkSpec::new(chunk_count, index))
                .collect(),
        }
    }
}

impl FromStr for ChunkSelection {
    type Err = SweepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Loads the sweep config at `path`, or persists `object` there.
///
/// A supplied object wins and is written with every default filled in.
pub fn load_sweep(path: &Path, object: Option<SweepConfig>) -> Result<SweepConfig, SweepError> {
    match object {
        Some(sweep) => {
            write_config(path, &sweep)?;
            Ok(sweep)
        }
        None => read_config(path).map_err(|err| missing_config(err, path)),
    }
}

fn missing_config(err: SweepError, path: &Path) -> SweepError {
    match err {
        SweepError::MissingOutput(info) => SweepError::Config(
            ErrorInfo::new("config_missing", "no config file or config object supplied")
                .with_context("cause", info.message)
                .with_path(path),
        ),
        other => other,
    }
}

/// Directory the per-point directories of a config file live under.
pub fn sweep_root(config_path: &Path) -> PathBuf {
    match config_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    }
}

/// Drives sweeps: derives configs, dispatches jobs and aggregates outcomes.
pub struct SweepRunner {
    engine: Arc<dyn SimulationEngine>,
    thread_count: usize,
    polling_interval: Duration,
    seeds: SeedPolicy,
}

impl std::fmt::Debug for SweepRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SweepRunner")
            .field("thread_count", &self.thread_count)
            .field("polling_interval", &self.polling_interval)
            .field("seeds", &self.seeds)
            .finish_non_exhaustive()
    }
}

impl SweepRunner {
    /// Runner using `engine`, one thread per available core, a one second
    /// polling interval and recorded seeds.
    pub fn new(engine: Arc<dyn SimulationEngine>) -> Self {
        Self {
            engine,
            thread_count: thread::available_parallelism().map_or(1, usize::from),
            polling_interval: Duration::from_secs(1),
            seeds: SeedPolicy::Recorded,
        }
    }

    /// Sets the worker count.
    pub fn thread_count(mut self, thread_count: usize) -> Self {
        self.thread_count = thread_count.max(1);
        self
    }

    /// Sets how often progress is reported.
    pub fn polling_interval(mut self, interval: Duration) -> Self {
        self.polling_interval = interval;
        self
    }

    /// Sets the seed policy.
    pub fn seeds(mut self, seeds: SeedPolicy) -> Self {
        self.seeds = seeds;
        self
    }

    /// Runs one chunk of the sweep described at `config_path`.
    pub fn run<F>(
        &mut self,
        config_path: &Path,
        object: Option<SweepConfig>,
        chunk: ChunkSpec,
        progress: F,
    ) -> Result<SweepReport, SweepError>
    where
        F: FnMut(PoolStatus),
    {
        let sweep = load_sweep(config_path, object)?;
        self.run_loaded(&sweep, &sweep_root(config_path), chunk, progress)
    }

    /// Runs the selected chunks in order, resting between consecutive chunks.
    pub fn run_chunks<F>(
        &mut self,
        config_path: &Path,
        object: Option<SweepConfig>,
        selection: &ChunkSelection,
        chunk_count: usize,
        rest: Duration,
        mut progress: F,
    ) -> Result<Vec<SweepReport>, SweepError>
    where
        F: FnMut(PoolStatus),
    {
        let chunks = selection.resolve(chunk_count)?;
        let sweep = load_sweep(config_path, object)?;
        let root = sweep_root(config_path);
        let mut reports = Vec::with_capacity(chunks.len());
        for (position, chunk) in chunks.into_iter().enumerate() {
            if position > 0 {
                self.rest(rest);
            }
            reports.push(self.run_loaded(&sweep, &root, chunk, &mut progress)?);
        }
        Ok(reports)
    }

    /// Runs one chunk of an already loaded sweep laid out under `root`.
    pub fn run_loaded<F>(
        &mut self,
        sweep: &SweepConfig,
        root: &Path,
        chunk: ChunkSpec,
        progress: F,
    ) -> Result<SweepReport, SweepError>
    where
        F: FnMut(PoolStatus),
    {
        let points = plan_chunk(&sweep.grid(), chunk)?;
        info!(
            temperature_start = sweep.system.temperature_start,
            temperature_stop = sweep.system.temperature_stop,
            temperature_steps = sweep.system.temperature_steps,
            density_start = sweep.system.density_start,
            density_stop = sweep.system.density_stop,
            density_steps = sweep.system.density_steps,
            particle_count = sweep.system.particle_count,
            time_delta = sweep.system.time_delta,
            "sweep parameters"
        );
        info!(
            chunk = chunk.index(),
            chunks = chunk.count(),
            jobs = points.len(),
            threads = self.thread_count,
            "starting chunk"
        );

        let mut deriver = RunConfigDeriver::new(sweep, root, &mut self.seeds);
        let jobs = points
            .iter()
            .map(|&point| deriver.derive(point).map(|derived| derived.job))
            .collect::<Result<Vec<_>, _>>()?;

        let coordinator = Coordinator::new(self.thread_count)?;
        for job in jobs {
            let engine = Arc::clone(&self.engine);
            coordinator.push(move || engine.run(&job));
        }
        let status = coordinator.wait_with_progress(self.polling_interval, progress);
        if status.failed > 0 {
            warn!(failed = status.failed, "some jobs failed");
        }

        let result = collect_results(sweep, root, &points)?;
        let report = SweepReport::new(sweep, chunk, result)?;
        info!(chunk = chunk.index(), summary = %report.summary, "chunk finished");
        Ok(report)
    }

    fn rest(&self, rest: Duration) {
        let mut remaining = rest;
        while !remaining.is_zero() {
            info!(remaining_secs = remaining.as_secs_f64(), "resting before next chunk");
            let step = if self.polling_interval.is_zero() {
                remaining
            } else {
                remaining.min(self.polling_interval)
            };
            thread::sleep(step);
            remaining -= step;
        }
    }
}

/// Runs one simulation from `config_file`, or from `object` written there.
///
/// With no explicit seed from `seeds` the config's own seed is kept. The file
/// is rewritten with the seed actually used before the engine starts.
pub fn run_single(
    config_file: &Path,
    object: Option<RunConfig>,
    seeds: &mut SeedPolicy,
    engine: &dyn SimulationEngine,
) -> Result<RunJob, SweepError> {
    let mut config = match object {
        Some(config) => config,
        None => read_config(config_file).map_err(|err| missing_config(err, config_file))?,
    };
    if let Some(seed) = seeds.explicit() {
        config.system.random_seed = seed;
    }
    write_config(config_file, &config)?;

    let directory = sweep_root(config_file);
    config.filepaths = config.filepaths.namespaced(&directory);
    let job = RunJob {
        directory,
        config_file: config_file.to_path_buf(),
        config,
    };
    info!(config = %config_file.display(), seed = job.config.system.random_seed, "starting run");
    engine.run(&job)?;
    Ok(job)
}

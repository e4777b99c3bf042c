use std::path::PathBuf;
use std::process::Command;

use ljs_config::RunConfig;
use ljs_core::errors::{ErrorInfo, SweepError};
use tracing::debug;

/// Everything an engine needs to execute one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct RunJob {
    /// Point directory; the engine writes its outputs here.
    pub directory: PathBuf,
    /// Run config file on disk, inside `directory`.
    pub config_file: PathBuf,
    /// Run configuration with output paths qualified by `directory`.
    pub config: RunConfig,
}

/// Executes one run to completion, writing its outputs to disk.
///
/// Implementations must be callable from several worker threads at once.
pub trait SimulationEngine: Send + Sync {
    /// Runs `job`. A returned error marks the job as failed.
    fn run(&self, job: &RunJob) -> Result<(), SweepError>;
}

/// Engine backed by an external program.
///
/// The program is started inside the point directory with the run config's
/// filename appended to its arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandEngine {
    program: String,
    args: Vec<String>,
}

const STDERR_TAIL: usize = 512;

impl CommandEngine {
    /// Engine invoking `program`.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Appends a fixed argument placed before the config path.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Appends several fixed arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl SimulationEngine for CommandEngine {
    fn run(&self, job: &RunJob) -> Result<(), SweepError> {
        let config_arg = job
            .config_file
            .strip_prefix(&job.directory)
            .unwrap_or(&job.config_file);
        debug!(program = %self.program, directory = %job.directory.display(), "starting engine");
        let output = Command::new(&self.program)
            .args(&self.args)
            .arg(config_arg)
            .current_dir(&job.directory)
            .output()
            .map_err(|err| {
                SweepError::Engine(
                    ErrorInfo::new("engine_spawn", err.to_string())
                        .with_context("program", self.program.as_str())
                        .with_path(&job.directory),
                )
            })?;
        if output.status.success() {
            return Ok(());
        }
        let stderr = String::from_utf8_lossy(&output.stderr);
        let tail_start = stderr
            .char_indices()
            .rev()
            .nth(STDERR_TAIL.saturating_sub(1))
            .map_or(0, |(index, _)| index);
        Err(SweepError::Engine(
            ErrorInfo::new("engine_exit", "engine exited unsuccessfully")
                .with_context("program", self.program.as_str())
                .with_context("status", output.status.to_string())
                .with_context("stderr", stderr[tail_start..].trim())
                .with_path(&job.directory),
        ))
    }
}

impl<E: SimulationEngine + ?Sized> SimulationEngine for std::sync::Arc<E> {
    fn run(&self, job: &RunJob) -> Result<(), SweepError> {
        (**self).run(job)
    }
}

use std::path::{Path, PathBuf};

use ljs_config::{read_config, RunConfig, SweepConfig};
use ljs_core::errors::SweepError;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::derive::point_directory;
use crate::events::{classify_file, EventLogRecord, RunStatus};
use crate::grid::GridPoint;
use crate::report::SweepSummary;

/// Classified outcome of one grid point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointResult {
    /// Point directory relative to the sweep root.
    pub directory: PathBuf,
    /// Parsed event log.
    pub record: EventLogRecord,
}

/// Point whose outputs could not be classified.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PointFailure {
    /// Point directory relative to the sweep root.
    pub directory: PathBuf,
    /// Reason the point was skipped.
    pub error: SweepError,
}

/// Outcomes of the points processed in one invocation, in grid order.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepResult {
    /// Runs that finished both phases.
    pub completed: Vec<PointResult>,
    /// Runs that aborted during equilibration.
    pub equilibration_aborted: Vec<PointResult>,
    /// Runs that aborted during observation.
    pub observation_aborted: Vec<PointResult>,
    /// Runs whose log has no terminal line.
    pub incomplete: Vec<PointResult>,
    /// Points whose outputs could not be read.
    pub failed: Vec<PointFailure>,
}

impl SweepResult {
    /// Files `result` under its terminal status.
    pub fn push(&mut self, result: PointResult) {
        let bucket = match result.record.status {
            RunStatus::Completed => &mut self.completed,
            RunStatus::EquilibrationAborted => &mut self.equilibration_aborted,
            RunStatus::ObservationAborted => &mut self.observation_aborted,
            RunStatus::Incomplete => &mut self.incomplete,
        };
        bucket.push(result);
    }

    /// Number of points across every bucket, failures included.
    pub fn len(&self) -> usize {
        self.completed.len()
            + self.equilibration_aborted.len()
            + self.observation_aborted.len()
            + self.incomplete.len()
            + self.failed.len()
    }

    /// True when no point has been recorded.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bucket sizes.
    pub fn summary(&self) -> SweepSummary {
        SweepSummary {
            completed: self.completed.len(),
            equilibration_aborted: self.equilibration_aborted.len(),
            observation_aborted: self.observation_aborted.len(),
            incomplete: self.incomplete.len(),
            failed: self.failed.len(),
        }
    }
}

/// Reads the run config at `config_file` and classifies its event log.
///
/// A relative event log path is resolved against the config's directory.
pub fn classify_point(config_file: &Path) -> Result<EventLogRecord, SweepError> {
    let config: RunConfig = read_config(config_file)?;
    let config_dir = config_file.parent().unwrap_or_else(|| Path::new(""));
    classify_file(&config.filepaths.event_log_in(config_dir))
}

/// Classifies `points` of `sweep` laid out under `root`.
///
/// Absent configs or logs abort with [`SweepError::MissingOutput`]; any other
/// per-point failure is recorded in [`SweepResult::failed`].
pub fn collect_results(
    sweep: &SweepConfig,
    root: &Path,
    points: &[GridPoint],
) -> Result<SweepResult, SweepError> {
    let mut result = SweepResult::default();
    for &point in points {
        let directory = point_directory(sweep, point)?;
        let config_file = root
            .join(&directory)
            .join(&sweep.templates.run_config_file);
        match classify_point(&config_file) {
            Ok(record) => result.push(PointResult { directory, record }),
            Err(err) if err.is_missing_output() => return Err(err),
            Err(error) => {
                warn!(directory = %directory.display(), %error, "skipping unreadable point");
                result.failed.push(PointFailure { directory, error });
            }
        }
    }
    Ok(result)
}

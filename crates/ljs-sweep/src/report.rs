use std::fmt;
use std::fs;
use std::path::Path;

use chrono::Utc;
use ljs_config::{stable_hash_string, to_canonical_json_bytes, SweepConfig};
use ljs_core::errors::SweepError;
use serde::{Deserialize, Serialize};

use crate::aggregate::SweepResult;
use crate::grid::ChunkSpec;

/// Bucket sizes of a [`SweepResult`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SweepSummary {
    /// Runs that finished both phases.
    pub completed: usize,
    /// Runs that aborted during equilibration.
    pub equilibration_aborted: usize,
    /// Runs that aborted during observation.
    pub observation_aborted: usize,
    /// Runs without a terminal log line.
    pub incomplete: usize,
    /// Points whose outputs could not be read.
    pub failed: usize,
}

impl SweepSummary {
    /// Sum of all buckets.
    pub fn total(&self) -> usize {
        self.completed
            + self.equilibration_aborted
            + self.observation_aborted
            + self.incomplete
            + self.failed
    }

    /// Adds another summary bucket by bucket.
    pub fn merge(&mut self, other: &SweepSummary) {
        self.completed += other.completed;
        self.equilibration_aborted += other.equilibration_aborted;
        self.observation_aborted += other.observation_aborted;
        self.incomplete += other.incomplete;
        self.failed += other.failed;
    }
}

impl fmt::Display for SweepSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} completed, {} aborted in equilibration, {} aborted in observation",
            self.completed, self.equilibration_aborted, self.observation_aborted
        )?;
        if self.incomplete > 0 {
            write!(f, ", {} incomplete", self.incomplete)?;
        }
        if self.failed > 0 {
            write!(f, ", {} unreadable", self.failed)?;
        }
        Ok(())
    }
}

/// Persistable record of one chunk of a sweep.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SweepReport {
    /// SHA-256 of the sweep config's canonical JSON.
    pub plan_hash: String,
    /// Position of the chunk.
    pub chunk_index: usize,
    /// Number of chunks the grid was split into.
    pub chunk_count: usize,
    /// RFC 3339 timestamp of report creation.
    pub created_at: String,
    /// Bucket sizes.
    pub summary: SweepSummary,
    /// Per-point outcomes.
    pub result: SweepResult,
}

impl SweepReport {
    /// Assembles the report for `chunk` of `sweep`.
    pub fn new(
        sweep: &SweepConfig,
        chunk: ChunkSpec,
        result: SweepResult,
    ) -> Result<Self, SweepError> {
        Ok(Self {
            plan_hash: stable_hash_string(sweep)?,
            chunk_index: chunk.index(),
            chunk_count: chunk.count(),
            created_at: Utc::now().to_rfc3339(),
            summary: result.summary(),
            result,
        })
    }

    /// Writes the report as canonical JSON.
    pub fn write(&self, path: &Path) -> Result<(), SweepError> {
        let bytes = to_canonical_json_bytes(self)?;
        fs::write(path, bytes).map_err(|err| SweepError::from_io("report_write", path, err))
    }
}

/// Writes several chunk reports as one canonical JSON array.
pub fn write_reports(reports: &[SweepReport], path: &Path) -> Result<(), SweepError> {
    let bytes = to_canonical_json_bytes(&reports)?;
    fs::write(path, bytes).map_err(|err| SweepError::from_io("report_write", path, err))
}

#![deny(missing_docs)]
#![doc = "Grid planning, run dispatch and outcome classification for Lennard-Jones parameter sweeps."]

/// Buckets per-point outcomes of a sweep.
pub mod aggregate;
/// Bounded worker pool for simulation jobs.
pub mod coordinator;
/// Per-point run config derivation and seed policy.
pub mod derive;
/// Sweep and single-run drivers.
pub mod dispatch;
/// Seam between the dispatcher and the simulation engine.
pub mod engine;
/// Classification of a run's event log.
///
/// The engine appends one `<timestep>: <message>` line per event. The parser
/// folds those lines through a small state machine keyed on the message's
/// leading words; lines that do not fit the format are skipped.
pub mod events;
/// Grid enumeration and chunk partitioning.
pub mod grid;
/// Chunk reports and summaries.
pub mod report;

pub use aggregate::{classify_point, collect_results, PointFailure, PointResult, SweepResult};
pub use coordinator::{Coordinator, PoolStatus};
pub use derive::{
    derive_run_config, point_directory, simulation_dirs, DerivedRun, RunConfigDeriver, SeedPolicy,
};
pub use dispatch::{load_sweep, run_single, sweep_root, ChunkSelection, SweepRunner};
pub use engine::{CommandEngine, RunJob, SimulationEngine};
pub use events::{
    classify_file, classify_reader, classify_str, EventLogParser, EventLogRecord, RunStatus,
};
pub use grid::{linspace, plan_chunk, plan_grid, ChunkSpec, GridPoint};
pub use report::{write_reports, SweepReport, SweepSummary};

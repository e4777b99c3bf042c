use std::path::{Path, PathBuf};

use ljs_core::rng::DEFAULT_SEED;
use serde::{Deserialize, Serialize};

/// Physical parameters of a single simulation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SystemSection {
    /// Target temperature (reduced units).
    pub temperature: f64,
    /// Particle number density (reduced units).
    pub density: f64,
    /// Number of particles in the periodic box.
    pub particle_count: u32,
    /// Seed for the engine's initial-condition generator.
    pub random_seed: u32,
    /// Interaction cutoff radius.
    pub cutoff_distance: f64,
    /// Integrator time step.
    pub time_delta: f64,
}

impl Default for SystemSection {
    fn default() -> Self {
        Self {
            temperature: 0.8,
            density: 1.0,
            particle_count: 100,
            random_seed: DEFAULT_SEED,
            cutoff_distance: 2.5,
            time_delta: 0.005,
        }
    }
}

/// Parameters of the equilibration phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EquilibrationSection {
    /// Human readable phase name written to the event log.
    pub name: String,
    /// Relative temperature tolerance before an adjustment is made.
    pub tolerance: f64,
    /// Number of samples averaged per temperature estimate.
    pub sample_size: u32,
    /// Time steps between temperature checks.
    pub adjustment_interval: u32,
    /// Time steps the temperature must stay within tolerance.
    pub steady_state_time: u32,
    /// Time steps after which equilibration is abandoned.
    pub timeout: u32,
}

impl Default for EquilibrationSection {
    fn default() -> Self {
        Self {
            name: "Equilibration Phase".to_string(),
            tolerance: 0.05,
            sample_size: 50,
            adjustment_interval: 200,
            steady_state_time: 1000,
            timeout: 5000,
        }
    }
}

/// Parameters of the observation phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ObservationSection {
    /// Human readable phase name written to the event log.
    pub name: String,
    /// Relative temperature drift tolerated before the run aborts.
    pub tolerance: f64,
    /// Number of samples averaged per observation.
    pub sample_size: u32,
    /// Time steps between observations.
    pub observation_interval: u32,
    /// Number of observations to record.
    pub observation_count: u32,
}

impl Default for ObservationSection {
    fn default() -> Self {
        Self {
            name: "Observation Phase".to_string(),
            tolerance: 0.10,
            sample_size: 50,
            observation_interval: 200,
            observation_count: 20,
        }
    }
}

/// Output log locations of a run.
///
/// In a sweep configuration these are bare filenames; the sweep places them
/// inside each grid point's directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filepaths {
    /// Phase transitions and milestones.
    pub event_log: PathBuf,
    /// Thermodynamic time series.
    pub thermodynamic_log: PathBuf,
    /// Recorded observations.
    pub observation_log: PathBuf,
    /// Particle snapshots.
    pub snapshot_log: PathBuf,
}

impl Default for Filepaths {
    fn default() -> Self {
        Self {
            event_log: PathBuf::from("events.log"),
            thermodynamic_log: PathBuf::from("thermodynamics.csv"),
            observation_log: PathBuf::from("observations.csv"),
            snapshot_log: PathBuf::from("snapshots.csv"),
        }
    }
}

impl Filepaths {
    /// Returns a copy with every path prefixed by `dir`.
    ///
    /// Absolute paths are left untouched, as joining would discard `dir` anyway.
    pub fn namespaced(&self, dir: &Path) -> Self {
        Self {
            event_log: dir.join(&self.event_log),
            thermodynamic_log: dir.join(&self.thermodynamic_log),
            observation_log: dir.join(&self.observation_log),
            snapshot_log: dir.join(&self.snapshot_log),
        }
    }

    /// Resolves the event log against the directory holding the run config.
    pub fn event_log_in(&self, config_dir: &Path) -> PathBuf {
        if self.event_log.is_absolute() {
            self.event_log.clone()
        } else {
            config_dir.join(&self.event_log)
        }
    }
}

/// Fully resolved configuration consumed by the simulation engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RunConfig {
    /// Physical system parameters.
    pub system: SystemSection,
    /// Equilibration phase parameters.
    pub equilibration: EquilibrationSection,
    /// Observation phase parameters.
    pub observation: ObservationSection,
    /// Output log locations.
    pub filepaths: Filepaths,
}

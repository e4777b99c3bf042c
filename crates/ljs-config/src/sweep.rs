use serde::{Deserialize, Serialize};

use crate::run::{EquilibrationSection, Filepaths, ObservationSection};

/// Grid bounds and shared physical parameters of a sweep.
///
/// Temperature and density describe endpoint-inclusive ranges; no seed is
/// carried here because each run owns its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SweepSystem {
    /// First sampled temperature.
    pub temperature_start: f64,
    /// Last sampled temperature.
    pub temperature_stop: f64,
    /// Number of temperature samples.
    pub temperature_steps: u32,
    /// First sampled density.
    pub density_start: f64,
    /// Last sampled density.
    pub density_stop: f64,
    /// Number of density samples.
    pub density_steps: u32,
    /// Number of particles in every run.
    pub particle_count: u32,
    /// Interaction cutoff radius for every run.
    pub cutoff_distance: f64,
    /// Integrator time step for every run.
    pub time_delta: f64,
}

impl Default for SweepSystem {
    fn default() -> Self {
        Self {
            temperature_start: 0.1,
            temperature_stop: 1.0,
            temperature_steps: 10,
            density_start: 0.1,
            density_stop: 1.0,
            density_steps: 10,
            particle_count: 100,
            cutoff_distance: 2.5,
            time_delta: 0.005,
        }
    }
}

/// Naming templates used to lay out a sweep on disk.
///
/// Templates accept `{temperature}`, `{density}` and, for phase names,
/// `{name}` placeholders (see [`crate::template`]).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Templates {
    /// Per-point directory, relative to the sweep config's directory.
    pub directory: String,
    /// Filename of the run config inside each point directory.
    pub run_config_file: String,
    /// Phase name; `{name}` is the shared phase name.
    pub phase_name: String,
}

impl Default for Templates {
    fn default() -> Self {
        Self {
            directory: "T_{temperature:f}/d_{density:f}".to_string(),
            run_config_file: "run.toml".to_string(),
            phase_name: "(T={temperature:f}, d={density:f}) {name}".to_string(),
        }
    }
}

/// One endpoint-inclusive axis of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisSpec {
    /// First sampled value.
    pub start: f64,
    /// Last sampled value.
    pub stop: f64,
    /// Number of samples, at least one.
    pub steps: u32,
}

/// Two independent axes: temperature (outer) and density (inner).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Temperature axis.
    pub temperature: AxisSpec,
    /// Density axis.
    pub density: AxisSpec,
}

/// Describes how to derive one run configuration per grid point.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct SweepConfig {
    /// Grid bounds and shared physical parameters.
    pub system: SweepSystem,
    /// Directory, filename and phase name templates.
    pub templates: Templates,
    /// Equilibration parameters shared by every run.
    pub equilibration: EquilibrationSection,
    /// Observation parameters shared by every run.
    pub observation: ObservationSection,
    /// Unqualified output filenames.
    pub filenames: Filepaths,
}

impl SweepConfig {
    /// Returns the grid described by the system section.
    pub fn grid(&self) -> GridSpec {
        GridSpec {
            temperature: AxisSpec {
                start: self.system.temperature_start,
                stop: self.system.temperature_stop,
                steps: self.system.temperature_steps,
            },
            density: AxisSpec {
                start: self.system.density_start,
                stop: self.system.density_stop,
                steps: self.system.density_steps,
            },
        }
    }

    /// Total number of grid points.
    pub fn job_count(&self) -> usize {
        self.system.temperature_steps as usize * self.system.density_steps as usize
    }
}

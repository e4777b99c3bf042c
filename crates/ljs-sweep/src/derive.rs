use std::fmt;
use std::path::{Path, PathBuf};

use ljs_config::{read_config, render, write_config, Field, RunConfig, SweepConfig};
use ljs_core::errors::SweepError;
use ljs_core::rng::SeedGenerator;
use tracing::debug;

use crate::engine::RunJob;
use crate::grid::{plan_grid, GridPoint};

/// Where each derived run's seed comes from.
///
/// Variants are listed in precedence order: a fixed seed beats a generator,
/// and with neither the seed already recorded on disk is reused before the
/// fresh default.
#[derive(Default)]
pub enum SeedPolicy {
    /// Reuse a recorded seed if a config exists, else the default.
    #[default]
    Recorded,
    /// Same seed for every point.
    Fixed(u32),
    /// One call per derived point.
    Generated(Box<dyn FnMut() -> u32 + Send>),
}

impl SeedPolicy {
    /// Draws per-point seeds from `generator`.
    pub fn from_generator(mut generator: SeedGenerator) -> Self {
        SeedPolicy::Generated(Box::new(move || generator.next_seed()))
    }

    /// Seed chosen by the policy alone, if any.
    pub(crate) fn explicit(&mut self) -> Option<u32> {
        match self {
            SeedPolicy::Recorded => None,
            SeedPolicy::Fixed(seed) => Some(*seed),
            SeedPolicy::Generated(next) => Some(next()),
        }
    }
}

impl fmt::Debug for SeedPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeedPolicy::Recorded => f.write_str("Recorded"),
            SeedPolicy::Fixed(seed) => f.debug_tuple("Fixed").field(seed).finish(),
            SeedPolicy::Generated(_) => f.write_str("Generated(..)"),
        }
    }
}

fn point_fields(point: GridPoint) -> [(&'static str, Field<'static>); 2] {
    [
        ("temperature", Field::Number(point.temperature)),
        ("density", Field::Number(point.density)),
    ]
}

/// Directory of `point`, relative to the sweep root.
pub fn point_directory(sweep: &SweepConfig, point: GridPoint) -> Result<PathBuf, SweepError> {
    render(&sweep.templates.directory, &point_fields(point)).map(PathBuf::from)
}

fn phase_name(sweep: &SweepConfig, point: GridPoint, name: &str) -> Result<String, SweepError> {
    let [temperature, density] = point_fields(point);
    render(
        &sweep.templates.phase_name,
        &[temperature, density, ("name", Field::Text(name))],
    )
}

/// Builds the run config for `point` without touching the filesystem.
///
/// Output filenames are copied unqualified and the seed is left at the
/// fresh default.
pub fn derive_run_config(sweep: &SweepConfig, point: GridPoint) -> Result<RunConfig, SweepError> {
    let mut config = RunConfig::default();
    config.system.temperature = point.temperature;
    config.system.density = point.density;
    config.system.particle_count = sweep.system.particle_count;
    config.system.cutoff_distance = sweep.system.cutoff_distance;
    config.system.time_delta = sweep.system.time_delta;

    config.equilibration = sweep.equilibration.clone();
    config.equilibration.name = phase_name(sweep, point, &sweep.equilibration.name)?;
    config.observation = sweep.observation.clone();
    config.observation.name = phase_name(sweep, point, &sweep.observation.name)?;

    config.filepaths = sweep.filenames.clone();
    Ok(config)
}

/// Per-point directories of the whole grid, in canonical order.
pub fn simulation_dirs(sweep: &SweepConfig) -> Result<Vec<PathBuf>, SweepError> {
    plan_grid(&sweep.grid())?
        .into_iter()
        .map(|point| point_directory(sweep, point))
        .collect()
}

/// Result of deriving one grid point.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedRun {
    /// Point directory relative to the sweep root.
    pub directory: PathBuf,
    /// Job ready for dispatch.
    pub job: RunJob,
}

/// Derives, seeds and persists run configs under a sweep root.
#[derive(Debug)]
pub struct RunConfigDeriver<'a> {
    sweep: &'a SweepConfig,
    root: PathBuf,
    seeds: &'a mut SeedPolicy,
}

impl<'a> RunConfigDeriver<'a> {
    /// Deriver writing below `root`.
    pub fn new(sweep: &'a SweepConfig, root: impl Into<PathBuf>, seeds: &'a mut SeedPolicy) -> Self {
        Self {
            sweep,
            root: root.into(),
            seeds,
        }
    }

    /// Derives the run for `point` and writes its config file.
    ///
    /// The file on disk keeps bare output filenames; the returned job's
    /// config has them prefixed with the point directory.
    pub fn derive(&mut self, point: GridPoint) -> Result<DerivedRun, SweepError> {
        let directory = point_directory(self.sweep, point)?;
        let point_dir = self.root.join(&directory);
        let config_file = point_dir.join(&self.sweep.templates.run_config_file);

        let mut config = derive_run_config(self.sweep, point)?;
        config.system.random_seed = match self.seeds.explicit() {
            Some(seed) => seed,
            None => recorded_seed(&config_file)?.unwrap_or(config.system.random_seed),
        };
        write_config(&config_file, &config)?;
        debug!(
            directory = %directory.display(),
            seed = config.system.random_seed,
            "derived run config"
        );

        config.filepaths = config.filepaths.namespaced(&point_dir);
        Ok(DerivedRun {
            directory,
            job: RunJob {
                directory: point_dir,
                config_file,
                config,
            },
        })
    }
}

/// Seed of an existing run config at `path`, if one has been written.
pub(crate) fn recorded_seed(path: &Path) -> Result<Option<u32>, SweepError> {
    match read_config::<RunConfig>(path) {
        Ok(existing) => Ok(Some(existing.system.random_seed)),
        Err(err) if err.is_missing_output() => Ok(None),
        Err(err) => Err(err),
    }
}

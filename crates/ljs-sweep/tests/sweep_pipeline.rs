use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use ljs_config::{read_config, write_config, RunConfig, SweepConfig};
use ljs_core::{ErrorInfo, SweepError};
use ljs_sweep::{
    collect_results, load_sweep, plan_grid, run_single, simulation_dirs, ChunkSelection,
    ChunkSpec, RunJob, RunStatus, SeedPolicy, SimulationEngine, SweepReport, SweepRunner,
};

/// Writes a canned event log chosen by the run's temperature.
struct ScriptedEngine {
    runs: AtomicUsize,
}

impl ScriptedEngine {
    fn new() -> Arc<Self> {
        Arc::new(Self {
            runs: AtomicUsize::new(0),
        })
    }
}

impl SimulationEngine for ScriptedEngine {
    fn run(&self, job: &RunJob) -> Result<(), SweepError> {
        self.runs.fetch_add(1, Ordering::SeqCst);
        let temperature = job.config.system.temperature;
        let log = if temperature < 0.2 {
            "0: Phase started\n300: Simulation aborted\n"
        } else if temperature < 0.6 {
            "0: Phase started\n500: Phase complete\n501: Phase started\n701: Observation recorded\n800: Simulation aborted\n"
        } else if temperature < 0.9 {
            "0: Phase started\n500: Phase complete\n501: Phase started\n1500: Phase complete\n"
        } else {
            "0: Phase started\n100: Temperature adjusted\n"
        };
        fs::write(&job.config.filepaths.event_log, log).map_err(|err| {
            SweepError::Engine(ErrorInfo::new("scripted_write", err.to_string()))
        })
    }
}

/// Fails without writing anything.
struct BrokenEngine;

impl SimulationEngine for BrokenEngine {
    fn run(&self, _job: &RunJob) -> Result<(), SweepError> {
        Err(SweepError::Engine(ErrorInfo::new("engine_exit", "no output")))
    }
}

fn small_sweep() -> SweepConfig {
    let mut sweep = SweepConfig::default();
    // Temperatures 0.1, 0.4, 0.7, 1.0.
    sweep.system.temperature_start = 0.1;
    sweep.system.temperature_stop = 1.0;
    sweep.system.temperature_steps = 4;
    sweep.system.density_steps = 2;
    sweep
}

fn runner(engine: Arc<dyn SimulationEngine>) -> SweepRunner {
    SweepRunner::new(engine)
        .thread_count(3)
        .polling_interval(Duration::from_millis(5))
}

fn statuses(report: &SweepReport) -> [usize; 4] {
    [
        report.summary.completed,
        report.summary.equilibration_aborted,
        report.summary.observation_aborted,
        report.summary.incomplete,
    ]
}

#[test]
fn whole_sweep_buckets_every_point_in_grid_order() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_path = dir.path().join("sweep.toml");
    let engine = ScriptedEngine::new();

    let report = runner(engine.clone())
        .run(&config_path, Some(small_sweep()), ChunkSpec::whole(), |_| {})
        .expect("sweep");

    assert_eq!(engine.runs.load(Ordering::SeqCst), 8);
    assert_eq!(statuses(&report), [2, 2, 2, 2]);
    assert_eq!(report.result.len(), 8);
    assert!(report.result.failed.is_empty());
    assert_eq!(report.plan_hash.len(), 64);

    let completed: Vec<String> = report
        .result
        .completed
        .iter()
        .map(|point| point.directory.display().to_string())
        .collect();
    assert_eq!(
        completed,
        vec!["T_0.700000/d_0.100000", "T_0.700000/d_1.000000"]
    );
    let aborted = &report.result.observation_aborted[0].record;
    assert_eq!(aborted.status, RunStatus::ObservationAborted);
    assert_eq!(aborted.observations_recorded, vec![701]);

    let persisted: SweepConfig = read_config(&config_path).expect("persisted sweep");
    assert_eq!(persisted, small_sweep());
}

#[test]
fn chunked_runs_cover_the_grid_once() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_path = dir.path().join("sweep.toml");
    write_config(&config_path, &small_sweep()).expect("write sweep");
    let engine = ScriptedEngine::new();

    let mut progress_calls = 0;
    let reports = runner(engine.clone())
        .run_chunks(
            &config_path,
            None,
            &ChunkSelection::All,
            3,
            Duration::from_millis(10),
            |_| progress_calls += 1,
        )
        .expect("chunks");

    assert_eq!(reports.len(), 3);
    let sizes: Vec<usize> = reports.iter().map(|report| report.result.len()).collect();
    assert_eq!(sizes, vec![3, 3, 2]);
    assert_eq!(engine.runs.load(Ordering::SeqCst), 8);
    assert!(progress_calls >= 3);
    assert_eq!(reports[2].chunk_index, 2);
    assert_eq!(reports[2].chunk_count, 3);
}

#[test]
fn rerun_reuses_recorded_seeds() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_path = dir.path().join("sweep.toml");
    let engine = ScriptedEngine::new();
    let seeds = SeedPolicy::from_generator(ljs_core::SeedGenerator::derived(3));

    runner(engine.clone())
        .seeds(seeds)
        .run(&config_path, Some(small_sweep()), ChunkSpec::whole(), |_| {})
        .expect("first sweep");
    let first_dir = &simulation_dirs(&small_sweep()).expect("dirs")[0];
    let run_file = dir.path().join(first_dir).join("run.toml");
    let first: RunConfig = read_config(&run_file).expect("first config");

    runner(engine)
        .run(&config_path, None, ChunkSpec::whole(), |_| {})
        .expect("second sweep");
    let second: RunConfig = read_config(&run_file).expect("second config");
    assert_eq!(first.system.random_seed, second.system.random_seed);
}

#[test]
fn failed_jobs_leave_missing_output() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_path = dir.path().join("sweep.toml");
    let err = runner(Arc::new(BrokenEngine))
        .run(&config_path, Some(small_sweep()), ChunkSpec::whole(), |_| {})
        .expect_err("no logs");
    assert!(err.is_missing_output());
}

#[test]
fn unreadable_point_is_isolated() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_path = dir.path().join("sweep.toml");
    let sweep = small_sweep();
    runner(ScriptedEngine::new())
        .run(&config_path, Some(sweep.clone()), ChunkSpec::whole(), |_| {})
        .expect("sweep");

    let dirs = simulation_dirs(&sweep).expect("dirs");
    fs::write(dir.path().join(&dirs[3]).join("run.toml"), "system = 3\n").expect("corrupt");

    let points = plan_grid(&sweep.grid()).expect("plan");
    let result = collect_results(&sweep, dir.path(), &points).expect("collect");
    assert_eq!(result.len(), points.len());
    assert_eq!(result.failed.len(), 1);
    assert_eq!(result.failed[0].directory, dirs[3]);
}

#[test]
fn missing_config_and_object_is_a_config_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let err = load_sweep(&dir.path().join("absent.toml"), None).expect_err("nothing to load");
    assert!(matches!(err, SweepError::Config(_)));

    let err = run_single(
        &dir.path().join("run.toml"),
        None,
        &mut SeedPolicy::Recorded,
        &BrokenEngine,
    )
    .expect_err("nothing to run");
    assert!(matches!(err, SweepError::Config(_)));
}

#[test]
fn single_run_keeps_its_seed_and_rewrites_the_file() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_file = dir.path().join("run.toml");
    let mut config = RunConfig::default();
    config.system.random_seed = 11;
    config.system.temperature = 0.7;

    let engine = ScriptedEngine::new();
    let job = run_single(&config_file, Some(config), &mut SeedPolicy::Recorded, engine.as_ref())
        .expect("single run");
    assert_eq!(job.config.system.random_seed, 11);
    assert_eq!(job.config.filepaths.event_log, dir.path().join("events.log"));
    assert!(Path::new(&job.config.filepaths.event_log).exists());

    let job = run_single(&config_file, None, &mut SeedPolicy::Fixed(42), engine.as_ref())
        .expect("rerun");
    assert_eq!(job.config.system.random_seed, 42);
    let on_disk: RunConfig = read_config(&config_file).expect("read back");
    assert_eq!(on_disk.system.random_seed, 42);
    assert_eq!(on_disk.filepaths.event_log, Path::new("events.log"));
}

#[test]
fn chunk_selection_parsing() {
    assert_eq!(ChunkSelection::parse("all").expect("all"), ChunkSelection::All);
    assert_eq!(
        ChunkSelection::parse("[0-2,5]").expect("list"),
        ChunkSelection::Indices(vec![0, 1, 2, 5])
    );
    assert_eq!(
        ChunkSelection::parse(" 3 , 1 ").expect("bare"),
        ChunkSelection::Indices(vec![3, 1])
    );
    assert!(ChunkSelection::parse("[2-1]").is_err());
    assert!(ChunkSelection::parse("[a]").is_err());

    let chunks = ChunkSelection::parse("[0-2,5]")
        .expect("list")
        .resolve(6)
        .expect("in range");
    assert_eq!(chunks.len(), 4);
    assert!(ChunkSelection::parse("[5]").expect("list").resolve(5).is_err());
    assert!(ChunkSelection::All.resolve(0).is_err());
}

#[test]
fn empty_or_repeated_chunk_selection_is_rejected() {
    for input in ["", "[]", " [ ] ", ","] {
        let err = ChunkSelection::parse(input).expect_err("empty selection");
        assert_eq!(err.info().code, "chunk_selection");
        assert_eq!(err.info().message, "no chunks selected");
    }

    let err = ChunkSelection::parse("[1,1]").expect_err("repeated index");
    assert_eq!(err.info().context.get("chunk_index").map(String::as_str), Some("1"));
    assert!(ChunkSelection::parse("[0-2,2]").is_err());
    assert!("[]".parse::<ChunkSelection>().is_err());
}

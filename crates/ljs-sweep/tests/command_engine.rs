#![cfg(unix)]

use std::fs;

use ljs_config::{write_config, RunConfig};
use ljs_sweep::{run_single, CommandEngine, RunStatus, SeedPolicy, SimulationEngine};

#[test]
fn engine_runs_inside_the_point_directory() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_file = dir.path().join("run.toml");
    write_config(&config_file, &RunConfig::default()).expect("write config");

    // `$0` is the config filename, relative to the working directory.
    let engine = CommandEngine::new("sh").arg("-c").args([
        "test -f \"$0\" && printf '0: Phase started\\n300: Simulation aborted\\n' > events.log",
    ]);
    let job = run_single(&config_file, None, &mut SeedPolicy::Recorded, &engine).expect("run");

    let record = ljs_sweep::classify_file(&job.config.filepaths.event_log).expect("classify");
    assert_eq!(record.status, RunStatus::EquilibrationAborted);
    assert!(dir.path().join("events.log").exists());
}

#[test]
fn non_zero_exit_is_an_engine_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let config_file = dir.path().join("run.toml");
    write_config(&config_file, &RunConfig::default()).expect("write config");

    let engine = CommandEngine::new("sh").arg("-c").arg("echo diverged >&2; exit 3");
    let job = ljs_sweep::RunJob {
        directory: dir.path().to_path_buf(),
        config_file: config_file.clone(),
        config: RunConfig::default(),
    };
    let err = engine.run(&job).expect_err("exit 3");
    assert_eq!(err.info().code, "engine_exit");
    assert_eq!(err.info().context.get("stderr").map(String::as_str), Some("diverged"));
    assert!(fs::read_dir(dir.path()).expect("list").count() == 1);
}

#[test]
fn unknown_program_is_an_engine_error() {
    let dir = tempfile::tempdir().expect("tmp dir");
    let engine = CommandEngine::new("ljs-no-such-engine-binary");
    let job = ljs_sweep::RunJob {
        directory: dir.path().to_path_buf(),
        config_file: dir.path().join("run.toml"),
        config: RunConfig::default(),
    };
    let err = engine.run(&job).expect_err("spawn fails");
    assert_eq!(err.info().code, "engine_spawn");
}

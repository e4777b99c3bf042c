use std::path::PathBuf;

use ljs_config::{decode, decode_table, read_config, RunConfig, SweepConfig};
use ljs_core::SweepError;

#[test]
fn missing_keys_keep_defaults() {
    let text = r#"
[system]
particle_count = 10

[equilibration]
name = "T=0.7, d=0.3 Equilibration Phase"
timeout = 2000

[filepaths]
event_log = "data/events.log"
"#;
    let config: RunConfig = decode(text).expect("decode");
    let defaults = RunConfig::default();
    assert_eq!(config.system.particle_count, 10);
    assert_eq!(config.system.temperature, defaults.system.temperature);
    assert_eq!(config.equilibration.timeout, 2000);
    assert_eq!(config.equilibration.tolerance, defaults.equilibration.tolerance);
    assert_eq!(config.observation, defaults.observation);
    assert_eq!(config.filepaths.event_log, PathBuf::from("data/events.log"));
    assert_eq!(config.filepaths.snapshot_log, defaults.filepaths.snapshot_log);
}

#[test]
fn unknown_keys_and_sections_are_ignored() {
    let text = r#"
[system]
random_seed = 42
colour = "blue"

[plotting]
dpi = 300
"#;
    let config: RunConfig = decode(text).expect("decode");
    assert_eq!(config.system.random_seed, 42);
}

#[test]
fn integer_literals_coerce_to_floats() {
    let text = "[system]\ntemperature = 2\ntime_delta = 0\n";
    let config: RunConfig = decode(text).expect("decode");
    assert_eq!(config.system.temperature, 2.0);
    assert_eq!(config.system.time_delta, 0.0);
}

#[test]
fn mistyped_values_are_serde_errors() {
    let text = "[system]\nparticle_count = \"many\"\n";
    let err = decode::<RunConfig>(text).expect_err("bad type");
    assert!(matches!(err, SweepError::Serde(_)));
}

#[test]
fn nested_mapping_builds_a_sweep_config() {
    let table: toml::Table = toml::from_str(
        r#"
[system]
temperature_steps = 3
density_steps = 2

[templates]
directory = "T{temperature:.2f}-d{density:.2f}"
"#,
    )
    .expect("table");
    let config: SweepConfig = decode_table(table).expect("decode");
    assert_eq!(config.job_count(), 6);
    assert_eq!(config.templates.directory, "T{temperature:.2f}-d{density:.2f}");
    assert_eq!(config.templates.run_config_file, "run.toml");
}

#[test]
fn reading_an_absent_file_is_missing_output() {
    let temp = tempfile::tempdir().expect("tmp dir");
    let err = read_config::<RunConfig>(&temp.path().join("run.toml")).expect_err("absent");
    assert!(err.is_missing_output());
}

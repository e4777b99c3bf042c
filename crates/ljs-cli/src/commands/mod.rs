pub mod classify;
pub mod results;
pub mod run;
pub mod sweep;

use std::str::FromStr;
use std::time::Duration;

use clap::Args;
use ljs_core::rng::SeedGenerator;
use ljs_sweep::{CommandEngine, SeedPolicy, SweepResult};

/// External engine invocation shared by `sweep` and `run`.
#[derive(Args, Debug, Clone)]
pub struct EngineArgs {
    /// Engine program; receives the run config filename as its last argument.
    #[arg(long)]
    pub engine: String,
    /// Extra argument passed before the config filename (repeatable).
    #[arg(long = "engine-arg", value_name = "ARG", allow_hyphen_values = true)]
    pub engine_args: Vec<String>,
}

impl EngineArgs {
    pub fn build(&self) -> CommandEngine {
        CommandEngine::new(self.engine.as_str()).args(self.engine_args.iter().cloned())
    }
}

/// How per-run seeds are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedMode {
    /// Keep seeds already on disk, else the default.
    Recorded,
    /// Fresh OS entropy per run.
    Random,
    /// One seed for every run.
    Fixed(u32),
    /// Deterministic substreams of a master seed.
    Derived(u64),
}

impl FromStr for SeedMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recorded" => Ok(SeedMode::Recorded),
            "random" => Ok(SeedMode::Random),
            _ => {
                if let Some(master) = s.strip_prefix("derived:") {
                    return master
                        .parse()
                        .map(SeedMode::Derived)
                        .map_err(|err| format!("invalid master seed `{master}`: {err}"));
                }
                s.parse().map(SeedMode::Fixed).map_err(|_| {
                    format!("expected recorded, random, derived:<master> or an integer, got `{s}`")
                })
            }
        }
    }
}

impl SeedMode {
    pub fn policy(self) -> SeedPolicy {
        match self {
            SeedMode::Recorded => SeedPolicy::Recorded,
            SeedMode::Random => SeedPolicy::from_generator(SeedGenerator::from_entropy()),
            SeedMode::Fixed(seed) => SeedPolicy::Fixed(seed),
            SeedMode::Derived(master) => SeedPolicy::from_generator(SeedGenerator::derived(master)),
        }
    }
}

/// Parses a non-negative number of seconds.
pub fn parse_seconds(value: &str) -> Result<Duration, String> {
    let seconds: f64 = value
        .parse()
        .map_err(|err| format!("invalid duration `{value}`: {err}"))?;
    Duration::try_from_secs_f64(seconds).map_err(|err| format!("invalid duration `{value}`: {err}"))
}

/// Prints the points worth re-running.
pub fn print_failures(result: &SweepResult) {
    if result.is_empty() {
        println!("no grid points in this chunk");
        return;
    }
    if !result.equilibration_aborted.is_empty() {
        println!("aborted during equilibration:");
        for point in &result.equilibration_aborted {
            println!("  {}", point.directory.display());
        }
    }
    if !result.observation_aborted.is_empty() {
        println!("aborted during observation:");
        for point in &result.observation_aborted {
            println!(
                "  {} ({} observations)",
                point.directory.display(),
                point.record.observations_recorded.len()
            );
        }
    }
    if !result.incomplete.is_empty() {
        println!("incomplete:");
        for point in &result.incomplete {
            println!("  {}", point.directory.display());
        }
    }
    for failure in &result.failed {
        println!("unreadable: {} ({})", failure.directory.display(), failure.error);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_modes_parse() {
        assert_eq!("recorded".parse::<SeedMode>(), Ok(SeedMode::Recorded));
        assert_eq!("random".parse::<SeedMode>(), Ok(SeedMode::Random));
        assert_eq!("42".parse::<SeedMode>(), Ok(SeedMode::Fixed(42)));
        assert_eq!("derived:7".parse::<SeedMode>(), Ok(SeedMode::Derived(7)));
        assert!("derived:x".parse::<SeedMode>().is_err());
        assert!("-1".parse::<SeedMode>().is_err());
    }

    #[test]
    fn seconds_reject_negative_values() {
        assert_eq!(parse_seconds("1.5"), Ok(Duration::from_millis(1500)));
        assert!(parse_seconds("-1").is_err());
        assert!(parse_seconds("soon").is_err());
    }
}

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use ljs_core::errors::{ErrorInfo, SweepError};
use serde::{Deserialize, Serialize};

/// Terminal outcome of one run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RunStatus {
    /// Both phases completed.
    Completed,
    /// The run aborted before equilibrium was reached.
    EquilibrationAborted,
    /// The run aborted while recording observations.
    ObservationAborted,
    /// The log ended without a terminal line.
    Incomplete,
}

/// Read-only summary of one event log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventLogRecord {
    /// Terminal outcome.
    pub status: RunStatus,
    /// Timestep at which equilibration started.
    pub equilibration_started: Option<u64>,
    /// Timestep at which equilibration completed.
    pub equilibration_completed: Option<u64>,
    /// Length of the equilibration phase in timesteps.
    pub equilibration_time_steps: Option<u64>,
    /// Timestep at which observation started.
    pub observation_started: Option<u64>,
    /// Timestep at which observation completed.
    pub observation_completed: Option<u64>,
    /// Length of the observation phase in timesteps.
    pub observation_time_steps: Option<u64>,
    /// Timesteps of temperature adjustments, in log order.
    pub temperature_adjustments: Vec<u64>,
    /// Timesteps of recorded observations, in log order.
    pub observations_recorded: Vec<u64>,
    /// Timestep of the last well-formed line.
    pub total_time_steps: u64,
}

/// Streaming event log state machine.
#[derive(Debug, Clone, Default)]
pub struct EventLogParser {
    status: Option<RunStatus>,
    equilibration_started: Option<u64>,
    equilibration_completed: Option<u64>,
    equilibration_time_steps: Option<u64>,
    observation_started: Option<u64>,
    observation_completed: Option<u64>,
    observation_time_steps: Option<u64>,
    temperature_adjustments: Vec<u64>,
    observations_recorded: Vec<u64>,
    total_time_steps: u64,
}

fn split_line(line: &str) -> Option<(u64, &str)> {
    let (step, message) = line.trim_end_matches(&['\r', '\n'][..]).split_once(": ")?;
    Some((step.trim().parse().ok()?, message))
}

impl EventLogParser {
    /// Creates a parser with no events seen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Feeds one log line. Malformed lines are ignored.
    pub fn push_line(&mut self, line: &str) {
        let Some((step, message)) = split_line(line) else {
            return;
        };
        self.total_time_steps = step;

        if message.starts_with("Phase started") {
            if self.equilibration_started.is_none() {
                self.equilibration_started = Some(step);
            } else {
                self.observation_started = Some(step);
            }
        } else if message.starts_with("Phase complete") {
            if self.equilibration_completed.is_none() {
                self.equilibration_completed = Some(step);
                self.equilibration_time_steps = elapsed(self.equilibration_started, step);
            } else {
                self.observation_completed = Some(step);
                self.observation_time_steps = elapsed(self.observation_started, step);
                self.status = Some(RunStatus::Completed);
            }
        } else if message.starts_with("Temperature") {
            self.temperature_adjustments.push(step);
        } else if message.starts_with("Observation") {
            self.observations_recorded.push(step);
        } else if message.starts_with("Simulation aborted") {
            self.status = Some(if self.equilibration_completed.is_none() {
                RunStatus::EquilibrationAborted
            } else {
                RunStatus::ObservationAborted
            });
        }
    }

    /// Ends the stream and yields the record; an unresolved status is `Incomplete`.
    pub fn finish(self) -> EventLogRecord {
        EventLogRecord {
            status: self.status.unwrap_or(RunStatus::Incomplete),
            equilibration_started: self.equilibration_started,
            equilibration_completed: self.equilibration_completed,
            equilibration_time_steps: self.equilibration_time_steps,
            observation_started: self.observation_started,
            observation_completed: self.observation_completed,
            observation_time_steps: self.observation_time_steps,
            temperature_adjustments: self.temperature_adjustments,
            observations_recorded: self.observations_recorded,
            total_time_steps: self.total_time_steps,
        }
    }
}

fn elapsed(started: Option<u64>, now: u64) -> Option<u64> {
    started.and_then(|start| now.checked_sub(start))
}

/// Classifies an in-memory log.
pub fn classify_str(text: &str) -> EventLogRecord {
    let mut parser = EventLogParser::new();
    for line in text.lines() {
        parser.push_line(line);
    }
    parser.finish()
}

/// Classifies a log from any buffered reader.
///
/// Lines that are not valid UTF-8 are skipped like any other malformed line;
/// only failures of the reader itself are errors.
pub fn classify_reader<R: BufRead>(mut reader: R) -> std::io::Result<EventLogRecord> {
    let mut parser = EventLogParser::new();
    let mut buf = Vec::new();
    loop {
        buf.clear();
        if reader.read_until(b'\n', &mut buf)? == 0 {
            break;
        }
        if let Ok(line) = std::str::from_utf8(&buf) {
            parser.push_line(line);
        }
    }
    Ok(parser.finish())
}

/// Classifies the log at `path`.
///
/// An absent file is [`SweepError::MissingOutput`]; other read failures are
/// [`SweepError::Io`].
pub fn classify_file(path: &Path) -> Result<EventLogRecord, SweepError> {
    let file = File::open(path).map_err(|err| SweepError::from_io("event_log_open", path, err))?;
    classify_reader(BufReader::new(file)).map_err(|err| {
        SweepError::Io(ErrorInfo::new("event_log_read", err.to_string()).with_path(path))
    })
}

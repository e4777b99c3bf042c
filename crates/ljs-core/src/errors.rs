use std::collections::BTreeMap;
use std::fmt::{self, Display};
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Payload carried by every [`SweepError`] variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorInfo {
    /// Stable code, e.g. `chunk_index` or `config_read`.
    pub code: String,
    /// Diagnostic message.
    pub message: String,
    /// Contextual key value pairs (paths, indices, counts).
    #[serde(default)]
    pub context: BTreeMap<String, String>,
    /// Suggested fix, if one is known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

impl ErrorInfo {
    /// Payload with no context and no hint.
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            context: BTreeMap::new(),
            hint: None,
        }
    }

    /// Adds a context entry; an existing key is overwritten.
    pub fn with_context(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.context.insert(key.into(), value.into());
        self
    }

    /// Records the filesystem path the error refers to.
    pub fn with_path(self, path: &Path) -> Self {
        self.with_context("path", path.display().to_string())
    }

    /// Attaches a hint.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

impl Display for ErrorInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        let mut entries = self.context.iter();
        if let Some((key, value)) = entries.next() {
            write!(f, " ({key}={value}")?;
            for (key, value) in entries {
                write!(f, ", {key}={value}")?;
            }
            f.write_str(")")?;
        }
        match &self.hint {
            Some(hint) => write!(f, "; hint: {hint}"),
            None => Ok(()),
        }
    }
}

/// Canonical error type for sweep planning, dispatch and classification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "family", content = "detail")]
pub enum SweepError {
    /// No usable configuration was supplied, or a configuration value is invalid.
    #[error("config error: {0}")]
    Config(ErrorInfo),
    /// Grid bounds or chunk selection are out of range.
    #[error("grid error: {0}")]
    Grid(ErrorInfo),
    /// A naming template could not be rendered.
    #[error("template error: {0}")]
    Template(ErrorInfo),
    /// Filesystem failures while reading or writing sweep artefacts.
    #[error("io error: {0}")]
    Io(ErrorInfo),
    /// Encoding or decoding failures for configs and reports.
    #[error("serde error: {0}")]
    Serde(ErrorInfo),
    /// A run configuration or event log expected on disk does not exist.
    #[error("missing output: {0}")]
    MissingOutput(ErrorInfo),
    /// The simulation engine reported a failure for a run.
    #[error("engine error: {0}")]
    Engine(ErrorInfo),
    /// The worker pool could not be created or used.
    #[error("pool error: {0}")]
    Pool(ErrorInfo),
}

impl SweepError {
    /// Returns a reference to the payload describing the error.
    pub fn info(&self) -> &ErrorInfo {
        match self {
            SweepError::Config(info)
            | SweepError::Grid(info)
            | SweepError::Template(info)
            | SweepError::Io(info)
            | SweepError::Serde(info)
            | SweepError::MissingOutput(info)
            | SweepError::Engine(info)
            | SweepError::Pool(info) => info,
        }
    }

    /// True when the error denotes an expected file that has not been produced.
    pub fn is_missing_output(&self) -> bool {
        matches!(self, SweepError::MissingOutput(_))
    }

    /// Wraps an I/O failure, mapping `NotFound` onto [`SweepError::MissingOutput`].
    pub fn from_io(code: &str, path: &Path, err: std::io::Error) -> Self {
        let info = ErrorInfo::new(code, err.to_string()).with_path(path);
        if err.kind() == std::io::ErrorKind::NotFound {
            SweepError::MissingOutput(info)
        } else {
            SweepError::Io(info)
        }
    }
}

use std::fs;
use std::path::Path;

use ljs_core::errors::{ErrorInfo, SweepError};
use serde::{de::DeserializeOwned, Serialize};

fn serde_error(code: &str, err: impl ToString) -> SweepError {
    SweepError::Serde(ErrorInfo::new(code, err.to_string()))
}

/// Renders a sectioned record into the text format.
pub fn encode<T: Serialize>(value: &T) -> Result<String, SweepError> {
    toml::to_string(value).map_err(|err| serde_error("config_encode", err))
}

/// Parses a sectioned record from the text format.
///
/// Keys absent from the text keep the record's defaults; unknown keys and
/// sections are ignored.
pub fn decode<T: DeserializeOwned>(text: &str) -> Result<T, SweepError> {
    toml::from_str(text).map_err(|err| serde_error("config_decode", err))
}

/// Builds a record from an already parsed nested mapping.
pub fn decode_table<T: DeserializeOwned>(table: toml::Table) -> Result<T, SweepError> {
    toml::Value::Table(table)
        .try_into()
        .map_err(|err| serde_error("config_decode_table", err))
}

/// Reads a record from disk.
///
/// A missing file is reported as [`SweepError::MissingOutput`].
pub fn read_config<T: DeserializeOwned>(path: &Path) -> Result<T, SweepError> {
    let text =
        fs::read_to_string(path).map_err(|err| SweepError::from_io("config_read", path, err))?;
    decode(&text).map_err(|err| match err {
        SweepError::Serde(info) => SweepError::Serde(info.with_path(path)),
        other => other,
    })
}

/// Writes a record to disk, creating parent directories as needed.
pub fn write_config<T: Serialize>(path: &Path, value: &T) -> Result<(), SweepError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)
                .map_err(|err| SweepError::from_io("config_dir", parent, err))?;
        }
    }
    let text = encode(value)?;
    fs::write(path, text).map_err(|err| SweepError::from_io("config_write", path, err))
}

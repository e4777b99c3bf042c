use std::collections::BTreeMap;

use ljs_core::errors::{ErrorInfo, SweepError};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use sha2::{Digest, Sha256};

fn json_error(code: &str, err: serde_json::Error) -> SweepError {
    SweepError::Serde(ErrorInfo::new(code, err.to_string()))
}

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let sorted: BTreeMap<String, Value> = map
                .into_iter()
                .map(|(key, value)| (key, sort_keys(value)))
                .collect();
            Value::Object(sorted.into_iter().collect::<Map<_, _>>())
        }
        Value::Array(values) => Value::Array(values.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Pretty-printed JSON with sorted keys.
pub fn to_canonical_json_bytes<T: Serialize>(value: &T) -> Result<Vec<u8>, SweepError> {
    let value = serde_json::to_value(value).map_err(|err| json_error("json_serialize", err))?;
    serde_json::to_vec_pretty(&sort_keys(value)).map_err(|err| json_error("json_write", err))
}

/// Parses JSON bytes into `T`.
pub fn from_json_slice<T: DeserializeOwned>(data: &[u8]) -> Result<T, SweepError> {
    serde_json::from_slice(data).map_err(|err| json_error("json_deserialize", err))
}

/// Lowercase hex SHA-256 of the canonical JSON of `value`.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, SweepError> {
    let digest = Sha256::digest(to_canonical_json_bytes(value)?);
    Ok(format!("{digest:x}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nested_keys_are_sorted() {
        let value = serde_json::json!({ "b": { "z": 1, "a": 2 }, "a": [ { "y": 0, "x": 0 } ] });
        let text = String::from_utf8(to_canonical_json_bytes(&value).unwrap()).unwrap();
        let order: Vec<usize> = ["\"a\"", "\"x\"", "\"y\"", "\"b\"", "\"z\""]
            .iter()
            .map(|key| text.find(key).unwrap())
            .collect();
        assert!(order.windows(2).all(|pair| pair[0] < pair[1]));
    }
}

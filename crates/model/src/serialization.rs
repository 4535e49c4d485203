//! Stable JSON text for artifact files.
//!
//! Keys are sorted at every level and output is pretty-printed, so training
//! twice on the same data writes identical bytes.

use serde::Serialize;
use serde_json::Value;

fn sort_keys(value: Value) -> Value {
    match value {
        Value::Object(map) => {
            let mut entries: Vec<(String, Value)> = map.into_iter().collect();
            entries.sort_by(|a, b| a.0.cmp(&b.0));
            Value::Object(entries.into_iter().map(|(k, v)| (k, sort_keys(v))).collect())
        }
        Value::Array(items) => Value::Array(items.into_iter().map(sort_keys).collect()),
        other => other,
    }
}

/// Artifact JSON with sorted keys and two-space indentation
pub fn canonical_json_string<T: Serialize>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&sort_keys(serde_json::to_value(value)?))
}

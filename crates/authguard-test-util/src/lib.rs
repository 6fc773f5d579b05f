//! Shared test utilities for the authguard workspace.
//!
//! Lives in its own crate because both the CLI integration tests and `xtask`
//! need `normalize_nondeterministic`, which a `#[cfg(test)]` module cannot offer.

use serde_json::Value;

const TIMESTAMP_KEYS: &[&str] = &["started_at", "finished_at"];

/// Normalize non-deterministic JSON fields of a decision report for comparison.
///
/// - `tool.version` becomes `"__VERSION__"`, but only on a root object that looks like a
///   decision report (`schema`, `tool`, `status`, `reason`). Resources embedded elsewhere
///   may legitimately carry `name`/`version` pairs.
/// - `started_at` and `finished_at` become `"__TIMESTAMP__"` at any depth.
pub fn normalize_nondeterministic(mut value: Value) -> Value {
    if let Some(obj) = value.as_object_mut() {
        let is_report = ["schema", "tool", "status", "reason"]
            .iter()
            .all(|key| obj.contains_key(*key));
        if is_report
            && let Some(tool) = obj.get_mut("tool")
            && let Some(tool_obj) = tool.as_object_mut()
            && tool_obj.contains_key("version")
        {
            tool_obj.insert(
                "version".to_string(),
                Value::String("__VERSION__".to_string()),
            );
        }
    }
    normalize_timestamps_recursive(&mut value);
    value
}

fn normalize_timestamps_recursive(value: &mut Value) {
    match value {
        Value::Object(map) => {
            for key in TIMESTAMP_KEYS {
                if let Some(v) = map.get_mut(*key) {
                    *v = Value::String("__TIMESTAMP__".to_string());
                }
            }
            for val in map.values_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        Value::Array(arr) => {
            for val in arr.iter_mut() {
                normalize_timestamps_recursive(val);
            }
        }
        _ => {}
    }
}

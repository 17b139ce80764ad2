//! Sanitize-and-merge of externally sourced records.
//!
//! Drafts, remote payloads and single-field edits all go through
//! [`merge_snapshot`]: the incoming object is laid over the default record
//! key by key, then deserialized with the lenient field rules. The result
//! always satisfies the record invariants.

use serde_json::{Map, Value};

use crate::error::{ModelError, Result};
use crate::report::{Report, ReportField};

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn to_object<R: Report>(record: &R) -> Result<Map<String, Value>> {
    match serde_json::to_value(record)? {
        Value::Object(map) => Ok(map),
        other => Err(ModelError::NotAnObject {
            found: json_type_name(&other),
        }),
    }
}

/// Lays `incoming` over the default record of `R`.
///
/// - keys unknown to `R` are dropped
/// - a non-array value for an array field keeps the default array
/// - arrays are truncated or padded to their declared length
/// - unknown option values become unset, bad numbers become `None`
pub fn merge_snapshot<R: Report>(incoming: Value) -> Result<R> {
    let Value::Object(incoming) = incoming else {
        return Err(ModelError::NotAnObject {
            found: json_type_name(&incoming),
        });
    };

    let mut merged = to_object(&R::default())?;
    for (key, value) in incoming {
        match merged.get(&key) {
            Some(Value::Array(_)) if !value.is_array() => {
                tracing::debug!(field = %key, "non-array value for array field, keeping default");
            }
            Some(_) => {
                merged.insert(key, value);
            }
            None => {
                tracing::trace!(field = %key, "dropping unknown field");
            }
        }
    }

    Ok(serde_json::from_value(Value::Object(merged))?)
}

/// Parses stored snapshot text and merges it over the defaults.
pub fn parse_snapshot<R: Report>(text: &str) -> Result<R> {
    let value: Value = serde_json::from_str(text)?;
    merge_snapshot(value)
}

/// Returns a copy of `record` with exactly one field replaced.
///
/// The replacement goes through the same sanitizing rules as a draft load,
/// so the invariants hold whatever `value` is. Array fields only accept
/// arrays.
pub fn with_field<R: Report>(record: &R, field: R::Field, value: Value) -> Result<R> {
    let mut object = to_object(record)?;
    let key = field.wire_name();
    if object.get(key).is_some_and(Value::is_array) && !value.is_array() {
        return Err(ModelError::FieldShape {
            field: key,
            expected: "array",
            found: json_type_name(&value),
        });
    }
    object.insert(key.to_string(), value);
    merge_snapshot(Value::Object(object))
}

//! Forgiving deserializers for values read back from drafts and the API.
//!
//! Stored snapshots may have been written by older builds or edited by hand.
//! These helpers coerce rather than reject, so one odd field does not throw
//! away an otherwise usable record.

use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Coerces a JSON value into a finite number.
///
/// Numbers pass through when finite; numeric strings are parsed; everything
/// else (including blank strings) is `None`. Never yields zero for missing data.
pub fn number_from_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64().filter(|v| v.is_finite()),
        Value::String(s) => {
            let trimmed = s.trim();
            if trimmed.is_empty() {
                return None;
            }
            trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
        }
        _ => None,
    }
}

/// Deserializes an optional number with [`number_from_value`] semantics.
pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(number_from_value(&value))
}

/// Deserializes free text; `null` becomes empty, scalars are stringified.
pub fn text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Null | Value::Array(_) | Value::Object(_) => String::new(),
    })
}

/// Deserializes text that defaults to the unset sentinel when empty or null.
pub fn code<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    let value = text(deserializer)?;
    if value.trim().is_empty() {
        Ok(crate::UNSET.to_string())
    } else {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numbers_are_finite_or_none() {
        assert_eq!(number_from_value(&json!(2.5)), Some(2.5));
        assert_eq!(number_from_value(&json!(" 4.25 ")), Some(4.25));
        assert_eq!(number_from_value(&json!("")), None);
        assert_eq!(number_from_value(&json!("abc")), None);
        assert_eq!(number_from_value(&json!("NaN")), None);
        assert_eq!(number_from_value(&json!("inf")), None);
        assert_eq!(number_from_value(&json!(true)), None);
        assert_eq!(number_from_value(&Value::Null), None);
    }
}

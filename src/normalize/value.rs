//! Canonical forms for individual JSON values.

use serde_json::{Number, Value};

use crate::error::PolicyError;
use crate::types::ValueSet;

/// Human-readable JSON type name for error messages.
pub(crate) fn json_type(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Fold a string-or-array-of-strings field into a set.
///
/// A missing field and an empty array both mean "no constraint" and yield an
/// empty set.
pub fn string_set(value: Option<&Value>, path: &str) -> Result<ValueSet, PolicyError> {
    match value {
        None => Ok(ValueSet::new()),
        Some(Value::String(s)) => Ok(ValueSet::from([s.clone()])),
        Some(Value::Array(items)) => items
            .iter()
            .enumerate()
            .map(|(i, item)| match item {
                Value::String(s) => Ok(s.clone()),
                other => Err(PolicyError::malformed(
                    format!("{path}[{i}]"),
                    format!("expected a string, found {}", json_type(other)),
                )),
            })
            .collect(),
        Some(other) => Err(PolicyError::malformed(
            path,
            format!(
                "expected a string or an array of strings, found {}",
                json_type(other)
            ),
        )),
    }
}

/// Fold a condition value (scalar or array of scalars) into a set of
/// canonical strings.
pub fn condition_values(value: &Value, path: &str) -> Result<ValueSet, PolicyError> {
    match value {
        Value::Array(items) => items
            .iter()
            .enumerate()
            .map(|(i, item)| canonical_scalar(item, &format!("{path}[{i}]")))
            .collect(),
        scalar => Ok(ValueSet::from([canonical_scalar(scalar, path)?])),
    }
}

/// Canonical string for a scalar condition value. Values of different JSON
/// types compare equal only when these strings are identical.
pub fn canonical_scalar(value: &Value, path: &str) -> Result<String, PolicyError> {
    match value {
        Value::String(s) => Ok(s.clone()),
        Value::Bool(b) => Ok(b.to_string()),
        Value::Number(n) => Ok(canonical_number(n)),
        other => Err(PolicyError::malformed(
            path,
            format!(
                "expected a string, number or boolean, found {}",
                json_type(other)
            ),
        )),
    }
}

// Integral floats print without a fractional part, so `1.0` and `1` agree.
fn canonical_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    if let Some(u) = n.as_u64() {
        return u.to_string();
    }
    match n.as_f64() {
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

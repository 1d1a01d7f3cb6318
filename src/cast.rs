//! Best-effort coercion applied before type checking.
//!
//! Only two narrow conversions exist: numeric strings to numbers for the
//! `integer`, `number` and `float` types, and the literals `"true"`, `"1"`,
//! `1` / `"false"`, `"0"`, `0` to booleans for the `boolean` type. Anything
//! else is left untouched so the following type check reports it.

use serde_json::{Number, Value};

use crate::types::TypeName;

/// Coerces `value` in place for the declared type.
///
/// Returns true if the value was replaced.
pub(crate) fn cast_in_place(value: &mut Value, declared: &TypeName) -> bool {
    let cast = match declared {
        TypeName::Integer | TypeName::Number | TypeName::Float => to_number(value),
        TypeName::Boolean => to_boolean(value),
        _ => None,
    };

    match cast {
        Some(cast) => {
            tracing::trace!(from = %value, to = %cast, "cast value");
            *value = cast;
            true
        }
        None => false,
    }
}

/// Parses a string holding a finite decimal number.
///
/// Numbers, booleans, `null` and containers never cast. Surrounding
/// whitespace is ignored; an empty or blank string is not numeric and is
/// not turned into `0`.
pub fn to_number(value: &Value) -> Option<Value> {
    let text = value.as_str()?.trim();
    if text.is_empty() {
        return None;
    }
    let parsed: f64 = text.parse().ok()?;
    if !parsed.is_finite() {
        return None;
    }
    number_value(parsed)
}

/// Maps the boolean literal spellings onto `true` / `false`.
pub fn to_boolean(value: &Value) -> Option<Value> {
    match value {
        Value::String(s) if s == "true" || s == "1" => Some(Value::Bool(true)),
        Value::String(s) if s == "false" || s == "0" => Some(Value::Bool(false)),
        Value::Number(n) if n.as_f64() == Some(1.0) => Some(Value::Bool(true)),
        Value::Number(n) if n.as_f64() == Some(0.0) => Some(Value::Bool(false)),
        _ => None,
    }
}

/// Builds a JSON number, preferring the integer representation when exact.
pub(crate) fn number_value(n: f64) -> Option<Value> {
    const MAX_SAFE: f64 = 9_007_199_254_740_991.0;
    if n.fract() == 0.0 && n.abs() <= MAX_SAFE {
        Some(Value::from(n as i64))
    } else {
        Number::from_f64(n).map(Value::Number)
    }
}

/// Formats a number without a trailing `.0` for whole values.
pub(crate) fn format_number(n: &Number) -> String {
    if let Some(i) = n.as_i64() {
        i.to_string()
    } else if let Some(u) = n.as_u64() {
        u.to_string()
    } else {
        n.as_f64().map(|f| f.to_string()).unwrap_or_default()
    }
}

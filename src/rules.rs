//! Single-value constraint checks.
//!
//! Each rule checks one value against one limit and returns the same
//! `{valid, errors}` shape as a full validation. Passing a value of the
//! wrong kind (a number to [`max_length`], an object to [`minimum`]) is a
//! programming error and comes back as `Err(RuleError)` rather than as a
//! validation error.
//!
//! ```rust
//! use lxvalid::rules;
//! use serde_json::json;
//!
//! assert!(rules::divisible_by(&json!(6), 3.0).unwrap().valid);
//! assert!(!rules::divisible_by(&json!(5), 2.0).unwrap().valid);
//! assert!(rules::max_length(&json!(5), 3).is_err());
//! ```

use serde_json::Value;

use crate::cast::number_value;
use crate::error::{interpolate, Attribute, ValidationError, ValidationResult};
use crate::path::JsonPath;
use crate::validation::message_template;
use crate::validator::{has_duplicates, is_divisible, values_equal};

/// A rule was called with arguments of the wrong kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("rules.{rule}(fail): {expectation}")]
pub struct RuleError {
    pub rule: &'static str,
    pub expectation: &'static str,
}

impl RuleError {
    fn new(rule: &'static str, expectation: &'static str) -> Self {
        Self { rule, expectation }
    }
}

fn failure(attribute: Attribute, expected: Value, actual: Value) -> ValidationResult {
    let property = JsonPath::root();
    let message = interpolate(
        message_template(attribute, None),
        attribute.as_str(),
        &property,
        Some(&expected),
        Some(&actual),
    );
    ValidationResult::single(
        ValidationError::new(attribute.as_str(), property)
            .with_expected(expected)
            .with_actual(actual)
            .with_message(message),
    )
}

fn verdict(ok: bool, attribute: Attribute, expected: Value, actual: &Value) -> ValidationResult {
    if ok {
        ValidationResult::ok()
    } else {
        failure(attribute, expected, actual.clone())
    }
}

fn length_of(value: &Value) -> Option<usize> {
    match value {
        Value::String(s) => Some(s.chars().count()),
        Value::Array(items) => Some(items.len()),
        _ => None,
    }
}

fn limit(n: f64) -> Value {
    number_value(n).unwrap_or(Value::Null)
}

/// A string or array must have at most `max` elements.
pub fn max_length(value: &Value, max: usize) -> Result<ValidationResult, RuleError> {
    let len = length_of(value)
        .ok_or_else(|| RuleError::new("maxLength", "value must be a string or array"))?;
    Ok(verdict(len <= max, Attribute::MaxLength, Value::from(max), value))
}

/// A string or array must have at least `min` elements.
pub fn min_length(value: &Value, min: usize) -> Result<ValidationResult, RuleError> {
    let len = length_of(value)
        .ok_or_else(|| RuleError::new("minLength", "value must be a string or array"))?;
    Ok(verdict(len >= min, Attribute::MinLength, Value::from(min), value))
}

fn number_arg(value: &Value, rule: &'static str) -> Result<f64, RuleError> {
    value
        .as_f64()
        .ok_or_else(|| RuleError::new(rule, "value must be a number"))
}

pub fn minimum(value: &Value, min: f64) -> Result<ValidationResult, RuleError> {
    let n = number_arg(value, "minimum")?;
    Ok(verdict(n >= min, Attribute::Minimum, limit(min), value))
}

pub fn maximum(value: &Value, max: f64) -> Result<ValidationResult, RuleError> {
    let n = number_arg(value, "maximum")?;
    Ok(verdict(n <= max, Attribute::Maximum, limit(max), value))
}

pub fn exclusive_minimum(value: &Value, min: f64) -> Result<ValidationResult, RuleError> {
    let n = number_arg(value, "exclusiveMinimum")?;
    Ok(verdict(n > min, Attribute::ExclusiveMinimum, limit(min), value))
}

pub fn exclusive_maximum(value: &Value, max: f64) -> Result<ValidationResult, RuleError> {
    let n = number_arg(value, "exclusiveMaximum")?;
    Ok(verdict(n < max, Attribute::ExclusiveMaximum, limit(max), value))
}

/// The value must be a whole multiple of `divisor`, compared after decimal
/// scaling so `0.3` is divisible by `0.1`.
pub fn divisible_by(value: &Value, divisor: f64) -> Result<ValidationResult, RuleError> {
    let n = number_arg(value, "divisibleBy")?;
    Ok(verdict(
        is_divisible(n, divisor),
        Attribute::DivisibleBy,
        limit(divisor),
        value,
    ))
}

fn array_arg<'v>(value: &'v Value, rule: &'static str) -> Result<&'v Vec<Value>, RuleError> {
    value
        .as_array()
        .ok_or_else(|| RuleError::new(rule, "value must be an array"))
}

/// Reports the array length as `actual`.
pub fn min_items(value: &Value, min: usize) -> Result<ValidationResult, RuleError> {
    let len = array_arg(value, "minItems")?.len();
    Ok(verdict(len >= min, Attribute::MinItems, Value::from(min), &Value::from(len)))
}

/// Reports the array length as `actual`.
pub fn max_items(value: &Value, max: usize) -> Result<ValidationResult, RuleError> {
    let len = array_arg(value, "maxItems")?.len();
    Ok(verdict(len <= max, Attribute::MaxItems, Value::from(max), &Value::from(len)))
}

pub fn unique_items(value: &Value) -> Result<ValidationResult, RuleError> {
    let items = array_arg(value, "uniqueItems")?;
    if has_duplicates(items) {
        return Ok(failure(Attribute::UniqueItems, value.clone(), Value::Bool(true)));
    }
    Ok(ValidationResult::ok())
}

/// The value must equal one of `allowed`. An absent value is a usage error.
pub fn enum_of(value: Option<&Value>, allowed: &[Value]) -> Result<ValidationResult, RuleError> {
    let value = value.ok_or_else(|| RuleError::new("enum", "value must be defined"))?;
    let present = allowed
        .iter()
        .any(|candidate| values_equal(candidate, value));
    Ok(verdict(
        present,
        Attribute::Enum,
        Value::Array(allowed.to_vec()),
        value,
    ))
}

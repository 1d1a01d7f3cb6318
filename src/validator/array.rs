//! Array constraints: element schemas, item counts and uniqueness.

use std::collections::HashSet;

use serde_json::Value;

use crate::cast::format_number;
use crate::error::Attribute;
use crate::path::JsonPath;
use crate::schema::{Items, Schema};
use crate::validation::ValidationContext;

use super::property::validate_property;
use super::Slot;

pub(super) fn check(
    ctx: &mut ValidationContext<'_>,
    container: &mut Value,
    slot: &Slot,
    path: &JsonPath,
    schema: &Schema,
) {
    if let Some(items) = &schema.items {
        if let Some(array) = slot.get_mut(container) {
            validate_items(ctx, array, items, path);
        }
    }

    let Some(elements) = slot.get(container).and_then(Value::as_array) else {
        return;
    };
    let len = elements.len();

    if schema.min_items.is_some_and(|min| len < min) {
        let actual = Value::Array(elements.clone());
        ctx.report(Attribute::MinItems, path, Some(actual), schema);
    }
    if schema.max_items.is_some_and(|max| len > max) {
        let actual = Value::Array(elements.clone());
        ctx.report(Attribute::MaxItems, path, Some(actual), schema);
    }
    if schema.unique_items && has_duplicates(elements) {
        let actual = Value::Array(elements.clone());
        ctx.report(Attribute::UniqueItems, path, Some(actual), schema);
    }
}

/// Validates each element in place; errors carry the element index in
/// their path (`arr.0.name`, or just `0` for a root array).
fn validate_items(ctx: &mut ValidationContext<'_>, array: &mut Value, items: &Items, path: &JsonPath) {
    let len = array.as_array().map_or(0, Vec::len);

    match items {
        Items::Single(item) => {
            for index in 0..len {
                validate_property(ctx, array, &Slot::Index(index), &path.push_index(index), item);
            }
        }
        Items::Tuple(positional) => {
            for (index, item) in positional.iter().enumerate().take(len) {
                validate_property(ctx, array, &Slot::Index(index), &path.push_index(index), item);
            }
        }
    }
}

/// Returns true if two elements have the same canonical form.
pub(crate) fn has_duplicates(elements: &[Value]) -> bool {
    let mut seen = HashSet::with_capacity(elements.len());
    elements.iter().any(|element| !seen.insert(canonical(element)))
}

/// Serializes a value so equal numbers (`1`, `1.0`) share one key.
fn canonical(value: &Value) -> String {
    match value {
        Value::Number(n) => format_number(n),
        Value::Array(elements) => {
            let inner: Vec<String> = elements.iter().map(canonical).collect();
            format!("[{}]", inner.join(","))
        }
        Value::Object(map) => {
            let inner: Vec<String> = map
                .iter()
                .map(|(key, value)| format!("{}:{}", Value::from(key.as_str()), canonical(value)))
                .collect();
            format!("{{{}}}", inner.join(","))
        }
        other => other.to_string(),
    }
}

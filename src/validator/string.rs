//! String constraints: trimming, length and pattern.

use serde_json::Value;

use crate::error::Attribute;
use crate::path::JsonPath;
use crate::schema::Schema;
use crate::validation::ValidationContext;

use super::Slot;

/// Trims the stored string when requested, then checks `minLength`,
/// `maxLength` and `pattern` against the trimmed text.
///
/// `matched` holds the original string when a format conversion replaced
/// the stored value.
pub(super) fn check(
    ctx: &mut ValidationContext<'_>,
    container: &mut Value,
    slot: &Slot,
    matched: Option<&Value>,
    path: &JsonPath,
    schema: &Schema,
) {
    let trim = ctx.options().trims();

    if trim {
        if let Some(Value::String(stored)) = slot.get_mut(container) {
            let trimmed = stored.trim();
            if trimmed.len() != stored.len() {
                *stored = trimmed.to_string();
            }
        }
    }

    let current = match matched {
        Some(value) => Some(value),
        None => slot.get(container),
    };
    let Some(text) = current.and_then(Value::as_str) else {
        return;
    };
    let text = if trim { text.trim() } else { text };
    let length = text.chars().count();

    if schema.min_length.is_some_and(|min| length < min) {
        ctx.report(Attribute::MinLength, path, Some(Value::from(length)), schema);
    }
    if schema.max_length.is_some_and(|max| length > max) {
        ctx.report(Attribute::MaxLength, path, Some(Value::from(length)), schema);
    }
    if let Some(pattern) = &schema.pattern {
        if !pattern.is_match(text) {
            ctx.report(Attribute::Pattern, path, Some(Value::from(text)), schema);
        }
    }
}

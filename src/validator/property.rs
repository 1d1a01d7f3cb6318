//! Validation of a single property.
//!
//! The checks run in a fixed order; later checks see the value as the
//! earlier ones left it (cast, default filled, format converted).

use serde_json::Value;

use crate::cast::cast_in_place;
use crate::error::Attribute;
use crate::options::{TransformContext, ValidationOptions};
use crate::path::JsonPath;
use crate::registry::Registry;
use crate::schema::{Dependencies, Schema};
use crate::types::{runtime_type_name, TypeName};
use crate::validation::ValidationContext;

use super::{array, numeric, object, string, Slot};

/// Outcome of the `format` keyword.
enum FormatOutcome {
    /// No known format applied.
    Skipped,
    /// The named (lower-cased) format matched.
    Matched(String),
    Failed,
}

pub(crate) fn validate_property(
    ctx: &mut ValidationContext<'_>,
    container: &mut Value,
    slot: &Slot,
    path: &JsonPath,
    schema: &Schema,
) {
    let options = ctx.options();

    if options.ignores_null_values()
        && !schema.required
        && matches!(slot.get(container), Some(Value::Null))
    {
        return;
    }

    if options.requires_strictly() && schema.required {
        if let Some(Value::String(s)) = slot.get(container) {
            let tested = if options.trims() { s.trim() } else { s.as_str() };
            if tested.is_empty() {
                ctx.report(Attribute::Required, path, None, schema);
                return;
            }
        }
    }

    if slot.get(container).is_none() {
        match &schema.default {
            Some(default) if options.adds_missing_defaults() => {
                slot.set(container, default.produce());
                tracing::trace!(%path, "filled default");
                if slot.get(container).is_none() {
                    return;
                }
            }
            _ if schema.required && !schema.is_single_type(&TypeName::Any) => {
                ctx.report(Attribute::Required, path, None, schema);
                return;
            }
            _ => {
                check_conform(ctx, container, None, path, schema);
                return;
            }
        }
    }

    if options.casts() {
        if let [declared] = schema.types.as_slice() {
            if let Some(value) = slot.get_mut(container) {
                cast_in_place(value, declared);
            }
        }
    }

    // Checks after a conversion still look at the string that matched.
    let mut matched: Option<Value> = None;
    if !schema.formats.is_empty() && options.validates_formats() {
        if let Some(Value::String(text)) = slot.get(container) {
            let text = text.clone();
            match match_formats(ctx.registry(), options, &schema.formats, &text) {
                FormatOutcome::Skipped => {}
                FormatOutcome::Matched(format) => {
                    if let Some(convert) = options.convert_hook() {
                        slot.set(container, convert(&format, &text));
                        matched = Some(Value::String(text));
                    }
                }
                FormatOutcome::Failed => {
                    ctx.report(Attribute::Format, path, Some(Value::String(text)), schema);
                    return;
                }
            }
        }
    }

    if let Some(allowed) = &schema.enum_values {
        if let Some(value) = current(&matched, slot, container) {
            if !enum_contains(schema, allowed, value) {
                ctx.report(Attribute::Enum, path, Some(value.clone()), schema);
            }
        }
    }

    check_dependencies(ctx, container, path, schema);

    let value = current(&matched, slot, container);
    let Some(resolved) = resolve_type(ctx.registry(), schema, value) else {
        let actual = runtime_type_name(value);
        ctx.report(Attribute::Type, path, Some(Value::from(actual)), schema);
        return;
    };

    check_conform(ctx, container, value, path, schema);

    match resolved {
        TypeName::String => string::check(ctx, container, slot, matched.as_ref(), path, schema),
        TypeName::Integer | TypeName::Number | TypeName::Float => {
            if let Some(value) = current(&matched, slot, container) {
                numeric::check(ctx, value, path, schema);
            }
        }
        TypeName::Array => array::check(ctx, container, slot, path, schema),
        TypeName::Object if schema.declares_object => {
            if let Some(value) = slot.get_mut(container) {
                object::validate_object(ctx, value, schema, path);
            }
        }
        _ => {}
    }

    if let Some(transform) = options.transform_hook() {
        let errors = ctx.errors();
        let mut context = TransformContext {
            object: container,
            slot,
            property: path,
            schema,
            options,
            errors,
        };
        transform(&mut context);
    }
}

/// The value later checks look at: the matched string after a conversion,
/// otherwise whatever the slot holds.
fn current<'v>(matched: &'v Option<Value>, slot: &Slot, container: &'v Value) -> Option<&'v Value> {
    matched.as_ref().or_else(|| slot.get(container))
}

fn match_formats(
    registry: &Registry,
    options: &ValidationOptions,
    formats: &[String],
    text: &str,
) -> FormatOutcome {
    let subject = Value::String(text.to_string());
    let mut known = false;

    for name in formats {
        let format = name.trim().to_lowercase();
        match registry.resolve_format(&format, options.uses_format_extensions()) {
            Some(matcher) => {
                known = true;
                if matcher.matches(&subject) {
                    return FormatOutcome::Matched(format);
                }
            }
            None if options.validates_formats_strictly() => return FormatOutcome::Failed,
            None => tracing::debug!(%format, "skipping unknown format"),
        }
    }

    if known {
        FormatOutcome::Failed
    } else {
        FormatOutcome::Skipped
    }
}

fn enum_contains(schema: &Schema, allowed: &[Value], value: &Value) -> bool {
    let contains = |candidate: &Value| allowed.iter().any(|a| values_equal(a, candidate));

    match value {
        Value::Array(elements) if schema.types.contains(&TypeName::Array) => {
            let null_allowed = schema.types.contains(&TypeName::Null);
            elements
                .iter()
                .all(|element| (null_allowed && element.is_null()) || contains(element))
        }
        value => contains(value),
    }
}

/// Structural equality with numbers compared by value, so `1` equals `1.0`.
pub(crate) fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64() == y.as_f64(),
        (Value::Array(xs), Value::Array(ys)) => {
            xs.len() == ys.len() && xs.iter().zip(ys).all(|(x, y)| values_equal(x, y))
        }
        (Value::Object(xs), Value::Object(ys)) => {
            xs.len() == ys.len()
                && xs
                    .iter()
                    .all(|(k, x)| ys.get(k).is_some_and(|y| values_equal(x, y)))
        }
        (a, b) => a == b,
    }
}

fn check_dependencies(
    ctx: &mut ValidationContext<'_>,
    container: &mut Value,
    path: &JsonPath,
    schema: &Schema,
) {
    let Some(dependencies) = &schema.dependencies else {
        return;
    };

    match dependencies {
        Dependencies::Name(name) => {
            if container.get(name.as_str()).is_none() {
                ctx.report(Attribute::Dependencies, path, None, schema);
            }
        }
        Dependencies::Names(names) => {
            for name in names {
                if container.get(name.as_str()).is_none() {
                    ctx.report(Attribute::Dependencies, path, None, schema);
                }
            }
        }
        Dependencies::Schema(nested) => {
            let base = path.parent().unwrap_or_default();
            object::validate_object(ctx, container, nested, &base);
        }
    }
}

fn check_conform(
    ctx: &mut ValidationContext<'_>,
    container: &Value,
    value: Option<&Value>,
    path: &JsonPath,
    schema: &Schema,
) {
    if let Some(conform) = &schema.conform {
        if !conform(value, container) {
            ctx.report(Attribute::Conform, path, value.cloned(), schema);
        }
    }
}

/// Returns the first declared type the value satisfies, or the value's own
/// type when none is declared.
///
/// Alternatives are tried in declaration order; reaching a custom name with
/// no registered predicate fails the whole check.
fn resolve_type(registry: &Registry, schema: &Schema, value: Option<&Value>) -> Option<TypeName> {
    if schema.types.is_empty() {
        return Some(inferred_type(value));
    }
    for ty in &schema.types {
        if let TypeName::Custom(name) = ty {
            if registry.type_predicate(name).is_none() {
                tracing::warn!(r#type = %name, "unknown type name");
                return None;
            }
        }
        if registry.matches_type(ty, value) {
            return Some(ty.clone());
        }
    }
    None
}

fn inferred_type(value: Option<&Value>) -> TypeName {
    match value {
        None => TypeName::Undefined,
        Some(Value::Null) => TypeName::Null,
        Some(Value::Bool(_)) => TypeName::Boolean,
        Some(Value::Number(_)) => TypeName::Number,
        Some(Value::String(_)) => TypeName::String,
        Some(Value::Array(_)) => TypeName::Array,
        Some(Value::Object(_)) => TypeName::Object,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_values_equal_compares_numbers_by_value() {
        assert!(values_equal(&json!(1), &json!(1.0)));
        assert!(values_equal(&json!({"a": [1, 2]}), &json!({"a": [1.0, 2]})));
        assert!(!values_equal(&json!("1"), &json!(1)));
        assert!(!values_equal(&json!([1]), &json!([1, 1])));
    }

    #[test]
    fn test_enum_array_mode() {
        let schema = Schema::array().with_type("null").enum_values([json!("a"), json!("b")]);
        let allowed = schema.enum_values.clone().unwrap();
        assert!(enum_contains(&schema, &allowed, &json!(["a", null, "b"])));
        assert!(!enum_contains(&schema, &allowed, &json!(["a", "c"])));

        let strict = Schema::array().enum_values([json!("a")]);
        let allowed = strict.enum_values.clone().unwrap();
        assert!(!enum_contains(&strict, &allowed, &json!(["a", null])));
    }

    #[test]
    fn test_unregistered_type_stops_alternatives() {
        let registry = Registry::new();
        let schema = Schema::new().with_type("foo").with_type("string");
        assert_eq!(resolve_type(&registry, &schema, Some(&json!("x"))), None);

        let schema = Schema::new().with_type("string").with_type("foo");
        assert_eq!(
            resolve_type(&registry, &schema, Some(&json!("x"))),
            Some(TypeName::String)
        );
    }

    #[test]
    fn test_unknown_formats_are_skipped_unless_strict() {
        let registry = Registry::new();
        let formats = vec!["nope".to_string()];

        let lenient = ValidationOptions::new();
        assert!(matches!(
            match_formats(&registry, &lenient, &formats, "x"),
            FormatOutcome::Skipped
        ));

        let strict = ValidationOptions::new().validate_formats_strict(true);
        assert!(matches!(
            match_formats(&registry, &strict, &formats, "x"),
            FormatOutcome::Failed
        ));
    }

    #[test]
    fn test_first_matching_format_wins() {
        let registry = Registry::new();
        let options = ValidationOptions::new();
        let formats = vec!["Email".to_string(), "url".to_string()];

        match match_formats(&registry, &options, &formats, "http://google.de") {
            FormatOutcome::Matched(name) => assert_eq!(name, "url"),
            _ => panic!("expected a match"),
        }
        assert!(matches!(
            match_formats(&registry, &options, &formats, "nope"),
            FormatOutcome::Failed
        ));
    }
}

//! Integration tests for validation options.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use lxvalid::{
    OptionsError, Schema, TransformContext, UnknownProperties, ValidationOptions, Validator,
};
use serde_json::{json, Value};

#[test]
fn test_defaults() {
    let options = ValidationOptions::new();
    assert!(options.validates_formats());
    assert!(!options.validates_formats_strictly());
    assert!(options.uses_format_extensions());
    assert!(!options.adds_missing_defaults());
    assert_eq!(options.unknown_policy(), UnknownProperties::Ignore);
    assert!(!options.trims());
    assert!(!options.requires_strictly());
    assert!(!options.ignores_null_values());
    assert!(!options.casts());
    assert!(!options.is_update());
}

#[test]
fn test_add_missing_defaults() {
    let schema = Schema::object()
        .property("role", Schema::string().default_value(json!("user")))
        .property("tags", Schema::array().default_with(|| json!([])))
        .property("age", Schema::integer().default_value(json!(-1)).minimum(0.0));
    let validator = Validator::new();

    let validated = validator.validate_and_transform(
        json!({}),
        &schema,
        &ValidationOptions::new().add_missing_defaults(true),
    );
    assert_eq!(validated.value, json!({"role": "user", "tags": [], "age": -1}));
    assert_eq!(validated.result.errors.len(), 1);
    assert_eq!(validated.result.errors[0].attribute, "minimum");

    let validated = validator.validate_and_transform(json!({}), &schema, &ValidationOptions::new());
    assert!(validated.result.valid);
    assert_eq!(validated.value, json!({}));
}

#[test]
fn test_defaults_satisfy_required() {
    let schema = Schema::object().property(
        "role",
        Schema::string().required(true).default_value(json!("user")),
    );

    assert!(!lxvalid::validate(&json!({}), &schema).valid);

    let options = ValidationOptions::new().add_missing_defaults(true);
    assert!(Validator::new().validate(&json!({}), &schema, &options).valid);
}

#[test]
fn test_trim() {
    let schema = Schema::object().property("name", Schema::string().max_length(3));
    let options = ValidationOptions::new().trim(true);

    let validated =
        Validator::new().validate_and_transform(json!({"name": "  abc  "}), &schema, &options);
    assert!(validated.result.valid);
    assert_eq!(validated.value, json!({"name": "abc"}));

    assert!(!lxvalid::validate(&json!({"name": "  abc  "}), &schema).valid);
}

#[test]
fn test_strict_required() {
    let schema = Schema::object().property("name", Schema::string().required(true));
    let validator = Validator::new();

    assert!(validator.validate(&json!({"name": ""}), &schema, &ValidationOptions::new()).valid);

    let strict = ValidationOptions::new().strict_required(true);
    let result = validator.validate(&json!({"name": ""}), &schema, &strict);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].attribute, "required");

    assert!(validator.validate(&json!({"name": "  "}), &schema, &strict).valid);
    assert!(!validator.validate(&json!({"name": "  "}), &schema, &strict.trim(true)).valid);
}

#[test]
fn test_ignore_null_values() {
    let schema = Schema::object()
        .property("nickname", Schema::string())
        .property("name", Schema::string().required(true));
    let options = ValidationOptions::new().ignore_null_values(true);
    let validator = Validator::new();

    let result = validator.validate(&json!({"nickname": null, "name": "a"}), &schema, &options);
    assert!(result.valid);

    let result = validator.validate(&json!({"nickname": null, "name": null}), &schema, &options);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "name");
    assert_eq!(result.errors[0].actual, Some(json!("null")));

    let result = validator.validate(&json!({"nickname": null, "name": "a"}), &schema, &ValidationOptions::new());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "nickname");
}

#[test]
fn test_transform_hook_sees_every_typed_property() {
    let calls = Arc::new(AtomicUsize::new(0));
    let seen = Arc::clone(&calls);

    let schema = Schema::object()
        .property("name", Schema::string())
        .property("age", Schema::integer());
    let options = ValidationOptions::new().transform(move |ctx: &mut TransformContext<'_>| {
        seen.fetch_add(1, Ordering::SeqCst);
        if let Some(Value::String(s)) = ctx.value_mut() {
            *s = s.to_uppercase();
        }
    });

    let validated = Validator::new().validate_and_transform(
        json!({"name": "ada", "age": "x"}),
        &schema,
        &options,
    );

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(validated.value, json!({"name": "ADA", "age": "x"}));
    assert_eq!(validated.result.errors.len(), 1);
}

#[test]
fn test_transform_context_exposes_path_and_errors() {
    let schema = Schema::object()
        .property("a", Schema::integer().minimum(10.0))
        .property("b", Schema::object().property("c", Schema::string()));
    let options = ValidationOptions::new().transform(|ctx: &mut TransformContext<'_>| {
        let path = ctx.property().to_string();
        let errors = ctx.errors().len();
        ctx.object_mut()["_seen"] = json!(format!("{path}:{errors}"));
    });

    let validated = Validator::new().validate_and_transform(
        json!({"a": 1, "b": {"c": "x"}}),
        &schema,
        &options,
    );

    assert_eq!(validated.value["_seen"], json!("b:1"));
    assert_eq!(validated.value["b"]["_seen"], json!("b.c:1"));
}

#[test]
fn test_from_json() {
    let options = ValidationOptions::from_json(&json!({
        "validateFormats": false,
        "trim": true,
        "isUpdate": true,
        "unknownProperties": "error",
        "somethingElse": 1
    }))
    .unwrap();

    assert!(!options.validates_formats());
    assert!(options.trims());
    assert!(options.is_update());
    assert_eq!(options.unknown_policy(), UnknownProperties::Error);

    let legacy = ValidationOptions::from_json(&json!({"deleteUnknownProperties": true})).unwrap();
    assert_eq!(legacy.unknown_policy(), UnknownProperties::Delete);
}

#[test]
fn test_from_json_rejects_bad_shapes() {
    assert!(matches!(
        ValidationOptions::from_json(&json!([])),
        Err(OptionsError::NotAnObject)
    ));
    assert!(matches!(
        ValidationOptions::from_json(&json!({"cast": "yes"})),
        Err(OptionsError::InvalidOption { name: "cast", .. })
    ));
    assert!(matches!(
        ValidationOptions::from_json(&json!({"unknownProperties": "drop"})),
        Err(OptionsError::InvalidOption { name: "unknownProperties", .. })
    ));
}

#[test]
fn test_with_defaults_fills_unset_options_only() {
    let defaults = ValidationOptions::new().cast(true).trim(true);
    let merged = ValidationOptions::new().trim(false).with_defaults(&defaults);

    assert!(merged.casts());
    assert!(!merged.trims());
}

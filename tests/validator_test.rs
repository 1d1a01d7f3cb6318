//! Integration tests for the behaviour every consumer relies on.

use lxvalid::{Schema, UnknownProperties, ValidationOptions, Validator};
use serde_json::json;

fn schema(document: serde_json::Value) -> Schema {
    Schema::from_json(&document).unwrap()
}

#[test]
fn test_missing_required_property() {
    let schema = schema(json!({
        "properties": {
            "name": {"type": "string", "required": true},
            "age": {"type": "integer"}
        }
    }));

    let result = lxvalid::validate(&json!({"age": 3}), &schema);
    assert!(!result.valid);
    assert_eq!(result.errors.len(), 1);

    let error = &result.errors[0];
    assert_eq!(error.attribute, "required");
    assert_eq!(error.property, "name");
    assert_eq!(error.message, "is required");
    assert_eq!(error.actual, None);
}

#[test]
fn test_legacy_required_list() {
    let schema = schema(json!({
        "properties": {"name": {"type": "string"}},
        "required": ["name", "email"]
    }));

    let result = lxvalid::validate(&json!({}), &schema);
    let properties: Vec<String> = result.errors.iter().map(|e| e.property.to_string()).collect();
    assert_eq!(properties, ["name", "email"]);
    assert!(result.errors.iter().all(|e| e.attribute == "required"));
}

#[test]
fn test_cast_numeric_string() {
    let schema = schema(json!({"properties": {"value": {"type": "integer"}}}));
    let options = ValidationOptions::new().cast(true);
    let validator = Validator::new();

    let validated = validator.validate_and_transform(json!({"value": "10"}), &schema, &options);
    assert!(validated.result.valid);
    assert_eq!(validated.value, json!({"value": 10}));

    let validated = validator.validate_and_transform(json!({"value": "aaa"}), &schema, &options);
    assert!(!validated.result.valid);
    assert_eq!(validated.result.errors[0].attribute, "type");
    assert_eq!(validated.result.errors[0].actual, Some(json!("string")));
    assert_eq!(validated.result.errors[0].message, "must be of integer type");
    assert_eq!(validated.value, json!({"value": "aaa"}));
}

#[test]
fn test_cast_boolean_literals() {
    let schema = Schema::object().property("flag", Schema::boolean());
    let options = ValidationOptions::new().cast(true);
    let validator = Validator::new();

    for (input, expected) in [(json!("true"), true), (json!("0"), false), (json!(1), true)] {
        let validated = validator.validate_and_transform(json!({"flag": input}), &schema, &options);
        assert!(validated.result.valid);
        assert_eq!(validated.value, json!({"flag": expected}));
    }

    let validated = validator.validate_and_transform(json!({"flag": "yes"}), &schema, &options);
    assert!(!validated.result.valid);
}

#[test]
fn test_cast_is_off_by_default() {
    let schema = Schema::object().property("value", Schema::integer());
    let result = lxvalid::validate(&json!({"value": "10"}), &schema);
    assert!(!result.valid);
}

#[test]
fn test_nested_array_of_objects_paths() {
    let schema = schema(json!({
        "properties": {
            "arr": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {"name": {"type": "string"}}
                }
            }
        }
    }));

    let result = lxvalid::validate(&json!({"arr": [{"name": 1}, {"name": "2"}]}), &schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "arr.0.name");
    assert_eq!(result.errors[0].attribute, "type");
}

#[test]
fn test_root_array_paths() {
    let schema = schema(json!({"items": {"type": "string"}}));

    let result = lxvalid::validate(&json!([1, 2, 3]), &schema);
    assert_eq!(result.errors.len(), 3);
    for (index, error) in result.errors.iter().enumerate() {
        assert_eq!(error.attribute, "type");
        assert_eq!(error.property.to_string(), index.to_string());
        assert_eq!(error.actual, Some(json!("number")));
    }
}

#[test]
fn test_errors_follow_declaration_order() {
    let schema = Schema::object()
        .property("list", Schema::array().items(Schema::integer().minimum(10.0)))
        .property("name", Schema::string().min_length(3));

    let result = lxvalid::validate(&json!({"list": [1, 20, 2, 3], "name": "x"}), &schema);
    let properties: Vec<String> = result.errors.iter().map(|e| e.property.to_string()).collect();
    assert_eq!(properties, ["list.0", "list.2", "list.3", "name"]);
}

#[test]
fn test_unknown_properties_error() {
    let schema = Schema::object()
        .property("a", Schema::integer())
        .property("b", Schema::string());
    let options = ValidationOptions::new().unknown_properties(UnknownProperties::Error);

    let result = Validator::new().validate(
        &json!({"a": 1, "b": "x", "c": 3, "d": "extra"}),
        &schema,
        &options,
    );

    assert_eq!(result.errors.len(), 2);
    assert_eq!(result.errors[0].attribute, "unknown");
    assert_eq!(result.errors[0].property, "c");
    assert_eq!(result.errors[0].actual, Some(json!(3)));
    assert_eq!(result.errors[0].message, "is not defined in schema");
    assert_eq!(result.errors[1].property, "d");
    assert_eq!(result.errors[1].actual, Some(json!("extra")));
}

#[test]
fn test_validation_function_update_mode() {
    let schema = Schema::object()
        .property("name", Schema::string().required(true))
        .property("email", Schema::string().format("email").required(true));

    let validate = Validator::new().validation_function(ValidationOptions::new().update(true));

    let result = validate(&json!({"email": "user@example.com"}), &schema, &ValidationOptions::new());
    assert!(result.valid);

    let result = validate(&json!({"email": "test-gmail.com"}), &schema, &ValidationOptions::new());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].attribute, "format");

    // Explicit caller options win over bound defaults.
    let result = validate(&json!({}), &schema, &ValidationOptions::new().update(false));
    assert_eq!(result.errors.len(), 2);
}

#[test]
fn test_validation_function_treats_null_as_empty_object() {
    let schema = Schema::object().property("name", Schema::string().required(true));
    let validate = Validator::new().validation_function(ValidationOptions::new());

    let result = validate(&json!(null), &schema, &ValidationOptions::new());
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "name");
}

#[test]
fn test_update_mode_keeps_schema_untouched() {
    let schema = Schema::object().property("name", Schema::string().required(true));
    let options = ValidationOptions::new().update(true);

    assert!(Validator::new().validate(&json!({}), &schema, &options).valid);
    assert!(schema.get_property("name").unwrap().is_required());
    assert!(!lxvalid::validate(&json!({}), &schema).valid);
}

#[test]
fn test_result_to_json_shape() {
    let schema = Schema::object().property("age", Schema::integer().minimum(18.0));
    let result = lxvalid::validate(&json!({"age": 3}), &schema);

    assert_eq!(
        result.to_json(),
        json!({
            "valid": false,
            "errors": [{
                "attribute": "minimum",
                "property": "age",
                "expected": 18,
                "actual": 3,
                "message": "must be greater than or equal to 18"
            }]
        })
    );
}

#[test]
fn test_cast_leaves_blank_strings_for_type_check() {
    let schema = Schema::object().property("count", Schema::integer());
    let options = ValidationOptions::new().cast(true);

    for blank in ["", "  "] {
        let validated =
            Validator::new().validate_and_transform(json!({ "count": blank }), &schema, &options);
        assert_eq!(validated.value, json!({ "count": blank }));
        assert_eq!(validated.result.errors.len(), 1);
        assert_eq!(validated.result.errors[0].attribute, "type");
    }
}

//! Integration tests for array schemas.

use lxvalid::{Schema, ValidationOptions, Validator};
use serde_json::json;

#[test]
fn test_array_of_strings() {
    let schema = Schema::object().property("tags", Schema::array().items(Schema::string().min_length(1)));

    assert!(lxvalid::validate(&json!({"tags": ["a", "b"]}), &schema).valid);

    let result = lxvalid::validate(&json!({"tags": ["a", ""]}), &schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "tags.1");
    assert_eq!(result.errors[0].attribute, "minLength");
}

#[test]
fn test_tuple_items_validate_positionally() {
    let schema = Schema::object().property(
        "pair",
        Schema::array().tuple_items(vec![Schema::string(), Schema::integer()]),
    );

    assert!(lxvalid::validate(&json!({"pair": ["a", 1, {"extra": true}]}), &schema).valid);
    assert!(lxvalid::validate(&json!({"pair": ["a"]}), &schema).valid);

    let result = lxvalid::validate(&json!({"pair": [1, "b"]}), &schema);
    let properties: Vec<String> = result.errors.iter().map(|e| e.property.to_string()).collect();
    assert_eq!(properties, ["pair.0", "pair.1"]);
}

#[test]
fn test_item_counts() {
    let schema = Schema::object().property("list", Schema::array().min_items(2).max_items(3));

    assert!(lxvalid::validate(&json!({"list": [1, 2]}), &schema).valid);

    let result = lxvalid::validate(&json!({"list": [1]}), &schema);
    assert_eq!(result.errors[0].attribute, "minItems");
    assert_eq!(result.errors[0].expected, Some(json!(2)));
    assert_eq!(result.errors[0].actual, Some(json!([1])));
    assert_eq!(result.errors[0].message, "must contain more than 2 items");

    let result = lxvalid::validate(&json!({"list": [1, 2, 3, 4]}), &schema);
    assert_eq!(result.errors[0].attribute, "maxItems");
}

#[test]
fn test_unique_items() {
    let schema = Schema::object().property("list", Schema::array().unique_items(true));

    assert!(lxvalid::validate(&json!({"list": [1, 2, 3]}), &schema).valid);

    let result = lxvalid::validate(&json!({"list": [1, 2, 3, 3]}), &schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].attribute, "uniqueItems");
    assert_eq!(result.errors[0].message, "must hold a unique set of values");

    assert!(!lxvalid::validate(&json!({"list": [{"a": 1}, {"a": 1}]}), &schema).valid);
    assert!(lxvalid::validate(&json!({"list": [{"a": 1}, {"a": "1"}]}), &schema).valid);
}

#[test]
fn test_items_cast_elements_in_place() {
    let schema = Schema::object().property("ids", Schema::array().items(Schema::integer()));
    let options = ValidationOptions::new().cast(true);

    let validated =
        Validator::new().validate_and_transform(json!({"ids": ["1", 2, "3"]}), &schema, &options);
    assert!(validated.result.valid);
    assert_eq!(validated.value, json!({"ids": [1, 2, 3]}));
}

#[test]
fn test_root_array_elements_are_trimmed() {
    let schema = Schema::array().items(Schema::string().min_length(2));
    let options = ValidationOptions::new().trim(true);

    let validated =
        Validator::new().validate_and_transform(json!([" ab ", " c "]), &schema, &options);
    assert_eq!(validated.value, json!(["ab", "c"]));
    assert_eq!(validated.result.errors.len(), 1);
    assert_eq!(validated.result.errors[0].property, "1");
    assert_eq!(validated.result.errors[0].actual, Some(json!(1)));
}

#[test]
fn test_enum_on_arrays() {
    let schema = Schema::object().property(
        "roles",
        Schema::array()
            .with_type("null")
            .enum_values([json!("admin"), json!("user")]),
    );

    assert!(lxvalid::validate(&json!({"roles": ["admin", null]}), &schema).valid);

    let result = lxvalid::validate(&json!({"roles": ["admin", "root"]}), &schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].attribute, "enum");
    assert_eq!(result.errors[0].expected, Some(json!(["admin", "user"])));
}

#[test]
fn test_nested_arrays() {
    let schema = Schema::object().property(
        "matrix",
        Schema::array().items(Schema::array().items(Schema::number())),
    );

    let result = lxvalid::validate(&json!({"matrix": [[1, 2], [3, "x"]]}), &schema);
    assert_eq!(result.errors.len(), 1);
    assert_eq!(result.errors[0].property, "matrix.1.1");
}

//! Tests for sharing validators and registries across threads.

use std::sync::Arc;
use std::thread;

use lxvalid::{Registry, Schema, ValidationOptions, Validator};
use serde_json::json;

#[test]
fn test_concurrent_validation() {
    let validator = Validator::new();
    let schema = Arc::new(
        Schema::object()
            .property("name", Schema::string().required(true))
            .property("age", Schema::integer().minimum(0.0)),
    );

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let validator = validator.clone();
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let value = json!({"name": format!("User{}", i), "age": 20 + i});
                let result = validator.validate(&value, &schema, &ValidationOptions::new());
                assert!(result.valid);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}

#[test]
fn test_concurrent_extension() {
    let registry = Arc::new(Registry::new());

    let handles: Vec<_> = (0..10)
        .map(|i| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || {
                registry
                    .extend_format(&format!("code{}", i), &format!(r"^{}\d+$", i))
                    .unwrap();
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    // url plus the ten registered formats
    assert_eq!(registry.format_extensions().len(), 11);

    let validator = Validator::with_registry(registry);
    let schema = Schema::object().property("code", Schema::string().format("code7"));
    let options = ValidationOptions::new();
    assert!(validator.validate(&json!({"code": "712"}), &schema, &options).valid);
    assert!(!validator.validate(&json!({"code": "612"}), &schema, &options).valid);
}

#[test]
fn test_concurrent_registration_of_same_name() {
    let registry = Arc::new(Registry::new());

    let handles: Vec<_> = (0..8)
        .map(|_| {
            let registry = Arc::clone(&registry);
            thread::spawn(move || registry.extend_format("shared", r"^s$").is_ok())
        })
        .collect();

    let successes = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .filter(|ok| *ok)
        .count();
    assert_eq!(successes, 1);
}

#[test]
fn test_validation_function_is_send_and_sync() {
    let validate = Arc::new(Validator::new().validation_function(ValidationOptions::new().cast(true)));
    let schema = Arc::new(Schema::object().property("n", Schema::integer()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validate = Arc::clone(&validate);
            let schema = Arc::clone(&schema);
            thread::spawn(move || {
                let value = json!({"n": i.to_string()});
                validate(&value, &*schema, &ValidationOptions::new()).valid
            })
        })
        .collect();

    for handle in handles {
        assert!(handle.join().unwrap());
    }
}

//! The recursive validator.
//!
//! [`Validator`] walks a value alongside its [`Schema`], checks every
//! constraint in a fixed order and collects path-qualified errors. Values are
//! addressed through their container and a [`Slot`] so casts, trims,
//! conversions, defaults and key deletions land exactly where the value
//! lives.

mod array;
mod numeric;
mod object;
mod property;
mod string;

use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ValidationResult;
use crate::options::ValidationOptions;
use crate::path::JsonPath;
use crate::registry::{Registry, RegistryError};
use crate::schema::Schema;
use crate::validation::ValidationContext;

pub(crate) use array::has_duplicates;
pub(crate) use numeric::is_divisible;
pub(crate) use property::values_equal;

/// Where a value lives inside its container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Slot {
    /// The container is the value itself (root arrays).
    Root,
    Field(String),
    Index(usize),
}

impl Slot {
    pub(crate) fn get<'v>(&self, container: &'v Value) -> Option<&'v Value> {
        match self {
            Slot::Root => Some(container),
            Slot::Field(key) => container.get(key.as_str()),
            Slot::Index(index) => container.get(*index),
        }
    }

    pub(crate) fn get_mut<'v>(&self, container: &'v mut Value) -> Option<&'v mut Value> {
        match self {
            Slot::Root => Some(container),
            Slot::Field(key) => container.get_mut(key.as_str()),
            Slot::Index(index) => container.get_mut(*index),
        }
    }

    /// Writes `value` into the slot. A field slot on a non-object container
    /// is left untouched.
    pub(crate) fn set(&self, container: &mut Value, value: Value) {
        match self {
            Slot::Root => *container = value,
            Slot::Field(key) => {
                if let Some(map) = container.as_object_mut() {
                    map.insert(key.clone(), value);
                }
            }
            Slot::Index(index) => {
                if let Some(element) = container.get_mut(*index) {
                    *element = value;
                }
            }
        }
    }
}

/// A validation verdict together with the value after every side effect
/// (casts, trims, conversions, defaults, deleted keys) was applied.
#[derive(Debug, Clone, PartialEq)]
pub struct Validated {
    pub value: Value,
    pub result: ValidationResult,
}

/// Validates values against schemas using one set of extension tables.
///
/// Validators are cheap to clone; clones share the same [`Registry`].
///
/// # Example
///
/// ```rust
/// use lxvalid::{Schema, ValidationOptions, Validator};
/// use serde_json::json;
///
/// let validator = Validator::new();
/// validator.registry().extend_format("zip", r"^\d{5}$").unwrap();
///
/// let schema = Schema::object().property("zip", Schema::string().format("zip"));
/// let options = ValidationOptions::new();
///
/// assert!(validator.validate(&json!({"zip": "12345"}), &schema, &options).valid);
/// assert!(!validator.validate(&json!({"zip": "1234"}), &schema, &options).valid);
/// ```
#[derive(Debug, Clone, Default)]
pub struct Validator {
    registry: Arc<Registry>,
}

impl Validator {
    /// Creates a validator with a fresh registry of its own.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a validator sharing an existing registry.
    pub fn with_registry(registry: Arc<Registry>) -> Self {
        Self { registry }
    }

    pub fn registry(&self) -> &Arc<Registry> {
        &self.registry
    }

    /// Shorthand for `registry().extend_format(..)`.
    pub fn extend_format(&self, name: &str, pattern: &str) -> Result<(), RegistryError> {
        self.registry.extend_format(name, pattern)
    }

    /// Validates `value` without touching it.
    ///
    /// Side effects requested by the options run on a private copy, so the
    /// verdict reflects casts and defaults while the caller's value stays as
    /// it was.
    pub fn validate(
        &self,
        value: &Value,
        schema: &Schema,
        options: &ValidationOptions,
    ) -> ValidationResult {
        self.validate_and_transform(value.clone(), schema, options)
            .result
    }

    /// Validates `value` and hands back the value with every side effect
    /// applied.
    ///
    /// ```rust
    /// use lxvalid::{Schema, ValidationOptions, Validator};
    /// use serde_json::json;
    ///
    /// let schema = Schema::object().property("value", Schema::integer());
    /// let options = ValidationOptions::new().cast(true);
    ///
    /// let validated = Validator::new().validate_and_transform(json!({"value": "10"}), &schema, &options);
    /// assert!(validated.result.valid);
    /// assert_eq!(validated.value, json!({"value": 10}));
    /// ```
    pub fn validate_and_transform(
        &self,
        mut value: Value,
        schema: &Schema,
        options: &ValidationOptions,
    ) -> Validated {
        let relaxed;
        let schema = if options.is_update() {
            relaxed = schema.relaxed_for_update(&value);
            &relaxed
        } else {
            schema
        };

        let mut ctx = ValidationContext::new(&self.registry, options);
        if schema.has_items() {
            property::validate_property(&mut ctx, &mut value, &Slot::Root, &JsonPath::root(), schema);
        } else {
            object::validate_object(&mut ctx, &mut value, schema, &JsonPath::root());
        }

        let result = ctx.into_result();
        tracing::debug!(
            valid = result.valid,
            errors = result.errors.len(),
            "validation finished"
        );

        Validated { value, result }
    }

    /// Returns a validation function with bound default options.
    ///
    /// The defaults only fill options the caller leaves unset. A `null`
    /// value is validated as an empty object.
    ///
    /// ```rust
    /// use lxvalid::{Schema, ValidationOptions, Validator};
    /// use serde_json::json;
    ///
    /// let validate = Validator::new().validation_function(ValidationOptions::new().update(true));
    /// let schema = Schema::object().property("name", Schema::string().required(true));
    ///
    /// let result = validate(&json!({}), &schema, &ValidationOptions::new());
    /// assert!(result.valid);
    /// ```
    pub fn validation_function(
        &self,
        defaults: ValidationOptions,
    ) -> impl Fn(&Value, &Schema, &ValidationOptions) -> ValidationResult + Send + Sync + 'static
    {
        let validator = self.clone();
        move |value: &Value, schema: &Schema, options: &ValidationOptions| {
            let options = options.with_defaults(&defaults);
            match value {
                Value::Null => validator.validate(&Value::Object(Map::new()), schema, &options),
                value => validator.validate(value, schema, &options),
            }
        }
    }
}

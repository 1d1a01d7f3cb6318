//! # lxvalid
//!
//! A schema-driven validator for JSON values that collects every violation
//! as a path-qualified error instead of stopping at the first one.
//!
//! ## Overview
//!
//! A [`Schema`] describes the expected shape of a value: its type, string
//! format, lengths, numeric ranges, array items, nested properties and
//! cross-property dependencies. Validation walks the value alongside the
//! schema and returns a [`ValidationResult`] whose errors each name the
//! violated constraint, the dotted path of the offending value, the expected
//! and actual values and an interpolated message.
//!
//! Besides judging a value, validation can also repair it: cast numeric
//! strings, trim whitespace, fill defaults, convert formatted strings and
//! prune unknown keys. Those side effects are opt-in through
//! [`ValidationOptions`] and are returned by
//! [`Validator::validate_and_transform`].
//!
//! ## Core Types
//!
//! - [`Schema`]: Builder (or JSON-parsed) description of a value
//! - [`ValidationOptions`]: Flags and hooks for one validation pass
//! - [`Validator`]: Runs validations against its own [`Registry`] of custom formats and types
//! - [`ValidationResult`]: The `{valid, errors}` outcome
//! - [`AsyncValidator`]: Runs externally registered checks in parallel
//!
//! ## Example
//!
//! ```rust
//! use lxvalid::{Schema, ValidationOptions, Validator};
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .property("name", Schema::string().min_length(2).required(true))
//!     .property("email", Schema::string().format("email"))
//!     .property("age", Schema::integer().minimum(0.0));
//!
//! let result = lxvalid::validate(&json!({"name": "Al", "age": 3}), &schema);
//! assert!(result.valid);
//!
//! let result = lxvalid::validate(&json!({"email": "test-gmail.com", "age": -1}), &schema);
//! assert!(!result.valid);
//! let attributes: Vec<_> = result.errors.iter().map(|e| e.attribute.as_str()).collect();
//! assert_eq!(attributes, ["required", "format", "minimum"]);
//!
//! let validated = Validator::new().validate_and_transform(
//!     json!({"name": " Al ", "age": "3"}),
//!     &schema,
//!     &ValidationOptions::new().trim(true).cast(true),
//! );
//! assert_eq!(validated.value, json!({"name": "Al", "age": 3}));
//! ```

pub mod async_validator;
pub mod cast;
pub mod error;
pub mod formats;
pub mod options;
pub mod path;
pub mod registry;
pub mod rules;
pub mod schema;
pub mod types;
mod validation;
pub mod validator;

use serde_json::Value;

pub use async_validator::{AsyncValidationError, AsyncValidator, BoxError};
pub use error::{interpolate, Attribute, ValidationError, ValidationErrors, ValidationResult};
pub use formats::Format;
pub use options::{
    ConvertFn, OptionsError, TransformContext, TransformFn, UnknownProperties, ValidationOptions,
};
pub use path::{JsonPath, PathSegment};
pub use registry::{FormatMatcher, Registry, RegistryError};
pub use rules::RuleError;
pub use schema::{
    AdditionalProperties, ConformFn, DefaultFn, DefaultValue, Dependencies, Items, Schema,
    SchemaParseError,
};
pub use types::{ForeignValue, TypeName};
pub use validator::{Validated, Validator};

/// Validates `value` against `schema` with default options and a fresh
/// registry.
pub fn validate(value: &Value, schema: &Schema) -> ValidationResult {
    Validator::new().validate(value, schema, &ValidationOptions::new())
}

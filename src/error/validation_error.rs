//! Validation error and result types.
//!
//! This module provides [`ValidationError`] for single constraint violations,
//! [`ValidationResult`] for the `{valid, errors}` outcome of a validation pass,
//! and [`ValidationErrors`] for handing failures to stillwater-based code.

use std::fmt::{self, Display};

use serde_json::{json, Value};
use stillwater::prelude::*;
use stillwater::Validation;

use crate::path::JsonPath;

/// A single constraint violation.
///
/// - **attribute**: The constraint name (`type`, `minLength`, `unknown`, ...)
/// - **property**: Dotted path from the document root
/// - **expected**: The constraint's configured value, when it has one
/// - **actual**: The offending value (or its runtime type name for `type`)
/// - **message**: The already interpolated, human-readable message
///
/// # Example
///
/// ```rust
/// use lxvalid::{JsonPath, ValidationError};
/// use serde_json::json;
///
/// let error = ValidationError::new("minLength", JsonPath::from_field("name"))
///     .with_expected(json!(3))
///     .with_actual(json!(1))
///     .with_message("is too short (minimum is 3 characters)");
///
/// assert_eq!(error.attribute, "minLength");
/// assert_eq!(error.property, "name");
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Name of the violated constraint.
    pub attribute: String,
    /// Path of the offending value.
    pub property: JsonPath,
    /// The constraint's configured value.
    pub expected: Option<Value>,
    /// The value that failed, or `None` when it was absent.
    pub actual: Option<Value>,
    /// Interpolated message.
    pub message: String,
}

impl ValidationError {
    /// Creates an error with an empty message and no expected/actual values.
    pub fn new(attribute: impl Into<String>, property: JsonPath) -> Self {
        Self {
            attribute: attribute.into(),
            property,
            expected: None,
            actual: None,
            message: String::new(),
        }
    }

    /// Sets the expected value and returns self for chaining.
    pub fn with_expected(mut self, expected: Value) -> Self {
        self.expected = Some(expected);
        self
    }

    /// Sets the actual value and returns self for chaining.
    pub fn with_actual(mut self, actual: Value) -> Self {
        self.actual = Some(actual);
        self
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = message.into();
        self
    }

    /// Renders the error as a JSON object with the five public fields.
    pub fn to_json(&self) -> Value {
        json!({
            "attribute": self.attribute,
            "property": self.property.to_string(),
            "expected": self.expected.clone().unwrap_or(Value::Null),
            "actual": self.actual.clone().unwrap_or(Value::Null),
            "message": self.message,
        })
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let path_str = if self.property.is_root() {
            "(root)".to_string()
        } else {
            self.property.to_string()
        };

        write!(f, "{}: {} [{}]", path_str, self.message, self.attribute)
    }
}

impl std::error::Error for ValidationError {}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<ValidationError>();
    assert_sync::<ValidationError>();
};

/// The outcome of a validation pass.
///
/// `valid` is true exactly when `errors` is empty for results produced by the
/// validator; async sub-validators may report `valid: false` without errors,
/// so the flag is kept separately.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationResult {
    pub valid: bool,
    pub errors: Vec<ValidationError>,
}

impl ValidationResult {
    /// A passing result with no errors.
    pub fn ok() -> Self {
        Self {
            valid: true,
            errors: Vec::new(),
        }
    }

    /// Builds a result whose validity is derived from the error list.
    pub fn from_errors(errors: Vec<ValidationError>) -> Self {
        Self {
            valid: errors.is_empty(),
            errors,
        }
    }

    /// A failing result carrying a single error.
    pub fn single(error: ValidationError) -> Self {
        Self::from_errors(vec![error])
    }

    /// Returns true if the value conformed.
    pub fn is_valid(&self) -> bool {
        self.valid
    }

    /// Returns all errors with the given attribute.
    pub fn with_attribute(&self, attribute: &str) -> Vec<&ValidationError> {
        self.errors
            .iter()
            .filter(|e| e.attribute == attribute)
            .collect()
    }

    /// Returns all errors reported at the given dotted path.
    pub fn at_property(&self, property: &str) -> Vec<&ValidationError> {
        self.errors.iter().filter(|e| e.property == property).collect()
    }

    /// Renders the result as `{"valid": .., "errors": [..]}`.
    pub fn to_json(&self) -> Value {
        json!({
            "valid": self.valid,
            "errors": self.errors.iter().map(ValidationError::to_json).collect::<Vec<_>>(),
        })
    }

    /// Converts into stillwater's applicative `Validation`.
    ///
    /// A result marked invalid without any error still fails, carrying a
    /// synthetic root error so the failure side stays non-empty.
    pub fn into_validation(self) -> Validation<(), ValidationErrors> {
        if self.valid {
            return Validation::Success(());
        }
        let mut errors = self.errors.into_iter();
        let collected = match errors.next() {
            Some(first) => errors.fold(ValidationErrors::single(first), |acc, error| {
                acc.combine(ValidationErrors::single(error))
            }),
            None => ValidationErrors::single(
                ValidationError::new("invalid", JsonPath::root())
                    .with_message("marked invalid without errors"),
            ),
        };
        Validation::Failure(collected)
    }
}

impl Default for ValidationResult {
    fn default() -> Self {
        Self::ok()
    }
}

impl From<Validation<(), ValidationErrors>> for ValidationResult {
    fn from(validation: Validation<(), ValidationErrors>) -> Self {
        match validation {
            Validation::Success(()) => Self::ok(),
            Validation::Failure(errors) => Self::from_errors(errors.into_vec()),
        }
    }
}

/// A non-empty collection of validation errors.
///
/// Implements `Semigroup`, so failures from independent passes can be
/// combined with stillwater's applicative tools.
///
/// ```rust
/// use lxvalid::{JsonPath, ValidationError, ValidationErrors};
/// use stillwater::prelude::*;
///
/// let a = ValidationErrors::single(ValidationError::new("required", JsonPath::from_field("a")));
/// let b = ValidationErrors::single(ValidationError::new("type", JsonPath::from_field("b")));
///
/// assert_eq!(a.combine(b).len(), 2);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationErrors(NonEmptyVec<ValidationError>);

impl ValidationErrors {
    /// Creates a collection containing a single error.
    pub fn single(error: ValidationError) -> Self {
        Self(NonEmptyVec::singleton(error))
    }

    /// Returns the number of errors in this collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; the collection is never empty.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Returns an iterator over the contained errors.
    pub fn iter(&self) -> impl Iterator<Item = &ValidationError> {
        self.0.iter()
    }

    /// Returns the first error in the collection.
    pub fn first(&self) -> &ValidationError {
        self.0.head()
    }

    /// Converts this collection into a `Vec<ValidationError>`.
    pub fn into_vec(self) -> Vec<ValidationError> {
        self.0.into_vec()
    }
}

impl Semigroup for ValidationErrors {
    fn combine(self, other: Self) -> Self {
        ValidationErrors(self.0.combine(other.0))
    }
}

impl Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

impl IntoIterator for ValidationErrors {
    type Item = ValidationError;
    type IntoIter = std::vec::IntoIter<ValidationError>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_vec().into_iter()
    }
}

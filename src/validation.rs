//! Validation context threaded through a single pass.
//!
//! This module provides the [`ValidationContext`] type that carries the
//! registry, the options and the error sink while the walker descends.
//! Errors are appended in the order constraints are checked, so a nested
//! property's errors sit between its earlier and later siblings.

use serde_json::Value;

use crate::error::{interpolate, Attribute, ValidationError, ValidationResult};
use crate::options::ValidationOptions;
use crate::path::JsonPath;
use crate::registry::Registry;
use crate::schema::Schema;

const NO_DEFAULT_MESSAGE: &str = "no default message";

/// Validation context carries lookup tables, options and collected errors.
///
/// The registry and options are borrowed for the length of the pass; the
/// returned references are not tied to the context itself, so they can be
/// held while errors are being reported.
pub(crate) struct ValidationContext<'a> {
    registry: &'a Registry,
    options: &'a ValidationOptions,
    errors: Vec<ValidationError>,
}

impl<'a> ValidationContext<'a> {
    pub(crate) fn new(registry: &'a Registry, options: &'a ValidationOptions) -> Self {
        Self {
            registry,
            options,
            errors: Vec::new(),
        }
    }

    pub(crate) fn registry(&self) -> &'a Registry {
        self.registry
    }

    pub(crate) fn options(&self) -> &'a ValidationOptions {
        self.options
    }

    pub(crate) fn errors(&self) -> &[ValidationError] {
        &self.errors
    }

    /// Records a violation of `attribute` at `property`.
    ///
    /// `expected` is read from the schema node; the message comes from the
    /// node's overrides or the default table.
    pub(crate) fn report(
        &mut self,
        attribute: Attribute,
        property: &JsonPath,
        actual: Option<Value>,
        schema: &Schema,
    ) {
        let expected = schema.expected(attribute.as_str());
        let template = message_template(attribute, Some(schema));
        let message = interpolate(
            template,
            attribute.as_str(),
            property,
            expected.as_ref(),
            actual.as_ref(),
        );

        tracing::trace!(%property, attribute = attribute.as_str(), "constraint violated");

        self.errors.push(ValidationError {
            attribute: attribute.as_str().to_string(),
            property: property.clone(),
            expected,
            actual,
            message,
        });
    }

    pub(crate) fn into_result(self) -> ValidationResult {
        ValidationResult::from_errors(self.errors)
    }
}

/// Picks the message template: the node's per-constraint override, then its
/// catch-all override, then the default table.
pub(crate) fn message_template<'s>(attribute: Attribute, schema: Option<&'s Schema>) -> &'s str {
    let overrides = schema.and_then(|schema| {
        schema
            .messages
            .get(attribute.as_str())
            .filter(|m| !m.is_empty())
            .or(schema.message.as_ref().filter(|m| !m.is_empty()))
    });

    match overrides {
        Some(message) => message.as_str(),
        None => attribute.default_message().unwrap_or(NO_DEFAULT_MESSAGE),
    }
}

//! Constraint names and their default message templates.

use std::fmt::{self, Display};

use regex::{Captures, Regex};
use serde_json::Value;
use std::sync::LazyLock;

use crate::path::JsonPath;

static PLACEHOLDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)%\{([a-z]+)\}").unwrap());

/// The constraint that produced a validation error.
///
/// Rendered in camelCase (`minLength`, `additionalProperties`) so results can
/// be compared with schema keywords and per-schema `messages` overrides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attribute {
    Required,
    MinLength,
    MaxLength,
    Pattern,
    Minimum,
    Maximum,
    ExclusiveMinimum,
    ExclusiveMaximum,
    DivisibleBy,
    MinItems,
    MaxItems,
    UniqueItems,
    Format,
    Conform,
    Type,
    Enum,
    Dependencies,
    AdditionalProperties,
    Unknown,
}

impl Attribute {
    /// Returns the schema keyword for this attribute.
    pub fn as_str(&self) -> &'static str {
        match self {
            Attribute::Required => "required",
            Attribute::MinLength => "minLength",
            Attribute::MaxLength => "maxLength",
            Attribute::Pattern => "pattern",
            Attribute::Minimum => "minimum",
            Attribute::Maximum => "maximum",
            Attribute::ExclusiveMinimum => "exclusiveMinimum",
            Attribute::ExclusiveMaximum => "exclusiveMaximum",
            Attribute::DivisibleBy => "divisibleBy",
            Attribute::MinItems => "minItems",
            Attribute::MaxItems => "maxItems",
            Attribute::UniqueItems => "uniqueItems",
            Attribute::Format => "format",
            Attribute::Conform => "conform",
            Attribute::Type => "type",
            Attribute::Enum => "enum",
            Attribute::Dependencies => "dependencies",
            Attribute::AdditionalProperties => "additionalProperties",
            Attribute::Unknown => "unknown",
        }
    }

    /// Returns the global default template, if one exists.
    pub fn default_message(&self) -> Option<&'static str> {
        let template = match self {
            Attribute::Required => "is required",
            Attribute::MinLength => "is too short (minimum is %{expected} characters)",
            Attribute::MaxLength => "is too long (maximum is %{expected} characters)",
            Attribute::Pattern => "invalid input",
            Attribute::Minimum => "must be greater than or equal to %{expected}",
            Attribute::Maximum => "must be less than or equal to %{expected}",
            Attribute::ExclusiveMinimum => "must be greater than %{expected}",
            Attribute::ExclusiveMaximum => "must be less than %{expected}",
            Attribute::DivisibleBy => "must be divisible by %{expected}",
            Attribute::MinItems => "must contain more than %{expected} items",
            Attribute::MaxItems => "must contain less than %{expected} items",
            Attribute::UniqueItems => "must hold a unique set of values",
            Attribute::Format => "is not a valid %{expected}",
            Attribute::Conform => "must conform to given constraint",
            Attribute::Type => "must be of %{expected} type",
            Attribute::Enum => "must be present in given enumerator",
            Attribute::AdditionalProperties => "must not exist",
            Attribute::Unknown => "is not defined in schema",
            Attribute::Dependencies => return None,
        };
        Some(template)
    }
}

impl Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Substitutes `%{expected}`, `%{actual}`, `%{attribute}` and `%{property}`.
///
/// Placeholder names are case-insensitive. Unknown placeholders and absent or
/// `null` values render as the empty string.
pub fn interpolate(
    template: &str,
    attribute: &str,
    property: &JsonPath,
    expected: Option<&Value>,
    actual: Option<&Value>,
) -> String {
    PLACEHOLDER_RE
        .replace_all(template, |caps: &Captures| {
            match caps[1].to_ascii_lowercase().as_str() {
                "expected" => expected.map(render).unwrap_or_default(),
                "actual" => actual.map(render).unwrap_or_default(),
                "attribute" => attribute.to_string(),
                "property" => property.to_string(),
                _ => String::new(),
            }
        })
        .into_owned()
}

/// Renders a value the way it reads inside a sentence.
fn render(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => crate::cast::format_number(n),
        Value::String(s) => s.clone(),
        Value::Array(items) => items.iter().map(render).collect::<Vec<_>>().join(","),
        Value::Object(_) => value.to_string(),
    }
}

//! Reading schemas from JSON documents.

use serde_json::{Map, Value};

use super::{AdditionalProperties, Dependencies, DefaultValue, Items, PatternProperty, Schema};
use crate::types::TypeName;

/// Errors raised while reading a schema document.
///
/// These are usage errors: the schema itself is malformed, so no candidate
/// value is ever looked at.
#[derive(Debug, thiserror::Error)]
pub enum SchemaParseError {
    /// A schema node is not a JSON object.
    #[error("schema at '{path}' must be an object")]
    NotAnObject { path: String },

    /// A keyword holds a value of the wrong shape.
    #[error("invalid '{keyword}' at '{path}': {reason}")]
    InvalidKeyword {
        path: String,
        keyword: &'static str,
        reason: &'static str,
    },

    /// A `pattern` or `patternProperties` key does not compile.
    #[error("invalid pattern '{pattern}' at '{path}': {source}")]
    InvalidPattern {
        path: String,
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl Schema {
    /// Reads a schema from its JSON form.
    ///
    /// Keywords this validator does not know (`$schema`, `description`, ...)
    /// are ignored. `conform` and producer defaults have no JSON form and
    /// must be added with the builder.
    ///
    /// # Errors
    ///
    /// Returns a [`SchemaParseError`] naming the keyword path of the first
    /// malformed node.
    ///
    /// # Example
    ///
    /// ```rust
    /// use lxvalid::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::from_json(&json!({
    ///     "properties": {
    ///         "name": {"type": "string", "required": true},
    ///         "tags": {"type": "array", "items": {"type": "string"}, "uniqueItems": true}
    ///     }
    /// }))
    /// .unwrap();
    ///
    /// assert!(schema.get_property("name").unwrap().is_required());
    /// ```
    pub fn from_json(document: &Value) -> Result<Schema, SchemaParseError> {
        parse_node(document, "")
    }
}

fn child_path(path: &str, segment: &str) -> String {
    if path.is_empty() {
        segment.to_string()
    } else {
        format!("{}.{}", path, segment)
    }
}

fn parse_node(document: &Value, path: &str) -> Result<Schema, SchemaParseError> {
    let map = document
        .as_object()
        .ok_or_else(|| SchemaParseError::NotAnObject {
            path: path.to_string(),
        })?;

    let mut schema = Schema::new();
    let invalid = |keyword: &'static str, reason: &'static str| SchemaParseError::InvalidKeyword {
        path: path.to_string(),
        keyword,
        reason,
    };

    if let Some(properties) = map.get("properties") {
        let properties = properties
            .as_object()
            .ok_or_else(|| invalid("properties", "expected an object"))?;
        let base = child_path(path, "properties");
        for (name, node) in properties {
            let property = parse_node(node, &child_path(&base, name))?;
            schema = schema.property(name.clone(), property);
        }
        schema.declares_object = true;
    }

    if let Some(patterns) = map.get("patternProperties") {
        let patterns = patterns
            .as_object()
            .ok_or_else(|| invalid("patternProperties", "expected an object"))?;
        let base = child_path(path, "patternProperties");
        for (pattern, node) in patterns {
            let property_path = child_path(&base, pattern);
            let property = parse_node(node, &property_path)?;
            let regex = compile(pattern, &property_path)?;
            schema.pattern_properties.insert(
                pattern.clone(),
                PatternProperty {
                    regex,
                    schema: property,
                },
            );
        }
        schema.declares_object = true;
    }

    match map.get("additionalProperties") {
        None => {}
        Some(Value::Bool(allow)) => schema = schema.additional_properties(*allow),
        Some(node @ Value::Object(_)) => {
            let nested = parse_node(node, &child_path(path, "additionalProperties"))?;
            schema = schema.additional_properties(AdditionalProperties::from(nested));
        }
        Some(_) => {
            return Err(invalid(
                "additionalProperties",
                "expected a boolean or an object",
            ))
        }
    }

    if let Some(types) = map.get("type") {
        let names = names_of(types).ok_or_else(|| invalid("type", "expected a name or a list of names"))?;
        schema.types = names.iter().map(|name| TypeName::from_name(name)).collect();
    }

    if let Some(formats) = map.get("format") {
        schema.formats =
            names_of(formats).ok_or_else(|| invalid("format", "expected a name or a list of names"))?;
    }

    match map.get("items") {
        None => {}
        Some(node @ Value::Object(_)) => {
            let item = parse_node(node, &child_path(path, "items"))?;
            schema.items = Some(Items::Single(Box::new(item)));
        }
        Some(Value::Array(nodes)) => {
            let base = child_path(path, "items");
            let tuple = nodes
                .iter()
                .enumerate()
                .map(|(i, node)| parse_node(node, &child_path(&base, &i.to_string())))
                .collect::<Result<Vec<_>, _>>()?;
            schema.items = Some(Items::Tuple(tuple));
        }
        Some(_) => return Err(invalid("items", "expected an object or an array")),
    }

    if let Some(values) = map.get("enum") {
        let values = values
            .as_array()
            .ok_or_else(|| invalid("enum", "expected an array"))?;
        schema.enum_values = Some(values.clone());
    }

    match map.get("required") {
        None => {}
        Some(Value::Bool(required)) => schema.required = *required,
        Some(names @ Value::Array(_)) => {
            let names =
                names_of(names).ok_or_else(|| invalid("required", "expected a list of names"))?;
            schema = schema.required_names(names);
        }
        Some(_) => return Err(invalid("required", "expected a boolean or a list of names")),
    }

    match map.get("dependencies") {
        None => {}
        Some(Value::String(name)) => schema.dependencies = Some(Dependencies::Name(name.clone())),
        Some(names @ Value::Array(_)) => {
            let names = names_of(names).ok_or_else(|| invalid("dependencies", "expected a list of names"))?;
            schema.dependencies = Some(Dependencies::Names(names));
        }
        Some(node @ Value::Object(_)) => {
            let nested = parse_node(node, &child_path(path, "dependencies"))?;
            schema.dependencies = Some(Dependencies::Schema(Box::new(nested)));
        }
        Some(_) => {
            return Err(invalid(
                "dependencies",
                "expected a name, a list of names or an object",
            ))
        }
    }

    if let Some(default) = map.get("default") {
        schema.default = Some(DefaultValue::Value(default.clone()));
    }

    schema.min_length = count(map, "minLength").map_err(|reason| invalid("minLength", reason))?;
    schema.max_length = count(map, "maxLength").map_err(|reason| invalid("maxLength", reason))?;
    schema.min_items = count(map, "minItems").map_err(|reason| invalid("minItems", reason))?;
    schema.max_items = count(map, "maxItems").map_err(|reason| invalid("maxItems", reason))?;

    schema.minimum = number(map, "minimum").map_err(|reason| invalid("minimum", reason))?;
    schema.maximum = number(map, "maximum").map_err(|reason| invalid("maximum", reason))?;
    schema.exclusive_minimum =
        number(map, "exclusiveMinimum").map_err(|reason| invalid("exclusiveMinimum", reason))?;
    schema.exclusive_maximum =
        number(map, "exclusiveMaximum").map_err(|reason| invalid("exclusiveMaximum", reason))?;
    schema.divisible_by =
        number(map, "divisibleBy").map_err(|reason| invalid("divisibleBy", reason))?;

    if let Some(pattern) = map.get("pattern") {
        let pattern = pattern
            .as_str()
            .ok_or_else(|| invalid("pattern", "expected a string"))?;
        schema.pattern = Some(compile(pattern, &child_path(path, "pattern"))?);
    }

    if let Some(unique) = map.get("uniqueItems") {
        schema.unique_items = unique
            .as_bool()
            .ok_or_else(|| invalid("uniqueItems", "expected a boolean"))?;
    }

    if let Some(messages) = map.get("messages") {
        let messages = messages
            .as_object()
            .ok_or_else(|| invalid("messages", "expected an object"))?;
        for (attribute, message) in messages {
            let message = message
                .as_str()
                .ok_or_else(|| invalid("messages", "expected string messages"))?;
            schema = schema.message_for(attribute.clone(), message);
        }
    }

    if let Some(message) = map.get("message") {
        let message = message
            .as_str()
            .ok_or_else(|| invalid("message", "expected a string"))?;
        schema = schema.message(message);
    }

    Ok(schema)
}

fn compile(pattern: &str, path: &str) -> Result<regex::Regex, SchemaParseError> {
    regex::Regex::new(pattern).map_err(|source| SchemaParseError::InvalidPattern {
        path: path.to_string(),
        pattern: pattern.to_string(),
        source,
    })
}

/// Accepts a single name or a list of names.
fn names_of(value: &Value) -> Option<Vec<String>> {
    match value {
        Value::String(name) => Some(vec![name.clone()]),
        Value::Array(names) => names
            .iter()
            .map(|name| name.as_str().map(str::to_string))
            .collect(),
        _ => None,
    }
}

fn count(map: &Map<String, Value>, keyword: &str) -> Result<Option<usize>, &'static str> {
    match map.get(keyword) {
        None => Ok(None),
        Some(value) => value
            .as_u64()
            .and_then(|n| usize::try_from(n).ok())
            .map(Some)
            .ok_or("expected a non-negative integer"),
    }
}

fn number(map: &Map<String, Value>, keyword: &str) -> Result<Option<f64>, &'static str> {
    match map.get(keyword) {
        None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or("expected a number"),
    }
}

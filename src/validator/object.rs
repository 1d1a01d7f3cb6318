//! Validation of keyed collections.

use std::collections::HashSet;

use serde_json::Value;

use crate::error::Attribute;
use crate::options::UnknownProperties;
use crate::path::JsonPath;
use crate::schema::{AdditionalProperties, Schema};
use crate::validation::ValidationContext;

use super::property::validate_property;
use super::Slot;

/// Validates `object` against the `properties`, `patternProperties` and
/// `additionalProperties` of `schema`, then applies the unknown-key policy.
///
/// A non-object value has no keys: every declared property reads as absent.
pub(crate) fn validate_object(
    ctx: &mut ValidationContext<'_>,
    object: &mut Value,
    schema: &Schema,
    path: &JsonPath,
) {
    let mut visited: HashSet<String> = HashSet::new();

    for (name, property) in &schema.properties {
        visited.insert(name.clone());
        validate_property(ctx, object, &Slot::Field(name.clone()), &path.push_field(name), property);
    }

    for entry in schema.pattern_properties.values() {
        let matching: Vec<String> = keys(object)
            .into_iter()
            .filter(|key| entry.matches_key(key))
            .collect();
        for key in matching {
            validate_property(ctx, object, &Slot::Field(key.clone()), &path.push_field(&key), entry.schema());
            visited.insert(key);
        }
    }

    let unvisited: Vec<String> = keys(object)
        .into_iter()
        .filter(|key| !visited.contains(key))
        .collect();

    match ctx.options().unknown_policy() {
        UnknownProperties::Ignore => {}
        UnknownProperties::Delete => {
            if let Some(map) = object.as_object_mut() {
                for key in &unvisited {
                    tracing::trace!(property = %path.push_field(key), "deleting unknown property");
                    map.remove(key);
                }
            }
        }
        UnknownProperties::Error => {
            for key in &unvisited {
                let actual = object.get(key.as_str()).cloned();
                ctx.report(Attribute::Unknown, &path.push_field(key), actual, schema);
            }
        }
    }

    let Some(additional) = &schema.additional_properties else {
        return;
    };
    let remaining: Vec<String> = unvisited
        .into_iter()
        .filter(|key| object.get(key.as_str()).is_some())
        .collect();

    match additional {
        AdditionalProperties::Allow => {}
        AdditionalProperties::Deny => {
            for key in remaining {
                let actual = object.get(key.as_str()).cloned();
                ctx.report(Attribute::AdditionalProperties, &path.push_field(&key), actual, schema);
            }
        }
        AdditionalProperties::Schema(extra) => {
            for key in remaining {
                validate_property(ctx, object, &Slot::Field(key.clone()), &path.push_field(&key), extra);
            }
        }
    }
}

fn keys(object: &Value) -> Vec<String> {
    object
        .as_object()
        .map(|map| map.keys().cloned().collect())
        .unwrap_or_default()
}

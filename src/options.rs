//! Options controlling a validation pass.
//!
//! Every flag is stored as "unset or value" so a set of defaults can be
//! layered underneath caller options with [`ValidationOptions::with_defaults`]
//! without overriding anything the caller chose. Accessors resolve unset
//! flags to their documented defaults.

use std::fmt;
use std::sync::Arc;

use serde_json::{Map, Value};

use crate::error::ValidationError;
use crate::path::JsonPath;
use crate::schema::Schema;
use crate::validator::Slot;

/// Hook invoked after a successful format match; returns the replacement
/// value. Receives the lower-cased format name and the matched string.
pub type ConvertFn = Arc<dyn Fn(&str, &str) -> Value + Send + Sync>;

/// Hook invoked after every property that passed its type check.
pub type TransformFn = Arc<dyn Fn(&mut TransformContext<'_>) + Send + Sync>;

/// Policy for object keys that no schema entry covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownProperties {
    #[default]
    Ignore,
    Delete,
    Error,
}

impl UnknownProperties {
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "ignore" => Some(UnknownProperties::Ignore),
            "delete" => Some(UnknownProperties::Delete),
            "error" => Some(UnknownProperties::Error),
            _ => None,
        }
    }
}

/// What a transform hook sees.
///
/// The enclosing object is handed out mutably so a hook can rewrite the
/// property it is called for (or its siblings).
pub struct TransformContext<'a> {
    pub(crate) object: &'a mut Value,
    pub(crate) slot: &'a Slot,
    pub(crate) property: &'a JsonPath,
    pub(crate) schema: &'a Schema,
    pub(crate) options: &'a ValidationOptions,
    pub(crate) errors: &'a [ValidationError],
}

impl<'a> TransformContext<'a> {
    /// The object or array holding the property.
    pub fn object(&self) -> &Value {
        self.object
    }

    pub fn object_mut(&mut self) -> &mut Value {
        self.object
    }

    /// The property's current value.
    pub fn value(&self) -> Option<&Value> {
        self.slot.get(self.object)
    }

    pub fn value_mut(&mut self) -> Option<&mut Value> {
        self.slot.get_mut(self.object)
    }

    pub fn property(&self) -> &JsonPath {
        self.property
    }

    pub fn schema(&self) -> &Schema {
        self.schema
    }

    pub fn options(&self) -> &ValidationOptions {
        self.options
    }

    /// Errors collected so far in this pass.
    pub fn errors(&self) -> &[ValidationError] {
        self.errors
    }
}

/// Options for one validation pass.
///
/// # Example
///
/// ```rust
/// use lxvalid::{UnknownProperties, ValidationOptions};
///
/// let defaults = ValidationOptions::new().trim(true).cast(true);
/// let options = ValidationOptions::new()
///     .cast(false)
///     .unknown_properties(UnknownProperties::Error)
///     .with_defaults(&defaults);
///
/// assert!(options.trims());
/// assert!(!options.casts());
/// assert!(options.validates_formats());
/// ```
#[derive(Clone, Default)]
pub struct ValidationOptions {
    validate_formats: Option<bool>,
    validate_formats_strict: Option<bool>,
    validate_format_extensions: Option<bool>,
    add_missing_defaults: Option<bool>,
    unknown_properties: Option<UnknownProperties>,
    delete_unknown_properties: Option<bool>,
    trim: Option<bool>,
    strict_required: Option<bool>,
    ignore_null_values: Option<bool>,
    cast: Option<bool>,
    is_update: Option<bool>,
    convert: Option<ConvertFn>,
    transform: Option<TransformFn>,
}

impl ValidationOptions {
    /// Creates options with every flag unset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enforce `format` constraints. Default: true.
    pub fn validate_formats(mut self, enabled: bool) -> Self {
        self.validate_formats = Some(enabled);
        self
    }

    /// Fail on format names neither table knows. Default: false.
    pub fn validate_formats_strict(mut self, enabled: bool) -> Self {
        self.validate_formats_strict = Some(enabled);
        self
    }

    /// Consult the registry's format extensions before the built-ins.
    /// Default: true.
    pub fn validate_format_extensions(mut self, enabled: bool) -> Self {
        self.validate_format_extensions = Some(enabled);
        self
    }

    /// Write schema defaults into absent properties. Default: false.
    pub fn add_missing_defaults(mut self, enabled: bool) -> Self {
        self.add_missing_defaults = Some(enabled);
        self
    }

    pub fn unknown_properties(mut self, policy: UnknownProperties) -> Self {
        self.unknown_properties = Some(policy);
        self
    }

    /// Older spelling of `unknown_properties(UnknownProperties::Delete)`.
    /// Takes precedence when both are set.
    pub fn delete_unknown_properties(mut self, enabled: bool) -> Self {
        self.delete_unknown_properties = Some(enabled);
        self
    }

    /// Trim string values before length and pattern checks. Default: false.
    pub fn trim(mut self, enabled: bool) -> Self {
        self.trim = Some(enabled);
        self
    }

    /// Treat required strings that are empty (after trimming) as missing.
    /// Default: false.
    pub fn strict_required(mut self, enabled: bool) -> Self {
        self.strict_required = Some(enabled);
        self
    }

    /// Skip `null` values of optional properties. Default: false.
    pub fn ignore_null_values(mut self, enabled: bool) -> Self {
        self.ignore_null_values = Some(enabled);
        self
    }

    /// Coerce numeric and boolean strings before type checks. Default: false.
    pub fn cast(mut self, enabled: bool) -> Self {
        self.cast = Some(enabled);
        self
    }

    /// Relax `required` for top-level properties absent from the value.
    /// Default: false.
    pub fn update(mut self, enabled: bool) -> Self {
        self.is_update = Some(enabled);
        self
    }

    pub fn convert<F>(mut self, hook: F) -> Self
    where
        F: Fn(&str, &str) -> Value + Send + Sync + 'static,
    {
        self.convert = Some(Arc::new(hook));
        self
    }

    pub fn transform<F>(mut self, hook: F) -> Self
    where
        F: Fn(&mut TransformContext<'_>) + Send + Sync + 'static,
    {
        self.transform = Some(Arc::new(hook));
        self
    }

    /// Fills every unset option from `defaults`. Options already set are kept.
    pub fn with_defaults(&self, defaults: &ValidationOptions) -> ValidationOptions {
        ValidationOptions {
            validate_formats: self.validate_formats.or(defaults.validate_formats),
            validate_formats_strict: self
                .validate_formats_strict
                .or(defaults.validate_formats_strict),
            validate_format_extensions: self
                .validate_format_extensions
                .or(defaults.validate_format_extensions),
            add_missing_defaults: self.add_missing_defaults.or(defaults.add_missing_defaults),
            unknown_properties: self.unknown_properties.or(defaults.unknown_properties),
            delete_unknown_properties: self
                .delete_unknown_properties
                .or(defaults.delete_unknown_properties),
            trim: self.trim.or(defaults.trim),
            strict_required: self.strict_required.or(defaults.strict_required),
            ignore_null_values: self.ignore_null_values.or(defaults.ignore_null_values),
            cast: self.cast.or(defaults.cast),
            is_update: self.is_update.or(defaults.is_update),
            convert: self.convert.clone().or_else(|| defaults.convert.clone()),
            transform: self.transform.clone().or_else(|| defaults.transform.clone()),
        }
    }

    pub fn validates_formats(&self) -> bool {
        self.validate_formats.unwrap_or(true)
    }

    pub fn validates_formats_strictly(&self) -> bool {
        self.validate_formats_strict.unwrap_or(false)
    }

    pub fn uses_format_extensions(&self) -> bool {
        self.validate_format_extensions.unwrap_or(true)
    }

    pub fn adds_missing_defaults(&self) -> bool {
        self.add_missing_defaults.unwrap_or(false)
    }

    /// The effective unknown-key policy.
    pub fn unknown_policy(&self) -> UnknownProperties {
        if self.delete_unknown_properties == Some(true) {
            return UnknownProperties::Delete;
        }
        self.unknown_properties.unwrap_or_default()
    }

    pub fn trims(&self) -> bool {
        self.trim.unwrap_or(false)
    }

    pub fn requires_strictly(&self) -> bool {
        self.strict_required.unwrap_or(false)
    }

    pub fn ignores_null_values(&self) -> bool {
        self.ignore_null_values.unwrap_or(false)
    }

    pub fn casts(&self) -> bool {
        self.cast.unwrap_or(false)
    }

    pub fn is_update(&self) -> bool {
        self.is_update.unwrap_or(false)
    }

    pub fn convert_hook(&self) -> Option<&ConvertFn> {
        self.convert.as_ref()
    }

    pub fn transform_hook(&self) -> Option<&TransformFn> {
        self.transform.as_ref()
    }

    /// Reads options from a JSON object using the camelCase option names
    /// (`validateFormats`, `unknownProperties`, `isUpdate`, ...).
    ///
    /// Hooks have no JSON form. Unrecognised keys are ignored.
    ///
    /// ```rust
    /// use lxvalid::{UnknownProperties, ValidationOptions};
    /// use serde_json::json;
    ///
    /// let options = ValidationOptions::from_json(&json!({
    ///     "cast": true,
    ///     "unknownProperties": "delete"
    /// }))
    /// .unwrap();
    ///
    /// assert!(options.casts());
    /// assert_eq!(options.unknown_policy(), UnknownProperties::Delete);
    /// ```
    pub fn from_json(document: &Value) -> Result<Self, OptionsError> {
        let map = document.as_object().ok_or(OptionsError::NotAnObject)?;
        let mut options = ValidationOptions::new();

        options.validate_formats = flag(map, "validateFormats")?;
        options.validate_formats_strict = flag(map, "validateFormatsStrict")?;
        options.validate_format_extensions = flag(map, "validateFormatExtensions")?;
        options.add_missing_defaults = flag(map, "addMissingDefaults")?;
        options.delete_unknown_properties = flag(map, "deleteUnknownProperties")?;
        options.trim = flag(map, "trim")?;
        options.strict_required = flag(map, "strictRequired")?;
        options.ignore_null_values = flag(map, "ignoreNullValues")?;
        options.cast = flag(map, "cast")?;
        options.is_update = flag(map, "isUpdate")?;

        if let Some(policy) = map.get("unknownProperties") {
            let policy = policy
                .as_str()
                .and_then(UnknownProperties::from_name)
                .ok_or(OptionsError::InvalidOption {
                    name: "unknownProperties",
                    reason: "expected \"ignore\", \"delete\" or \"error\"",
                })?;
            options.unknown_properties = Some(policy);
        }

        Ok(options)
    }
}

fn flag(map: &Map<String, Value>, name: &'static str) -> Result<Option<bool>, OptionsError> {
    match map.get(name) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Bool(value)) => Ok(Some(*value)),
        Some(_) => Err(OptionsError::InvalidOption {
            name,
            reason: "expected a boolean",
        }),
    }
}

impl fmt::Debug for ValidationOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ValidationOptions")
            .field("validate_formats", &self.validate_formats)
            .field("validate_formats_strict", &self.validate_formats_strict)
            .field("validate_format_extensions", &self.validate_format_extensions)
            .field("add_missing_defaults", &self.add_missing_defaults)
            .field("unknown_properties", &self.unknown_properties)
            .field("delete_unknown_properties", &self.delete_unknown_properties)
            .field("trim", &self.trim)
            .field("strict_required", &self.strict_required)
            .field("ignore_null_values", &self.ignore_null_values)
            .field("cast", &self.cast)
            .field("is_update", &self.is_update)
            .field("convert", &self.convert.as_ref().map(|_| ".."))
            .field("transform", &self.transform.as_ref().map(|_| ".."))
            .finish()
    }
}

/// Errors raised while reading options from JSON.
#[derive(Debug, thiserror::Error)]
pub enum OptionsError {
    #[error("options must be a JSON object")]
    NotAnObject,

    #[error("invalid option '{name}': {reason}")]
    InvalidOption {
        name: &'static str,
        reason: &'static str,
    },
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_documented_defaults() {
        let options = ValidationOptions::new();
        assert!(options.validates_formats());
        assert!(!options.validates_formats_strictly());
        assert!(options.uses_format_extensions());
        assert!(!options.adds_missing_defaults());
        assert_eq!(options.unknown_policy(), UnknownProperties::Ignore);
        assert!(!options.trims());
        assert!(!options.requires_strictly());
        assert!(!options.ignores_null_values());
        assert!(!options.casts());
        assert!(!options.is_update());
        assert!(options.convert_hook().is_none());
    }

    #[test]
    fn test_with_defaults_never_overrides() {
        let defaults = ValidationOptions::new()
            .trim(true)
            .validate_formats(false)
            .unknown_properties(UnknownProperties::Error);
        let options = ValidationOptions::new()
            .validate_formats(true)
            .with_defaults(&defaults);

        assert!(options.trims());
        assert!(options.validates_formats());
        assert_eq!(options.unknown_policy(), UnknownProperties::Error);
    }

    #[test]
    fn test_delete_flag_wins_over_policy() {
        let options = ValidationOptions::new()
            .unknown_properties(UnknownProperties::Error)
            .delete_unknown_properties(true);
        assert_eq!(options.unknown_policy(), UnknownProperties::Delete);

        let options = ValidationOptions::new().delete_unknown_properties(false);
        assert_eq!(options.unknown_policy(), UnknownProperties::Ignore);
    }

    #[test]
    fn test_from_json() {
        let options = ValidationOptions::from_json(&json!({
            "trim": true,
            "strictRequired": true,
            "isUpdate": null,
            "somethingElse": 1
        }))
        .unwrap();
        assert!(options.trims());
        assert!(options.requires_strictly());
        assert!(!options.is_update());
    }

    #[test]
    fn test_from_json_rejects_bad_shapes() {
        assert!(matches!(
            ValidationOptions::from_json(&json!([])),
            Err(OptionsError::NotAnObject)
        ));
        assert!(matches!(
            ValidationOptions::from_json(&json!({"cast": "yes"})),
            Err(OptionsError::InvalidOption { name: "cast", .. })
        ));
        assert!(matches!(
            ValidationOptions::from_json(&json!({"unknownProperties": "drop"})),
            Err(OptionsError::InvalidOption { name: "unknownProperties", .. })
        ));
    }
}

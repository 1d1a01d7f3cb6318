//! Schema definitions for validation.
//!
//! A [`Schema`] is one recursive node describing the expected shape of a
//! value: its type, format, constraints and, for objects and arrays, the
//! schemas of its children. Nodes are built either with the builder methods
//! below or parsed from a JSON document with [`Schema::from_json`].
//!
//! # Example
//!
//! ```rust
//! use lxvalid::Schema;
//! use serde_json::json;
//!
//! let schema = Schema::object()
//!     .property("name", Schema::string().min_length(1).required(true))
//!     .property("age", Schema::integer().minimum(0.0));
//!
//! let result = lxvalid::validate(&json!({"name": "Alice", "age": 30}), &schema);
//! assert!(result.valid);
//! ```

mod parse;

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;
use regex::Regex;
use serde_json::Value;

pub use parse::SchemaParseError;

use crate::cast::number_value;
use crate::types::TypeName;

/// Custom predicate receiving the (possibly absent) value and its enclosing
/// object or array.
pub type ConformFn = Arc<dyn Fn(Option<&Value>, &Value) -> bool + Send + Sync>;

/// Zero-argument producer of a default value.
pub type DefaultFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// A default filled in for absent properties.
#[derive(Clone)]
pub enum DefaultValue {
    Value(Value),
    Producer(DefaultFn),
}

impl DefaultValue {
    /// Materializes the default, invoking the producer if there is one.
    pub fn produce(&self) -> Value {
        match self {
            DefaultValue::Value(value) => value.clone(),
            DefaultValue::Producer(producer) => producer(),
        }
    }
}

impl fmt::Debug for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DefaultValue::Value(value) => f.debug_tuple("Value").field(value).finish(),
            DefaultValue::Producer(_) => f.write_str("Producer(..)"),
        }
    }
}

/// Element schemas of an array.
#[derive(Debug, Clone)]
pub enum Items {
    /// One schema applied to every element.
    Single(Box<Schema>),
    /// Positional schemas; elements past the end are not checked.
    Tuple(Vec<Schema>),
}

/// What a property requires of its enclosing object.
#[derive(Debug, Clone)]
pub enum Dependencies {
    /// Another key must be present.
    Name(String),
    /// All of these keys must be present.
    Names(Vec<String>),
    /// The enclosing object must also validate against this schema.
    Schema(Box<Schema>),
}

/// How keys not covered by `properties` or `patternProperties` are treated.
#[derive(Debug, Clone)]
pub enum AdditionalProperties {
    Allow,
    Deny,
    Schema(Box<Schema>),
}

impl From<bool> for AdditionalProperties {
    fn from(allow: bool) -> Self {
        if allow {
            AdditionalProperties::Allow
        } else {
            AdditionalProperties::Deny
        }
    }
}

impl From<Schema> for AdditionalProperties {
    fn from(schema: Schema) -> Self {
        AdditionalProperties::Schema(Box::new(schema))
    }
}

/// A `patternProperties` entry with its compiled key pattern.
#[derive(Debug, Clone)]
pub struct PatternProperty {
    pub(crate) regex: Regex,
    pub(crate) schema: Schema,
}

impl PatternProperty {
    /// Returns true if the object key is covered by this entry.
    pub fn matches_key(&self, key: &str) -> bool {
        self.regex.is_match(key)
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }
}

/// A recursive schema node.
///
/// Cloning is cheap enough for per-call copies: closures are reference
/// counted and compiled patterns share their programs.
#[derive(Clone, Default)]
pub struct Schema {
    pub(crate) properties: IndexMap<String, Schema>,
    pub(crate) pattern_properties: IndexMap<String, PatternProperty>,
    pub(crate) additional_properties: Option<AdditionalProperties>,
    pub(crate) declares_object: bool,
    pub(crate) types: Vec<TypeName>,
    pub(crate) formats: Vec<String>,
    pub(crate) items: Option<Items>,
    pub(crate) enum_values: Option<Vec<Value>>,
    pub(crate) required: bool,
    legacy_required: Vec<String>,
    pub(crate) dependencies: Option<Dependencies>,
    pub(crate) default: Option<DefaultValue>,
    pub(crate) conform: Option<ConformFn>,
    pub(crate) min_length: Option<usize>,
    pub(crate) max_length: Option<usize>,
    pub(crate) pattern: Option<Regex>,
    pub(crate) minimum: Option<f64>,
    pub(crate) maximum: Option<f64>,
    pub(crate) exclusive_minimum: Option<f64>,
    pub(crate) exclusive_maximum: Option<f64>,
    pub(crate) divisible_by: Option<f64>,
    pub(crate) min_items: Option<usize>,
    pub(crate) max_items: Option<usize>,
    pub(crate) unique_items: bool,
    pub(crate) messages: HashMap<String, String>,
    pub(crate) message: Option<String>,
}

impl Schema {
    /// Creates an empty schema that accepts any value.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a schema of a single named type.
    pub fn of_type(name: &str) -> Self {
        Self::new().with_type(name)
    }

    pub fn string() -> Self {
        Self::new().with_type_name(TypeName::String)
    }

    pub fn number() -> Self {
        Self::new().with_type_name(TypeName::Number)
    }

    pub fn integer() -> Self {
        Self::new().with_type_name(TypeName::Integer)
    }

    pub fn boolean() -> Self {
        Self::new().with_type_name(TypeName::Boolean)
    }

    pub fn array() -> Self {
        Self::new().with_type_name(TypeName::Array)
    }

    pub fn object() -> Self {
        Self::new().with_type_name(TypeName::Object)
    }

    /// Adds an accepted type name. Repeated calls build a list of
    /// alternatives tried in order.
    pub fn with_type(self, name: &str) -> Self {
        self.with_type_name(TypeName::from_name(name))
    }

    pub fn with_type_name(mut self, ty: TypeName) -> Self {
        self.types.push(ty);
        self
    }

    /// Adds a named property.
    ///
    /// Properties are validated in the order they are added. A name listed
    /// earlier through [`Schema::required_names`] stays required.
    pub fn property(mut self, name: impl Into<String>, mut schema: Schema) -> Self {
        let name = name.into();
        if self.legacy_required.contains(&name) {
            schema.required = true;
        }
        self.properties.insert(name, schema);
        self.declares_object = true;
        self
    }

    /// Adds a schema for every key matching `pattern`.
    ///
    /// Returns an error if the pattern does not compile.
    ///
    /// ```rust
    /// use lxvalid::Schema;
    ///
    /// let schema = Schema::object()
    ///     .pattern_property(r"^x-", Schema::string())
    ///     .unwrap();
    /// assert!(Schema::object().pattern_property("(", Schema::string()).is_err());
    /// ```
    pub fn pattern_property(
        mut self,
        pattern: &str,
        schema: Schema,
    ) -> Result<Self, regex::Error> {
        let regex = Regex::new(pattern)?;
        self.pattern_properties
            .insert(pattern.to_string(), PatternProperty { regex, schema });
        self.declares_object = true;
        Ok(self)
    }

    /// Configures how undeclared keys are handled.
    ///
    /// Accepts `false` (reject), `true` (allow) or a [`Schema`] applied to
    /// every undeclared key.
    pub fn additional_properties<A>(mut self, setting: A) -> Self
    where
        A: Into<AdditionalProperties>,
    {
        self.additional_properties = Some(setting.into());
        self.declares_object = true;
        self
    }

    /// Adds an accepted format name. The first matching format wins.
    pub fn format(mut self, name: impl Into<String>) -> Self {
        self.formats.push(name.into());
        self
    }

    /// Sets one schema for every array element.
    pub fn items(mut self, schema: Schema) -> Self {
        self.items = Some(Items::Single(Box::new(schema)));
        self
    }

    /// Sets positional schemas for array elements.
    pub fn tuple_items(mut self, schemas: Vec<Schema>) -> Self {
        self.items = Some(Items::Tuple(schemas));
        self
    }

    /// Restricts the value to one of the given literals.
    pub fn enum_values<I>(mut self, values: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        self.enum_values = Some(values.into_iter().collect());
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Marks properties as required from the parent object.
    ///
    /// Names without a declared property get an empty schema, so their
    /// absence is still reported.
    ///
    /// ```rust
    /// use lxvalid::Schema;
    /// use serde_json::json;
    ///
    /// let schema = Schema::object()
    ///     .property("name", Schema::string())
    ///     .required_names(["name", "email"]);
    ///
    /// let result = lxvalid::validate(&json!({}), &schema);
    /// assert_eq!(result.errors.len(), 2);
    /// ```
    pub fn required_names<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for name in names {
            let name = name.into();
            self.properties.entry(name.clone()).or_default().required = true;
            if !self.legacy_required.contains(&name) {
                self.legacy_required.push(name);
            }
        }
        self.declares_object = true;
        self
    }

    pub fn depends_on(mut self, name: impl Into<String>) -> Self {
        self.dependencies = Some(Dependencies::Name(name.into()));
        self
    }

    pub fn depends_on_all<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = Some(Dependencies::Names(
            names.into_iter().map(Into::into).collect(),
        ));
        self
    }

    /// Validates the enclosing object against `schema` whenever this
    /// property is present.
    pub fn depends_on_schema(mut self, schema: Schema) -> Self {
        self.dependencies = Some(Dependencies::Schema(Box::new(schema)));
        self
    }

    pub fn default_value(mut self, value: Value) -> Self {
        self.default = Some(DefaultValue::Value(value));
        self
    }

    /// Sets a producer invoked each time a default is needed.
    pub fn default_with<F>(mut self, producer: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.default = Some(DefaultValue::Producer(Arc::new(producer)));
        self
    }

    /// Adds a custom predicate.
    ///
    /// The predicate receives the value (`None` when absent) and the
    /// enclosing object.
    ///
    /// ```rust
    /// use lxvalid::Schema;
    /// use serde_json::{json, Value};
    ///
    /// let schema = Schema::object().property(
    ///     "confirm",
    ///     Schema::string().conform(|value: Option<&Value>, object: &Value| {
    ///         value == object.get("password")
    ///     }),
    /// );
    ///
    /// let ok = json!({"password": "a", "confirm": "a"});
    /// assert!(lxvalid::validate(&ok, &schema).valid);
    /// ```
    pub fn conform<F>(mut self, predicate: F) -> Self
    where
        F: Fn(Option<&Value>, &Value) -> bool + Send + Sync + 'static,
    {
        self.conform = Some(Arc::new(predicate));
        self
    }

    pub fn min_length(mut self, min: usize) -> Self {
        self.min_length = Some(min);
        self
    }

    pub fn max_length(mut self, max: usize) -> Self {
        self.max_length = Some(max);
        self
    }

    /// Adds a regex pattern constraint for strings.
    ///
    /// Returns an error if the regex pattern is invalid.
    pub fn pattern(mut self, pattern: &str) -> Result<Self, regex::Error> {
        self.pattern = Some(Regex::new(pattern)?);
        Ok(self)
    }

    pub fn minimum(mut self, min: f64) -> Self {
        self.minimum = Some(min);
        self
    }

    pub fn maximum(mut self, max: f64) -> Self {
        self.maximum = Some(max);
        self
    }

    pub fn exclusive_minimum(mut self, min: f64) -> Self {
        self.exclusive_minimum = Some(min);
        self
    }

    pub fn exclusive_maximum(mut self, max: f64) -> Self {
        self.exclusive_maximum = Some(max);
        self
    }

    pub fn divisible_by(mut self, divisor: f64) -> Self {
        self.divisible_by = Some(divisor);
        self
    }

    pub fn min_items(mut self, min: usize) -> Self {
        self.min_items = Some(min);
        self
    }

    pub fn max_items(mut self, max: usize) -> Self {
        self.max_items = Some(max);
        self
    }

    pub fn unique_items(mut self, unique: bool) -> Self {
        self.unique_items = unique;
        self
    }

    /// Overrides the message of one constraint (`"minLength"`, `"type"`, ...).
    ///
    /// `%{expected}`, `%{actual}`, `%{attribute}` and `%{property}` are
    /// substituted.
    pub fn message_for(mut self, attribute: impl Into<String>, message: impl Into<String>) -> Self {
        self.messages.insert(attribute.into(), message.into());
        self
    }

    /// Overrides the message of every constraint without its own override.
    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Returns the schema of a declared property.
    pub fn get_property(&self, name: &str) -> Option<&Schema> {
        self.properties.get(name)
    }

    /// Returns the declared property names in declaration order.
    pub fn property_names(&self) -> impl Iterator<Item = &str> {
        self.properties.keys().map(String::as_str)
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn types(&self) -> &[TypeName] {
        &self.types
    }

    pub fn has_items(&self) -> bool {
        self.items.is_some()
    }

    /// Returns a copy where every property absent from `value` is optional.
    pub(crate) fn relaxed_for_update(&self, value: &Value) -> Schema {
        let mut relaxed = self.clone();
        for (name, property) in relaxed.properties.iter_mut() {
            if value.get(name).is_none() {
                property.required = false;
            }
        }
        relaxed
            .legacy_required
            .retain(|name| value.get(name).is_some());
        relaxed
    }

    /// Returns true if the `type` keyword names exactly this one type.
    pub(crate) fn is_single_type(&self, ty: &TypeName) -> bool {
        matches!(self.types.as_slice(), [only] if only == ty)
    }

    /// Returns the configured value of a constraint, as reported in
    /// `expected`.
    pub(crate) fn expected(&self, attribute: &str) -> Option<Value> {
        let number = |n: Option<f64>| n.and_then(number_value);
        match attribute {
            "type" => list_or_single(self.types.iter().map(|t| t.as_str().to_string())),
            "format" => list_or_single(self.formats.iter().cloned()),
            "enum" => self.enum_values.clone().map(Value::Array),
            "minLength" => self.min_length.map(Value::from),
            "maxLength" => self.max_length.map(Value::from),
            "pattern" => self.pattern.as_ref().map(|re| Value::from(re.as_str())),
            "minimum" => number(self.minimum),
            "maximum" => number(self.maximum),
            "exclusiveMinimum" => number(self.exclusive_minimum),
            "exclusiveMaximum" => number(self.exclusive_maximum),
            "divisibleBy" => number(self.divisible_by),
            "minItems" => self.min_items.map(Value::from),
            "maxItems" => self.max_items.map(Value::from),
            "uniqueItems" => Some(Value::Bool(self.unique_items)),
            "required" => Some(Value::Bool(self.required)),
            "dependencies" => match &self.dependencies {
                Some(Dependencies::Name(name)) => Some(Value::from(name.as_str())),
                Some(Dependencies::Names(names)) => Some(Value::from(names.clone())),
                _ => None,
            },
            "additionalProperties" => match &self.additional_properties {
                Some(AdditionalProperties::Deny) => Some(Value::Bool(false)),
                Some(AdditionalProperties::Allow) => Some(Value::Bool(true)),
                _ => None,
            },
            _ => None,
        }
    }
}

fn list_or_single(mut names: impl ExactSizeIterator<Item = String>) -> Option<Value> {
    match names.len() {
        0 => None,
        1 => names.next().map(Value::String),
        _ => Some(Value::Array(names.map(Value::String).collect())),
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Schema")
            .field("types", &self.types)
            .field("formats", &self.formats)
            .field("required", &self.required)
            .field("properties", &self.properties)
            .field("pattern_properties", &self.pattern_properties)
            .field("additional_properties", &self.additional_properties)
            .field("items", &self.items)
            .field("enum_values", &self.enum_values)
            .field("dependencies", &self.dependencies)
            .field("default", &self.default)
            .field("conform", &self.conform.as_ref().map(|_| ".."))
            .finish_non_exhaustive()
    }
}

//! Type predicates.
//!
//! Built-in type names form the closed [`TypeName`] enum and are matched
//! exhaustively. Names the enum does not know are kept as
//! [`TypeName::Custom`] and resolved against the registry's extension table
//! at validation time.
//!
//! Values that JSON cannot represent natively (document identifiers, dates,
//! regular expressions) are recognised through a small set of tagged object
//! shapes, see [`ForeignValue`].

use std::fmt::{self, Display};

use serde_json::{Map, Value};

use crate::error::{Attribute, ValidationError, ValidationResult};
use crate::formats::Format;
use crate::path::JsonPath;

/// A named type accepted by the `type` keyword.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum TypeName {
    String,
    Number,
    Boolean,
    Integer,
    Float,
    Array,
    Object,
    Null,
    Undefined,
    Any,
    Date,
    RegExp,
    MongoId,
    /// A name resolved through the registry's type extensions.
    Custom(String),
}

impl TypeName {
    /// Resolves a type name.
    ///
    /// Names are matched exactly first and lower-cased second, so both
    /// `mongoId` and `mongoid` resolve to [`TypeName::MongoId`].
    pub fn from_name(name: &str) -> Self {
        let name = name.trim();
        Self::exact(name)
            .or_else(|| Self::exact(&name.to_lowercase()))
            .unwrap_or_else(|| TypeName::Custom(name.to_string()))
    }

    fn exact(name: &str) -> Option<Self> {
        let ty = match name {
            "string" => TypeName::String,
            "number" => TypeName::Number,
            "boolean" => TypeName::Boolean,
            "integer" => TypeName::Integer,
            "float" => TypeName::Float,
            "array" => TypeName::Array,
            "object" => TypeName::Object,
            "null" => TypeName::Null,
            "undefined" => TypeName::Undefined,
            "any" => TypeName::Any,
            "date" => TypeName::Date,
            "regexp" => TypeName::RegExp,
            "mongoId" | "mongoid" => TypeName::MongoId,
            _ => return None,
        };
        Some(ty)
    }

    /// Returns the canonical name.
    pub fn as_str(&self) -> &str {
        match self {
            TypeName::String => "string",
            TypeName::Number => "number",
            TypeName::Boolean => "boolean",
            TypeName::Integer => "integer",
            TypeName::Float => "float",
            TypeName::Array => "array",
            TypeName::Object => "object",
            TypeName::Null => "null",
            TypeName::Undefined => "undefined",
            TypeName::Any => "any",
            TypeName::Date => "date",
            TypeName::RegExp => "regexp",
            TypeName::MongoId => "mongoId",
            TypeName::Custom(name) => name,
        }
    }

    /// Returns true for the numeric types that carry range constraints.
    pub fn is_numeric(&self) -> bool {
        matches!(self, TypeName::Integer | TypeName::Number | TypeName::Float)
    }

    /// Tests a possibly absent value against a built-in type.
    ///
    /// Always false for [`TypeName::Custom`]; those go through the registry.
    pub fn matches(&self, value: Option<&Value>) -> bool {
        let Some(value) = value else {
            return matches!(self, TypeName::Undefined);
        };
        match self {
            TypeName::String => value.is_string(),
            TypeName::Number => value.is_number(),
            TypeName::Boolean => value.is_boolean(),
            TypeName::Integer => is_whole_number(value),
            TypeName::Float => value.is_number() && !is_whole_number(value),
            TypeName::Array => value.is_array(),
            TypeName::Object => runtime_type_name(Some(value)) == "object",
            TypeName::Null => value.is_null(),
            TypeName::Undefined => false,
            TypeName::Any => true,
            TypeName::Date => matches!(ForeignValue::detect(value), Some(ForeignValue::Date(_))),
            TypeName::RegExp => {
                matches!(ForeignValue::detect(value), Some(ForeignValue::RegExp(_)))
            }
            TypeName::MongoId => match ForeignValue::detect(value) {
                Some(ForeignValue::ObjectId(hex)) => Format::MongoId.matches_str(hex),
                _ => false,
            },
            TypeName::Custom(_) => false,
        }
    }

    /// Single-value check returning a `{valid, errors}` result.
    ///
    /// ```rust
    /// use lxvalid::TypeName;
    /// use serde_json::json;
    ///
    /// let result = TypeName::String.check(Some(&json!(1)));
    /// assert!(!result.valid);
    /// assert_eq!(result.errors[0].message, "must be of string type");
    /// ```
    pub fn check(&self, value: Option<&Value>) -> ValidationResult {
        if self.matches(value) {
            return ValidationResult::ok();
        }
        let mut error = ValidationError::new(Attribute::Type.as_str(), JsonPath::root())
            .with_expected(Value::String(self.as_str().to_string()))
            .with_message(format!("must be of {} type", self.as_str()));
        if let Some(value) = value {
            error = error.with_actual(value.clone());
        }
        ValidationResult::single(error)
    }
}

impl Display for TypeName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_whole_number(value: &Value) -> bool {
    match value {
        Value::Number(n) if n.is_i64() || n.is_u64() => true,
        Value::Number(n) => n.as_f64().is_some_and(|f| f.fract() == 0.0),
        _ => false,
    }
}

/// A non-JSON value carried as a tagged object.
///
/// Recognised shapes:
/// - `{"$oid": "<hex>"}` or `{"_bsontype": "ObjectID", "id": "<hex>"}`
/// - `{"$date": <string or number>}`
/// - `{"$regex": "<source>", "$options": "<flags>"}` (`$options` optional)
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ForeignValue<'a> {
    ObjectId(&'a str),
    Date(&'a Value),
    RegExp(&'a str),
}

impl<'a> ForeignValue<'a> {
    /// Detects a tagged shape, or returns None for plain values.
    pub fn detect(value: &'a Value) -> Option<Self> {
        let map = value.as_object()?;
        if let Some(hex) = sole_string(map, "$oid") {
            return Some(ForeignValue::ObjectId(hex));
        }
        if matches!(
            map.get("_bsontype").and_then(Value::as_str),
            Some("ObjectID") | Some("ObjectId")
        ) {
            return map.get("id").and_then(Value::as_str).map(ForeignValue::ObjectId);
        }
        if map.len() == 1 {
            if let Some(date) = map.get("$date") {
                if date.is_string() || date.is_number() {
                    return Some(ForeignValue::Date(date));
                }
            }
        }
        if let Some(source) = map.get("$regex").and_then(Value::as_str) {
            let only_regex_keys = map.keys().all(|k| k == "$regex" || k == "$options");
            if only_regex_keys {
                return Some(ForeignValue::RegExp(source));
            }
        }
        None
    }
}

fn sole_string<'a>(map: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    if map.len() != 1 {
        return None;
    }
    map.get(key).and_then(Value::as_str)
}

/// Returns the runtime type name reported as `actual` on `type` errors.
pub fn runtime_type_name(value: Option<&Value>) -> &'static str {
    match value {
        None => "undefined",
        Some(Value::Null) => "null",
        Some(Value::Bool(_)) => "boolean",
        Some(Value::Number(_)) => "number",
        Some(Value::String(_)) => "string",
        Some(Value::Array(_)) => "array",
        Some(v @ Value::Object(_)) => match ForeignValue::detect(v) {
            Some(ForeignValue::Date(_)) => "date",
            Some(ForeignValue::RegExp(_)) => "regexp",
            _ => "object",
        },
    }
}

macro_rules! type_predicates {
    ($($fn_name:ident => $variant:ident),* $(,)?) => {
        $(
            #[doc = concat!("Returns true if the value satisfies the `", stringify!($variant), "` type.")]
            pub fn $fn_name(value: &Value) -> bool {
                TypeName::$variant.matches(Some(value))
            }
        )*
    };
}

type_predicates! {
    is_string => String,
    is_number => Number,
    is_boolean => Boolean,
    is_integer => Integer,
    is_float => Float,
    is_array => Array,
    is_object => Object,
    is_null => Null,
    is_undefined => Undefined,
    is_any => Any,
    is_date => Date,
    is_regexp => RegExp,
    is_mongo_id => MongoId,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_name_resolution() {
        assert_eq!(TypeName::from_name("string"), TypeName::String);
        assert_eq!(TypeName::from_name(" integer "), TypeName::Integer);
        assert_eq!(TypeName::from_name("mongoId"), TypeName::MongoId);
        assert_eq!(TypeName::from_name("MongoID"), TypeName::MongoId);
        assert_eq!(TypeName::from_name("Boolean"), TypeName::Boolean);
        assert_eq!(
            TypeName::from_name("money"),
            TypeName::Custom("money".to_string())
        );
    }

    #[test]
    fn test_integer_and_float_split() {
        assert!(is_integer(&json!(123)));
        assert!(is_integer(&json!(10.0)));
        assert!(!is_integer(&json!(10.44)));
        assert!(!is_integer(&json!("123")));

        assert!(is_float(&json!(12.34)));
        assert!(!is_float(&json!(10)));
        assert!(!is_float(&json!("12.34")));
    }

    #[test]
    fn test_absent_values() {
        assert!(TypeName::Undefined.matches(None));
        assert!(!TypeName::Any.matches(None));
        assert!(!TypeName::Null.matches(None));
        assert!(is_any(&Value::Null));
        assert!(!is_undefined(&json!("undefined")));
    }

    #[test]
    fn test_foreign_values() {
        let oid = json!({"$oid": "507f191e810c19729de860ea"});
        assert!(is_mongo_id(&oid));
        assert!(is_object(&oid));

        let legacy = json!({"_bsontype": "ObjectID", "id": "507f191e810c19729de860ea"});
        assert!(is_mongo_id(&legacy));

        assert!(!is_mongo_id(&json!({"$oid": "google"})));
        assert!(!is_mongo_id(&json!("507f191e810c19729de860ea")));

        let date = json!({"$date": "2013-01-09T12:28:03.150Z"});
        assert!(is_date(&date));
        assert!(!is_object(&date));
        assert_eq!(runtime_type_name(Some(&date)), "date");

        let re = json!({"$regex": "^hello", "$options": "i"});
        assert!(is_regexp(&re));
        assert_eq!(runtime_type_name(Some(&re)), "regexp");
        assert!(!is_regexp(&json!({"$regex": "^a", "other": 1})));
    }

    #[test]
    fn test_runtime_type_names() {
        assert_eq!(runtime_type_name(None), "undefined");
        assert_eq!(runtime_type_name(Some(&Value::Null)), "null");
        assert_eq!(runtime_type_name(Some(&json!(true))), "boolean");
        assert_eq!(runtime_type_name(Some(&json!(1.5))), "number");
        assert_eq!(runtime_type_name(Some(&json!([]))), "array");
        assert_eq!(runtime_type_name(Some(&json!({}))), "object");
    }

    #[test]
    fn test_check_reports_type_error() {
        let result = TypeName::Integer.check(Some(&json!("12")));
        assert!(!result.valid);
        assert_eq!(result.errors.len(), 1);
        assert_eq!(result.errors[0].attribute, "type");
        assert_eq!(result.errors[0].expected, Some(json!("integer")));
        assert_eq!(result.errors[0].actual, Some(json!("12")));

        assert!(TypeName::Undefined.check(None).valid);
    }
}

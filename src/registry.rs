//! Extension tables for formats and types.
//!
//! This module provides the [`Registry`] type that holds user-registered
//! formats and types next to the built-in tables of [`Format`] and
//! [`TypeName`]. A registry is owned by one or more [`Validator`]s through an
//! `Arc`; two validators built from separate registries never see each
//! other's extensions.
//!
//! [`Validator`]: crate::Validator

use parking_lot::RwLock;
use regex::Regex;
use serde_json::Value;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, LazyLock};

use crate::formats::Format;
use crate::types::TypeName;

static NAME_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_\-]*$").unwrap());

/// Predicate backing a format registered with a closure.
pub type FormatPredicate = Arc<dyn Fn(&str) -> bool + Send + Sync>;

/// Predicate backing a registered type.
pub type TypePredicate = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// How a named format tests a value.
#[derive(Clone)]
pub enum FormatMatcher {
    /// One of the built-in formats.
    Builtin(Format),
    /// A user pattern tested against string values.
    Pattern(Regex),
    /// A user predicate tested against string values.
    Predicate(FormatPredicate),
}

impl FormatMatcher {
    /// Tests a value. User matchers only ever accept strings.
    pub fn matches(&self, value: &Value) -> bool {
        match self {
            FormatMatcher::Builtin(format) => format.matches(value),
            FormatMatcher::Pattern(re) => value.as_str().is_some_and(|s| re.is_match(s)),
            FormatMatcher::Predicate(predicate) => value.as_str().is_some_and(|s| predicate(s)),
        }
    }
}

impl fmt::Debug for FormatMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatMatcher::Builtin(format) => f.debug_tuple("Builtin").field(format).finish(),
            FormatMatcher::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            FormatMatcher::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}

/// A thread-safe store of format and type extensions.
///
/// # Thread Safety
///
/// Both tables sit behind a `parking_lot::RwLock`:
/// - Lookups take a short read lock and clone the matcher out, so user
///   predicates never run while a lock is held
/// - Extension calls are serialized (write access)
///
/// # Example
///
/// ```rust
/// use lxvalid::Registry;
/// use serde_json::json;
///
/// let registry = Registry::new();
/// registry.extend_format("zip", r"^\d{5}$").unwrap();
///
/// // Duplicate registration fails
/// assert!(registry.extend_format("zip", r"^\d{4}$").is_err());
///
/// let matcher = registry.resolve_format("ZIP", true).unwrap();
/// assert!(matcher.matches(&json!("12345")));
/// ```
pub struct Registry {
    formats: RwLock<HashMap<String, FormatMatcher>>,
    types: RwLock<HashMap<String, TypePredicate>>,
}

impl Registry {
    /// Creates a registry whose format extension table holds `url`.
    pub fn new() -> Self {
        let mut formats = HashMap::new();
        formats.insert(
            Format::Url.as_str().to_string(),
            FormatMatcher::Builtin(Format::Url),
        );
        Self {
            formats: RwLock::new(formats),
            types: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a format backed by a regular expression.
    ///
    /// # Errors
    ///
    /// - `RegistryError::InvalidName` if `name` is not a plain name
    /// - `RegistryError::InvalidPattern` if `pattern` does not compile
    /// - `RegistryError::DuplicateName` if the extension table already has `name`
    pub fn extend_format(&self, name: &str, pattern: &str) -> Result<(), RegistryError> {
        let re = Regex::new(pattern).map_err(|source| RegistryError::InvalidPattern {
            name: name.to_string(),
            source,
        })?;
        self.insert_format(name, FormatMatcher::Pattern(re))
    }

    /// Registers a format backed by a predicate over string values.
    pub fn extend_format_fn<F>(&self, name: &str, predicate: F) -> Result<(), RegistryError>
    where
        F: Fn(&str) -> bool + Send + Sync + 'static,
    {
        self.insert_format(name, FormatMatcher::Predicate(Arc::new(predicate)))
    }

    fn insert_format(&self, name: &str, matcher: FormatMatcher) -> Result<(), RegistryError> {
        let key = checked_name(name)?;
        let mut formats = self.formats.write();

        if formats.contains_key(&key) {
            return Err(RegistryError::DuplicateName(key));
        }

        tracing::debug!(format = %key, "registered format extension");
        formats.insert(key, matcher);
        Ok(())
    }

    /// Registers a type predicate.
    ///
    /// Built-in type names cannot be redefined.
    ///
    /// ```rust
    /// use lxvalid::Registry;
    /// use serde_json::Value;
    ///
    /// let registry = Registry::new();
    /// registry
    ///     .extend_type("positive", |v: &Value| v.as_f64().is_some_and(|n| n > 0.0))
    ///     .unwrap();
    /// assert!(registry.extend_type("string", |_: &Value| true).is_err());
    /// ```
    pub fn extend_type<F>(&self, name: &str, predicate: F) -> Result<(), RegistryError>
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        let key = checked_name(name)?;
        if !matches!(TypeName::from_name(&key), TypeName::Custom(_)) {
            return Err(RegistryError::DuplicateName(key));
        }

        let mut types = self.types.write();
        if types.contains_key(&key) {
            return Err(RegistryError::DuplicateName(key));
        }

        tracing::debug!(r#type = %key, "registered type extension");
        types.insert(key, Arc::new(predicate));
        Ok(())
    }

    /// Looks up a format by name.
    ///
    /// With `use_extensions` the extension table is consulted first and the
    /// built-in table second. Without it only the built-in table is used, so
    /// `url` and user formats are unknown.
    pub fn resolve_format(&self, name: &str, use_extensions: bool) -> Option<FormatMatcher> {
        let key = name.trim().to_lowercase();
        if use_extensions {
            if let Some(matcher) = self.formats.read().get(&key) {
                return Some(matcher.clone());
            }
        }
        Format::from_name(&key)
            .filter(|format| !format.is_extension())
            .map(FormatMatcher::Builtin)
    }

    /// Looks up a registered type predicate.
    pub fn type_predicate(&self, name: &str) -> Option<TypePredicate> {
        self.types.read().get(&name.trim().to_lowercase()).cloned()
    }

    /// Tests a possibly absent value against a type name.
    ///
    /// Built-in names are matched directly; custom names go through the
    /// extension table and fail when nothing is registered under them.
    pub fn matches_type(&self, ty: &TypeName, value: Option<&Value>) -> bool {
        match ty {
            TypeName::Custom(name) => match (self.type_predicate(name), value) {
                (Some(predicate), Some(value)) => predicate(value),
                (None, _) => {
                    tracing::warn!(r#type = %name, "unknown type name");
                    false
                }
                (Some(_), None) => false,
            },
            builtin => builtin.matches(value),
        }
    }

    /// Returns the names in the format extension table, sorted.
    pub fn format_extensions(&self) -> Vec<String> {
        let mut names: Vec<String> = self.formats.read().keys().cloned().collect();
        names.sort();
        names
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<String> = self.types.read().keys().cloned().collect();
        types.sort();
        f.debug_struct("Registry")
            .field("formats", &self.format_extensions())
            .field("types", &types)
            .finish()
    }
}

fn checked_name(name: &str) -> Result<String, RegistryError> {
    if !NAME_RE.is_match(name) {
        return Err(RegistryError::InvalidName(name.to_string()));
    }
    Ok(name.to_lowercase())
}

/// Errors that can occur during registry operations.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Attempted to register a name that already exists.
    #[error("'{0}' already registered")]
    DuplicateName(String),

    /// The name is empty or contains characters other than letters, digits,
    /// `-` and `_`.
    #[error("'{0}' is not a valid name")]
    InvalidName(String),

    /// The pattern given for a format does not compile.
    #[error("invalid pattern for format '{name}': {source}")]
    InvalidPattern {
        name: String,
        #[source]
        source: regex::Error,
    },
}

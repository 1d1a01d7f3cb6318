//! Property paths reported on validation errors.
//!
//! A [`JsonPath`] renders as the dotted form consumers compare against:
//! `address.street`, `arr.0.name`, or just `0` for an element of a root
//! array. The root itself renders as the empty string.

use std::fmt::{self, Display};

/// One step from a container to a contained value.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PathSegment {
    Field(String),
    Index(usize),
}

impl Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Field(name) => f.write_str(name),
            PathSegment::Index(index) => write!(f, "{}", index),
        }
    }
}

/// Location of a value inside the validated document.
///
/// `push_*` leaves `self` untouched, so every property of an object can
/// extend the same parent path.
///
/// ```rust
/// use lxvalid::JsonPath;
///
/// let list = JsonPath::from_field("arr");
/// let name = list.push_index(0).push_field("name");
///
/// assert_eq!(name.to_string(), "arr.0.name");
/// assert_eq!(name.parent().unwrap(), "arr.0");
/// assert_eq!(JsonPath::root().push_index(2), "2");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct JsonPath {
    segments: Vec<PathSegment>,
}

impl JsonPath {
    /// The document root.
    pub fn root() -> Self {
        Self::default()
    }

    pub fn from_field(name: impl Into<String>) -> Self {
        Self::root().push_field(name)
    }

    pub fn push_field(&self, name: impl Into<String>) -> Self {
        self.extended(PathSegment::Field(name.into()))
    }

    pub fn push_index(&self, index: usize) -> Self {
        self.extended(PathSegment::Index(index))
    }

    fn extended(&self, segment: PathSegment) -> Self {
        let mut segments = Vec::with_capacity(self.segments.len() + 1);
        segments.extend_from_slice(&self.segments);
        segments.push(segment);
        Self { segments }
    }

    pub fn is_root(&self) -> bool {
        self.segments.is_empty()
    }

    /// Path of the enclosing container; `None` at the root.
    pub fn parent(&self) -> Option<Self> {
        self.segments.split_last().map(|(_, rest)| Self {
            segments: rest.to_vec(),
        })
    }

    /// The final step, i.e. the property name or element index.
    pub fn last(&self) -> Option<&PathSegment> {
        self.segments.last()
    }

    pub fn segments(&self) -> &[PathSegment] {
        &self.segments
    }
}

impl Display for JsonPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut segments = self.segments.iter();
        if let Some(first) = segments.next() {
            write!(f, "{}", first)?;
        }
        segments.try_for_each(|segment| write!(f, ".{}", segment))
    }
}

impl PartialEq<str> for JsonPath {
    fn eq(&self, other: &str) -> bool {
        self.to_string() == other
    }
}

impl PartialEq<&str> for JsonPath {
    fn eq(&self, other: &&str) -> bool {
        self == *other
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_root_renders_empty() {
        let root = JsonPath::root();
        assert!(root.is_root());
        assert_eq!(root.to_string(), "");
        assert!(root.parent().is_none());
        assert!(root.last().is_none());
    }

    #[test]
    fn test_indices_render_as_plain_segments() {
        assert_eq!(JsonPath::root().push_index(0).to_string(), "0");
        assert_eq!(
            JsonPath::from_field("matrix").push_index(1).push_index(3).to_string(),
            "matrix.1.3"
        );
    }

    #[test]
    fn test_siblings_share_parent() {
        let address = JsonPath::from_field("address");
        let street = address.push_field("street");
        let zip = address.push_field("zip");

        assert_eq!(address, "address");
        assert_eq!(street, "address.street");
        assert_eq!(zip.parent(), Some(address));
        assert_eq!(zip.last(), Some(&PathSegment::Field("zip".to_string())));
    }

    #[test]
    fn test_segments() {
        let path = JsonPath::from_field("arr").push_index(4);
        assert_eq!(
            path.segments(),
            [PathSegment::Field("arr".to_string()), PathSegment::Index(4)]
        );
        assert!(path != "arr");
    }
}

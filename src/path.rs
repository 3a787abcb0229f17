//! Property paths for locating values in nested structures.
//!
//! This module provides [`PropertyPath`] and [`PathKey`]. A path is used in two
//! directions: contracts fold it over a candidate value to find the value a
//! constraint applies to, and [`Errors`](crate::Errors) uses the same keys to
//! address nested error nodes.

use std::fmt::{self, Display};

use serde_json::Value;

/// A single step in a property path.
///
/// Names dereference object members, indices dereference array items. Keys
/// given as `&str` or `String` are interchangeable; a name and an index are
/// always distinct keys, so `"1"` and `1` never collide.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PathKey {
    /// Array or tuple position.
    Index(usize),
    /// Object member or attribute name.
    Name(String),
}

impl PathKey {
    /// Creates a name key.
    pub fn name(name: impl Into<String>) -> Self {
        PathKey::Name(name.into())
    }

    /// Creates an index key.
    pub fn index(idx: usize) -> Self {
        PathKey::Index(idx)
    }

    /// Returns the key as JSON (a string or a non-negative integer).
    pub fn to_value(&self) -> Value {
        match self {
            PathKey::Index(idx) => Value::from(*idx),
            PathKey::Name(name) => Value::String(name.clone()),
        }
    }

    /// Reads a key back from JSON. Only strings and non-negative integers are keys.
    pub fn from_value(value: &Value) -> Option<Self> {
        match value {
            Value::String(name) => Some(PathKey::Name(name.clone())),
            Value::Number(n) => n
                .as_u64()
                .and_then(|n| usize::try_from(n).ok())
                .map(PathKey::Index),
            _ => None,
        }
    }

    /// Dereferences this key against a value.
    ///
    /// Returns `None` when the value does not support this kind of access or
    /// the member/item is absent.
    pub fn access<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        match (self, value) {
            (PathKey::Name(name), Value::Object(map)) => map.get(name),
            (PathKey::Index(idx), Value::Array(items)) => items.get(*idx),
            _ => None,
        }
    }
}

impl From<&str> for PathKey {
    fn from(name: &str) -> Self {
        PathKey::Name(name.to_string())
    }
}

impl From<String> for PathKey {
    fn from(name: String) -> Self {
        PathKey::Name(name)
    }
}

impl From<&String> for PathKey {
    fn from(name: &String) -> Self {
        PathKey::Name(name.clone())
    }
}

impl From<usize> for PathKey {
    fn from(idx: usize) -> Self {
        PathKey::Index(idx)
    }
}

impl From<&PathKey> for PathKey {
    fn from(key: &PathKey) -> Self {
        key.clone()
    }
}

impl Display for PathKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathKey::Index(idx) => write!(f, "{}", idx),
            PathKey::Name(name) => write!(f, "{}", name),
        }
    }
}

/// An ordered chain of keys leading from a root value to a nested one.
///
/// # Example
///
/// ```rust
/// use stannum::PropertyPath;
///
/// let path = PropertyPath::root()
///     .push_name("manufacturer")
///     .push_name("factories")
///     .push_index(0);
///
/// assert_eq!(path.to_string(), "manufacturer.factories[0]");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default)]
pub struct PropertyPath {
    keys: Vec<PathKey>,
}

impl PropertyPath {
    /// Creates an empty path representing the value itself.
    pub fn root() -> Self {
        Self::default()
    }

    /// Creates a path from a single name.
    pub fn from_name(name: impl Into<String>) -> Self {
        Self {
            keys: vec![PathKey::Name(name.into())],
        }
    }

    /// Creates a path from a single index.
    pub fn from_index(idx: usize) -> Self {
        Self {
            keys: vec![PathKey::Index(idx)],
        }
    }

    /// Returns a new path with a name appended.
    pub fn push_name(&self, name: impl Into<String>) -> Self {
        self.push(PathKey::Name(name.into()))
    }

    /// Returns a new path with an index appended.
    pub fn push_index(&self, idx: usize) -> Self {
        self.push(PathKey::Index(idx))
    }

    /// Returns a new path with a key appended.
    pub fn push(&self, key: PathKey) -> Self {
        let mut keys = self.keys.clone();
        keys.push(key);
        Self { keys }
    }

    /// Returns a new path with every key of `other` appended.
    pub fn join(&self, other: &PropertyPath) -> Self {
        let mut keys = self.keys.clone();
        keys.extend(other.keys.iter().cloned());
        Self { keys }
    }

    /// Returns true if this is the root path (no keys).
    pub fn is_root(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns the number of keys in this path.
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    /// Returns true if this path has no keys.
    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    /// Returns an iterator over the keys.
    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.keys.iter()
    }

    /// Returns the keys as a slice.
    pub fn as_slice(&self) -> &[PathKey] {
        &self.keys
    }

    /// Returns the parent path, or None if this is root.
    pub fn parent(&self) -> Option<Self> {
        if self.keys.is_empty() {
            None
        } else {
            Some(Self {
                keys: self.keys[..self.keys.len() - 1].to_vec(),
            })
        }
    }

    /// Returns the last key, or None if this is root.
    pub fn last(&self) -> Option<&PathKey> {
        self.keys.last()
    }

    /// Folds the path over `value` left to right.
    ///
    /// Each step only dereferences when the intermediate value supports that
    /// kind of access; otherwise the walk stops and `None` is returned.
    pub fn resolve<'a>(&self, value: &'a Value) -> Option<&'a Value> {
        self.keys
            .iter()
            .try_fold(value, |current, key| key.access(current))
    }
}

impl Display for PropertyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, key) in self.keys.iter().enumerate() {
            match key {
                PathKey::Name(name) => {
                    if i > 0 {
                        write!(f, ".")?;
                    }
                    write!(f, "{}", name)?;
                }
                PathKey::Index(idx) => write!(f, "[{}]", idx)?,
            }
        }
        Ok(())
    }
}

impl From<&str> for PropertyPath {
    fn from(name: &str) -> Self {
        Self::from_name(name)
    }
}

impl From<String> for PropertyPath {
    fn from(name: String) -> Self {
        Self::from_name(name)
    }
}

impl From<usize> for PropertyPath {
    fn from(idx: usize) -> Self {
        Self::from_index(idx)
    }
}

impl From<PathKey> for PropertyPath {
    fn from(key: PathKey) -> Self {
        Self { keys: vec![key] }
    }
}

impl From<Vec<PathKey>> for PropertyPath {
    fn from(keys: Vec<PathKey>) -> Self {
        Self { keys }
    }
}

impl From<&[PathKey]> for PropertyPath {
    fn from(keys: &[PathKey]) -> Self {
        Self {
            keys: keys.to_vec(),
        }
    }
}

impl<K: Into<PathKey>, const N: usize> From<[K; N]> for PropertyPath {
    fn from(keys: [K; N]) -> Self {
        keys.into_iter().collect()
    }
}

impl<K: Into<PathKey>> FromIterator<K> for PropertyPath {
    fn from_iter<I: IntoIterator<Item = K>>(iter: I) -> Self {
        Self {
            keys: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_root_path_is_empty() {
        let path = PropertyPath::root();
        assert!(path.is_root());
        assert_eq!(path.len(), 0);
        assert_eq!(path.to_string(), "");
    }

    #[test]
    fn test_field_with_index() {
        let path = PropertyPath::root().push_name("towns").push_index(1);
        assert_eq!(path.to_string(), "towns[1]");
    }

    #[test]
    fn test_from_array_of_names() {
        let path = PropertyPath::from(["manufacturer", "factory", "address"]);
        assert_eq!(path.len(), 3);
        assert_eq!(path.to_string(), "manufacturer.factory.address");
    }

    #[test]
    fn test_resolve_nested_value() {
        let value = json!({"manufacturer": {"factories": [{"city": "Tulsa"}]}});
        let path = PropertyPath::root()
            .push_name("manufacturer")
            .push_name("factories")
            .push_index(0)
            .push_name("city");

        assert_eq!(path.resolve(&value), Some(&json!("Tulsa")));
    }

    #[test]
    fn test_resolve_stops_on_unsupported_access() {
        let value = json!({"name": "widget"});

        assert_eq!(PropertyPath::from(["name", "first"]).resolve(&value), None);
        assert_eq!(PropertyPath::from_index(0).resolve(&value), None);
        assert_eq!(PropertyPath::from_name("missing").resolve(&value), None);
    }

    #[test]
    fn test_root_resolves_to_value() {
        let value = json!(42);
        assert_eq!(PropertyPath::root().resolve(&value), Some(&value));
    }

    #[test]
    fn test_key_json_conversion() {
        assert_eq!(PathKey::from_value(&json!("a")), Some(PathKey::name("a")));
        assert_eq!(PathKey::from_value(&json!(3)), Some(PathKey::index(3)));
        assert_eq!(PathKey::from_value(&json!(-1)), None);
        assert_eq!(PathKey::from_value(&json!(null)), None);
        assert_eq!(PathKey::index(2).to_value(), json!(2));
    }

    #[test]
    fn test_name_and_index_are_distinct() {
        assert_ne!(PathKey::from("1"), PathKey::from(1usize));
    }

    #[test]
    fn test_parent_and_last() {
        let path = PropertyPath::from(["a", "b"]);
        assert_eq!(path.last(), Some(&PathKey::name("b")));
        assert_eq!(path.parent(), Some(PropertyPath::from_name("a")));
        assert!(PropertyPath::root().parent().is_none());
    }
}

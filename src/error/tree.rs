//! The nested, path-addressed errors tree.

use std::collections::HashSet;
use std::fmt::{self, Display};

use indexmap::IndexMap;
use serde_json::{Map, Value};
use stillwater::prelude::*;

use crate::error::messages::MessageStrategy;
use crate::error::record::{ErrorRecord, FlatError};
use crate::error::ContractError;
use crate::path::{PathKey, PropertyPath};

/// A deduplicating accumulator of error records, nested by path.
///
/// Each node holds its own records plus child nodes keyed by [`PathKey`].
/// Children are created on first access and the same key always returns the
/// same node, so writing into `errors.child("a").child("b")` twice targets a
/// single shared node. Records are deduplicated per node by full equality of
/// type, message and data.
///
/// [`Errors::push`] is the fallible way to add a record. The `add` helpers
/// panic on a blank type.
///
/// # Example
///
/// ```rust
/// use stannum::{Errors, PathKey};
///
/// let mut errors = Errors::new();
/// errors.child("towns").child(1usize).child("name").add("unpronounceable");
///
/// let flat = errors.to_vec();
/// assert_eq!(flat.len(), 1);
/// assert_eq!(
///     flat[0].path,
///     vec![PathKey::name("towns"), PathKey::index(1), PathKey::name("name")]
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct Errors {
    own: IndexMap<String, ErrorRecord>,
    children: IndexMap<PathKey, Errors>,
}

/// A value that can replace a subtree via [`Errors::set`].
#[derive(Debug, Clone)]
pub enum ErrorsAssignment {
    /// Remove every record under the key.
    Clear,
    /// Copy another tree.
    Tree(Errors),
    /// Re-add flattened records, each at its own relative path.
    Records(Vec<FlatError>),
    /// Raw JSON: `null`, or an array of error objects with a `type`.
    Raw(Value),
}

impl From<Errors> for ErrorsAssignment {
    fn from(errors: Errors) -> Self {
        ErrorsAssignment::Tree(errors)
    }
}

impl From<&Errors> for ErrorsAssignment {
    fn from(errors: &Errors) -> Self {
        ErrorsAssignment::Tree(errors.clone())
    }
}

impl From<Option<Errors>> for ErrorsAssignment {
    fn from(errors: Option<Errors>) -> Self {
        errors.map_or(ErrorsAssignment::Clear, ErrorsAssignment::Tree)
    }
}

impl From<Vec<FlatError>> for ErrorsAssignment {
    fn from(records: Vec<FlatError>) -> Self {
        ErrorsAssignment::Records(records)
    }
}

impl From<Value> for ErrorsAssignment {
    fn from(value: Value) -> Self {
        ErrorsAssignment::Raw(value)
    }
}

impl Errors {
    /// Creates an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the child node at `key`, creating it if needed.
    pub fn child(&mut self, key: impl Into<PathKey>) -> &mut Errors {
        self.children.entry(key.into()).or_default()
    }

    /// Returns the child node at `key` without creating it.
    pub fn get(&self, key: impl Into<PathKey>) -> Option<&Errors> {
        self.children.get(&key.into())
    }

    /// Descends through `keys`, creating nodes as needed.
    pub fn dig<I>(&mut self, keys: I) -> &mut Errors
    where
        I: IntoIterator,
        I::Item: Into<PathKey>,
    {
        keys.into_iter().fold(self, |node, key| node.child(key))
    }

    /// Descends through every key of `path`, creating nodes as needed.
    pub fn dig_path(&mut self, path: &PropertyPath) -> &mut Errors {
        self.dig(path.keys())
    }

    /// Adds a record with the given type and no message or data.
    ///
    /// # Panics
    ///
    /// Panics if `error_type` is blank. Use [`Errors::push`] to handle that
    /// case as an error.
    pub fn add(&mut self, error_type: impl Into<String>) -> &mut Self {
        self.add_with(error_type, None, Map::new())
    }

    /// Adds a record with a message and data.
    ///
    /// # Panics
    ///
    /// Panics if `error_type` is blank.
    pub fn add_with(
        &mut self,
        error_type: impl Into<String>,
        message: Option<String>,
        data: Map<String, Value>,
    ) -> &mut Self {
        let record = ErrorRecord {
            error_type: error_type.into(),
            message,
            data,
        };
        if let Err(e) = self.push(record) {
            panic!("{}", e);
        }
        self
    }

    /// Adds a record, rejecting a blank type.
    ///
    /// Adding a record equal to one already held by this node is a no-op.
    pub fn push(&mut self, record: ErrorRecord) -> Result<&mut Self, ContractError> {
        record.check()?;
        self.insert(record);
        Ok(self)
    }

    /// Adds a record known to be well formed. Returns true if it was new.
    pub(crate) fn insert(&mut self, record: ErrorRecord) -> bool {
        let fingerprint = record.fingerprint();
        if self.own.contains_key(&fingerprint) {
            false
        } else {
            self.own.insert(fingerprint, record);
            true
        }
    }

    /// Returns the records held directly by this node.
    pub fn records(&self) -> impl Iterator<Item = &ErrorRecord> {
        self.own.values()
    }

    /// Returns the keys of this node's children, in creation order.
    pub fn keys(&self) -> impl Iterator<Item = &PathKey> {
        self.children.keys()
    }

    /// Flattens the tree depth first.
    ///
    /// Records of this node come first with an empty path, then each child in
    /// creation order with its key prefixed to the paths of its records.
    pub fn iter(&self) -> std::vec::IntoIter<FlatError> {
        self.to_vec().into_iter()
    }

    /// Flattens the tree into a vector. See [`Errors::iter`].
    pub fn to_vec(&self) -> Vec<FlatError> {
        let mut flat = Vec::with_capacity(self.len());
        self.flatten_into(&mut Vec::new(), &mut flat);
        flat
    }

    fn flatten_into(&self, prefix: &mut Vec<PathKey>, out: &mut Vec<FlatError>) {
        for record in self.own.values() {
            out.push(FlatError::from_record(record, prefix.clone()));
        }
        for (key, child) in &self.children {
            prefix.push(key.clone());
            child.flatten_into(prefix, out);
            prefix.pop();
        }
    }

    /// Replaces the whole subtree at `key`.
    ///
    /// Accepts another tree (copied), flattened records, `Value::Null` or an
    /// empty array (clears), or a JSON array of error objects. Anything else
    /// is rejected and leaves the tree unchanged.
    pub fn set(
        &mut self,
        key: impl Into<PathKey>,
        value: impl Into<ErrorsAssignment>,
    ) -> Result<&mut Self, ContractError> {
        let replacement = match value.into() {
            ErrorsAssignment::Clear => Errors::new(),
            ErrorsAssignment::Tree(tree) => tree,
            ErrorsAssignment::Records(records) => Self::from_records(records)?,
            ErrorsAssignment::Raw(Value::Null) => Errors::new(),
            ErrorsAssignment::Raw(Value::Array(items)) => {
                let records = items
                    .iter()
                    .map(FlatError::from_value)
                    .collect::<Result<Vec<_>, _>>()?;
                Self::from_records(records)?
            }
            ErrorsAssignment::Raw(other) => {
                return Err(ContractError::InvalidErrors(format!(
                    "value must be an Errors instance or an array of error objects, got {}",
                    other
                )))
            }
        };
        self.children.insert(key.into(), replacement);
        Ok(self)
    }

    fn from_records(records: Vec<FlatError>) -> Result<Errors, ContractError> {
        let mut tree = Errors::new();
        for error in records {
            let record = error.record();
            record.check()?;
            tree.dig(error.path.iter()).insert(record);
        }
        Ok(tree)
    }

    /// Returns a copy of this tree with every record of `other` added.
    ///
    /// Each record of `other` keeps its relative path. `self` is not changed.
    pub fn merge(&self, other: &Errors) -> Errors {
        let mut merged = self.clone();
        merged.update(other);
        merged
    }

    /// Adds every record of `other` to this tree, in place.
    pub fn update(&mut self, other: &Errors) -> &mut Self {
        for error in other.iter() {
            let record = error.record();
            self.dig(error.path.iter()).insert(record);
        }
        self
    }

    /// Adds flattened records, each at its own relative path.
    pub fn update_records<I>(&mut self, records: I) -> Result<&mut Self, ContractError>
    where
        I: IntoIterator<Item = FlatError>,
    {
        for error in records {
            let record = error.record();
            record.check()?;
            self.dig(error.path.iter()).insert(record);
        }
        Ok(self)
    }

    /// Number of records in this node and every descendant.
    pub fn len(&self) -> usize {
        self.own.len() + self.children.values().map(Errors::len).sum::<usize>()
    }

    /// Alias of [`Errors::len`].
    pub fn count(&self) -> usize {
        self.len()
    }

    /// Returns true if neither this node nor any descendant holds a record.
    pub fn is_empty(&self) -> bool {
        self.own.is_empty() && self.children.values().all(Errors::is_empty)
    }

    /// Groups the flattened records by path, in flattening order.
    pub fn group_by_path(&self) -> IndexMap<Vec<PathKey>, Vec<FlatError>> {
        let mut groups: IndexMap<Vec<PathKey>, Vec<FlatError>> = IndexMap::new();
        for error in self.iter() {
            groups.entry(error.path.clone()).or_default().push(error);
        }
        groups
    }

    /// Returns a copy whose records carry messages from `strategy`.
    ///
    /// Records that already have a message keep it unless `force` is set.
    pub fn with_messages(&self, strategy: &dyn MessageStrategy, force: bool) -> Errors {
        let mut own = IndexMap::with_capacity(self.own.len());
        for record in self.own.values() {
            let mut record = record.clone();
            if force || record.message.is_none() {
                record.message = Some(strategy.message(&record.error_type, &record.data));
            }
            own.insert(record.fingerprint(), record);
        }

        let children = self
            .children
            .iter()
            .map(|(key, child)| (key.clone(), child.with_messages(strategy, force)))
            .collect();

        Errors { own, children }
    }

    /// One-line summary: `"path: message"` entries joined by `", "`.
    ///
    /// The type is used for records without a message.
    pub fn summary(&self) -> String {
        self.iter()
            .map(|error| error.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }

    fn fingerprints(&self) -> HashSet<String> {
        self.iter().map(|error| error.to_value().to_string()).collect()
    }
}

impl PartialEq for Errors {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.fingerprints() == other.fingerprints()
    }
}

impl PartialEq<[FlatError]> for Errors {
    fn eq(&self, other: &[FlatError]) -> bool {
        let theirs: HashSet<String> = other.iter().map(|e| e.to_value().to_string()).collect();
        self.len() == theirs.len() && self.fingerprints() == theirs
    }
}

impl PartialEq<Vec<FlatError>> for Errors {
    fn eq(&self, other: &Vec<FlatError>) -> bool {
        *self == other[..]
    }
}

impl Semigroup for Errors {
    fn combine(mut self, other: Self) -> Self {
        self.update(&other);
        self
    }
}

impl Extend<FlatError> for Errors {
    fn extend<I: IntoIterator<Item = FlatError>>(&mut self, iter: I) {
        for error in iter {
            let record = error.record();
            if record.check().is_ok() {
                self.dig(error.path.iter()).insert(record);
            }
        }
    }
}

impl<'a> IntoIterator for &'a Errors {
    type Item = FlatError;
    type IntoIter = std::vec::IntoIter<FlatError>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl Display for Errors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} error(s):", self.len())?;
        for (i, error) in self.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, error)?;
        }
        Ok(())
    }
}

const _: () = {
    const fn assert_send<T: Send>() {}
    const fn assert_sync<T: Sync>() {}
    assert_send::<Errors>();
    assert_sync::<Errors>();
};

//! Error records stored in an errors tree.
//!
//! [`ErrorRecord`] is what a constraint writes into a node. [`FlatError`] is
//! what comes out when a tree is flattened: the same record plus the path of
//! the node that holds it, relative to the node that was flattened.

use std::fmt::{self, Display};

use serde_json::{json, Map, Value};

use crate::error::ContractError;
use crate::path::{PathKey, PropertyPath};

/// A typed, data-bearing validation failure.
///
/// The `error_type` is a stable identifier (for example
/// `"stannum.constraints.is_not_type"`) that message formatting keys on.
///
/// # Example
///
/// ```rust
/// use stannum::ErrorRecord;
/// use serde_json::json;
///
/// let record = ErrorRecord::new("stannum.constraints.is_not_type")
///     .with_data("type", json!("String"))
///     .with_data("required", json!(true));
///
/// assert_eq!(record.data["type"], json!("String"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ErrorRecord {
    /// Stable identifier of the failure.
    pub error_type: String,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Structured details of the failure.
    pub data: Map<String, Value>,
}

impl ErrorRecord {
    /// Creates a record with no message and no data.
    pub fn new(error_type: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: None,
            data: Map::new(),
        }
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a data entry and returns self for chaining.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Replaces the data map and returns self for chaining.
    pub fn with_data_map(mut self, data: Map<String, Value>) -> Self {
        self.data = data;
        self
    }

    /// Returns an error if the type is blank.
    pub fn check(&self) -> Result<(), ContractError> {
        if self.error_type.trim().is_empty() {
            Err(ContractError::BlankErrorType)
        } else {
            Ok(())
        }
    }

    /// Canonical text of `{type, message, data}` used for per-node dedup.
    ///
    /// `serde_json::Map` keeps keys sorted, so equal records always render
    /// to equal text.
    pub(crate) fn fingerprint(&self) -> String {
        json!({
            "type": self.error_type,
            "message": self.message,
            "data": self.data,
        })
        .to_string()
    }
}

/// A record produced by flattening an errors tree.
///
/// `path` is relative to the node that was flattened.
#[derive(Debug, Clone, PartialEq)]
pub struct FlatError {
    /// Stable identifier of the failure.
    pub error_type: String,
    /// Optional human-readable message.
    pub message: Option<String>,
    /// Structured details of the failure.
    pub data: Map<String, Value>,
    /// Keys from the flattened node down to the node holding the record.
    pub path: Vec<PathKey>,
}

impl FlatError {
    /// Creates a flat error at the root path.
    pub fn new(error_type: impl Into<String>) -> Self {
        Self {
            error_type: error_type.into(),
            message: None,
            data: Map::new(),
            path: Vec::new(),
        }
    }

    /// Sets the path and returns self for chaining.
    pub fn at(mut self, path: impl Into<PropertyPath>) -> Self {
        self.path = path.into().as_slice().to_vec();
        self
    }

    /// Sets the message and returns self for chaining.
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Adds a data entry and returns self for chaining.
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub(crate) fn from_record(record: &ErrorRecord, path: Vec<PathKey>) -> Self {
        Self {
            error_type: record.error_type.clone(),
            message: record.message.clone(),
            data: record.data.clone(),
            path,
        }
    }

    /// Returns the record without its path.
    pub fn record(&self) -> ErrorRecord {
        ErrorRecord {
            error_type: self.error_type.clone(),
            message: self.message.clone(),
            data: self.data.clone(),
        }
    }

    /// Returns the path as a [`PropertyPath`].
    pub fn property_path(&self) -> PropertyPath {
        PropertyPath::from(self.path.as_slice())
    }

    /// Renders the stable external shape `{type, message, data, path}`.
    pub fn to_value(&self) -> Value {
        json!({
            "type": self.error_type,
            "message": self.message,
            "data": self.data,
            "path": self.path.iter().map(PathKey::to_value).collect::<Vec<_>>(),
        })
    }

    /// Reads the external shape back.
    ///
    /// The object must carry a non-blank string `type`. `message`, `data` and
    /// `path` are optional.
    pub fn from_value(value: &Value) -> Result<Self, ContractError> {
        let object = value
            .as_object()
            .ok_or_else(|| ContractError::InvalidErrors(format!("expected an object, got {}", value)))?;

        let error_type = match object.get("type") {
            Some(Value::String(t)) => t.clone(),
            _ => {
                return Err(ContractError::InvalidErrors(format!(
                    "error is missing a type: {}",
                    value
                )))
            }
        };

        let message = match object.get("message") {
            None | Some(Value::Null) => None,
            Some(Value::String(m)) => Some(m.clone()),
            Some(other) => {
                return Err(ContractError::InvalidErrors(format!(
                    "message must be a string, got {}",
                    other
                )))
            }
        };

        let data = match object.get("data") {
            None | Some(Value::Null) => Map::new(),
            Some(Value::Object(data)) => data.clone(),
            Some(other) => {
                return Err(ContractError::InvalidErrors(format!(
                    "data must be an object, got {}",
                    other
                )))
            }
        };

        let path = match object.get("path") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(keys)) => keys
                .iter()
                .map(|key| {
                    PathKey::from_value(key).ok_or_else(|| {
                        ContractError::InvalidErrors(format!("invalid path key {}", key))
                    })
                })
                .collect::<Result<Vec<_>, _>>()?,
            Some(other) => {
                return Err(ContractError::InvalidErrors(format!(
                    "path must be an array, got {}",
                    other
                )))
            }
        };

        let error = Self {
            error_type,
            message,
            data,
            path,
        };
        error.record().check()?;
        Ok(error)
    }
}

impl Display for FlatError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = self.message.as_deref().unwrap_or(&self.error_type);
        if self.path.is_empty() {
            write!(f, "{}", text)
        } else {
            write!(f, "{}: {}", self.property_path(), text)
        }
    }
}

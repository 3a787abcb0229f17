//! Message generation for error records.
//!
//! The engine only produces `(type, data)` pairs. Turning them into text is
//! the job of a [`MessageStrategy`] that the caller passes to
//! [`Errors::with_messages`](crate::Errors::with_messages).

use serde_json::{Map, Value};

/// Produces a human-readable message for an error type and its data.
///
/// Closures with the matching signature implement this trait, so a lookup
/// table or localisation layer can be plugged in without a new type.
pub trait MessageStrategy {
    /// Returns the message for a record.
    fn message(&self, error_type: &str, data: &Map<String, Value>) -> String;
}

impl<F> MessageStrategy for F
where
    F: Fn(&str, &Map<String, Value>) -> String,
{
    fn message(&self, error_type: &str, data: &Map<String, Value>) -> String {
        self(error_type, data)
    }
}

/// English messages for the built-in constraint types.
///
/// Unknown types fall back to the last segment of the identifier with
/// underscores replaced by spaces (`"stannum.constraints.not_numeric"`
/// becomes `"not numeric"`).
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultMessages;

impl MessageStrategy for DefaultMessages {
    fn message(&self, error_type: &str, data: &Map<String, Value>) -> String {
        match error_type {
            "stannum.constraints.invalid" => "is invalid".to_string(),
            "stannum.constraints.valid" => "is valid".to_string(),
            "stannum.constraints.absent" => "is nil or empty".to_string(),
            "stannum.constraints.present" => "is present".to_string(),
            "stannum.constraints.anything" => "may be anything".to_string(),
            "stannum.constraints.nothing" => "is nothing".to_string(),
            "stannum.constraints.is_not_type" => match data.get("type").and_then(Value::as_str) {
                Some(name) => format!("is not a {}", name),
                None => "is not the expected type".to_string(),
            },
            "stannum.constraints.is_type" => match data.get("type").and_then(Value::as_str) {
                Some(name) => format!("is a {}", name),
                None => "is the forbidden type".to_string(),
            },
            "stannum.constraints.does_not_have_methods" => {
                format!("does not respond to the methods {}", join_list(data.get("missing")))
            }
            "stannum.constraints.has_methods" => {
                format!("responds to the methods {}", join_list(data.get("methods")))
            }
            "stannum.constraints.tuples.extra_items" => "has extra items".to_string(),
            "stannum.constraints.tuples.no_extra_items" => "does not have extra items".to_string(),
            "stannum.constraints.hashes.extra_keys" => "has extra keys".to_string(),
            "stannum.constraints.hashes.no_extra_keys" => "does not have extra keys".to_string(),
            "stannum.constraints.hashes.invalid_keys" => {
                format!("has invalid keys {}", join_list(data.get("keys")))
            }
            "stannum.constraints.hashes.valid_keys" => "has valid keys".to_string(),
            other => other
                .rsplit('.')
                .next()
                .unwrap_or(other)
                .replace('_', " "),
        }
    }
}

fn join_list(value: Option<&Value>) -> String {
    match value {
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| match item {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            })
            .collect::<Vec<_>>()
            .join(", "),
        _ => String::new(),
    }
}

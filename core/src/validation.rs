//! Field validation shared by create and update.
//!
//! Every rule is checked and every violation is reported; callers get the
//! full list in one round trip.

use serde_json::Value;

pub const TITLE_REQUIRED: &str = "Title is required and must be a non-empty string";
pub const COMPLETED_NOT_BOOLEAN: &str = "Completed must be a boolean value";
pub const DESCRIPTION_NOT_STRING: &str = "Description must be a string";

/// The merged field values a record would have after a create or update.
///
/// `None` means the key was never supplied.
#[derive(Debug, Clone, Copy, Default)]
pub struct Candidate<'a> {
    pub title: Option<&'a Value>,
    pub description: Option<&'a Value>,
    pub completed: Option<&'a Value>,
}

/// Field values that passed validation, already trimmed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidFields {
    pub title: String,
    pub description: String,
    pub completed: bool,
}

/// Check a candidate against every rule.
///
/// Returns the normalized fields, or the messages of all violated rules in a
/// stable order.
pub fn validate(candidate: Candidate<'_>) -> Result<ValidFields, Vec<String>> {
    let mut errors = Vec::new();

    let title = match candidate.title {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => {
            errors.push(TITLE_REQUIRED.to_string());
            None
        }
    };

    let completed = match candidate.completed {
        None => Some(false),
        Some(Value::Bool(b)) => Some(*b),
        Some(_) => {
            errors.push(COMPLETED_NOT_BOOLEAN.to_string());
            None
        }
    };

    let description = match coerce_description(candidate.description) {
        Some(d) => Some(d),
        None => {
            errors.push(DESCRIPTION_NOT_STRING.to_string());
            None
        }
    };

    match (title, description, completed) {
        (Some(title), Some(description), Some(completed)) if errors.is_empty() => Ok(ValidFields {
            title,
            description,
            completed,
        }),
        _ => Err(errors),
    }
}

// Scalars are stringified; structured values are rejected.
fn coerce_description(value: Option<&Value>) -> Option<String> {
    match value {
        None | Some(Value::Null) => Some(String::new()),
        Some(Value::String(s)) => Some(s.trim().to_string()),
        Some(v @ (Value::Bool(_) | Value::Number(_))) => Some(v.to_string()),
        Some(Value::Array(_) | Value::Object(_)) => None,
    }
}

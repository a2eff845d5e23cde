//! Record and payload types for the todo store.
//!
//! # Design
//! `Todo` is the persisted shape and serializes with camelCase keys so the
//! JSON document on disk and the HTTP responses share one schema.
//!
//! The request payloads keep each field as a raw `serde_json::Value`. A body
//! like `{"completed":"yes"}` must reach validation and be reported alongside
//! every other violation, which would not happen if serde rejected it first.
//! A key that is present with a `null` value is kept as `Some(Value::Null)`,
//! so "absent" and "explicitly null" stay distinguishable.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

/// A single todo record.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Todo {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub completed: bool,
    #[serde(serialize_with = "serialize_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(serialize_with = "serialize_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a todo.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateTodo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed: Option<Value>,
}

/// Request payload for updating a todo. Only the keys present in the body
/// are applied; absent keys leave the stored value untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTodo {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub description: Option<Value>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub completed: Option<Value>,
}

impl CreateTodo {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: Some(Value::String(title.into())),
            ..Self::default()
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Value::String(description.into()));
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(Value::Bool(completed));
        self
    }
}

impl UpdateTodo {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(Value::String(title.into()));
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(Value::String(description.into()));
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(Value::Bool(completed));
        self
    }
}

/// Result of listing the collection.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct TodoList {
    pub data: Vec<Todo>,
    pub count: usize,
}

impl From<Vec<Todo>> for TodoList {
    fn from(data: Vec<Todo>) -> Self {
        let count = data.len();
        Self { data, count }
    }
}

// Only called when the key exists, so a JSON `null` becomes `Some(Null)`.
fn present<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

fn serialize_millis<S>(ts: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&ts.to_rfc3339_opts(SecondsFormat::Millis, true))
}

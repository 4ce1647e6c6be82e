/// Data structures exchanged with the todo API
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Completion status of a todo
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum TodoStatus {
    Completed,
    #[default]
    Pending,
}

impl TodoStatus {
    /// Anything other than `"completed"` (including null) reads as pending
    fn from_wire(value: Option<&Value>) -> TodoStatus {
        match value.and_then(Value::as_str) {
            Some(s) if s.eq_ignore_ascii_case("completed") => TodoStatus::Completed,
            _ => TodoStatus::Pending,
        }
    }

    pub fn toggled(self) -> TodoStatus {
        match self {
            TodoStatus::Completed => TodoStatus::Pending,
            TodoStatus::Pending => TodoStatus::Completed,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TodoStatus::Completed => "completed",
            TodoStatus::Pending => "pending",
        }
    }

    pub fn is_completed(self) -> bool {
        self == TodoStatus::Completed
    }
}

impl fmt::Display for TodoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A job-application note created server-side from a screenshot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(from = "TodoRecord")]
pub struct Todo {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub text: String,
    pub status: TodoStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
}

#[cfg(test)]
impl Todo {
    pub fn new(id: &str, text: &str, status: TodoStatus) -> Todo {
        Todo {
            id: Some(id.to_string()),
            text: text.to_string(),
            status,
            title: None,
        }
    }
}

/// Loosely typed todo as the server sends it
///
/// Null or oddly typed fields fall back to defaults instead of failing the
/// record. `id` and `_id` may both be present; `id` wins.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct TodoRecord {
    id: Option<Value>,
    #[serde(rename = "_id")]
    object_id: Option<Value>,
    text: Option<Value>,
    status: Option<Value>,
    title: Option<Value>,
}

fn id_from_wire(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn string_from_wire(value: Option<Value>) -> Option<String> {
    match value? {
        Value::String(s) => Some(s),
        _ => None,
    }
}

impl From<TodoRecord> for Todo {
    fn from(record: TodoRecord) -> Todo {
        Todo {
            id: id_from_wire(record.id.as_ref()).or_else(|| id_from_wire(record.object_id.as_ref())),
            text: string_from_wire(record.text).unwrap_or_default(),
            status: TodoStatus::from_wire(record.status.as_ref()),
            title: string_from_wire(record.title),
        }
    }
}

/// Body of `PUT /todos/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct StatusUpdate {
    pub status: TodoStatus,
}

/// Reference to the todo created by `POST /process-image`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreatedTodo {
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct ProcessImageResponse {
    #[serde(default)]
    pub todo: Option<CreatedTodo>,
    #[serde(default)]
    pub message: Option<String>,
}

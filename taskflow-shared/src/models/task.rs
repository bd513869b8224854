/// Task model and wire formatting
///
/// A task always belongs to exactly one user and always sits in one of
/// the four board columns. The wire shape (what handlers serialize and
/// the board client consumes) is [`Task`]; storage backends produce
/// [`RawTask`] rows, which are normalized through [`Task::format`].
///
/// # Schema
///
/// ```sql
/// CREATE TABLE tasks (
///     id BIGSERIAL PRIMARY KEY,
///     user_id BIGINT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
///     title TEXT NOT NULL,
///     description TEXT,
///     priority task_priority NOT NULL DEFAULT 'medium',
///     due_date DATE,
///     status task_status NOT NULL DEFAULT 'todo',
///     tags JSONB NOT NULL DEFAULT '[]',
///     attachments JSONB NOT NULL DEFAULT '0',
///     created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
/// );
/// ```
///
/// # Due dates
///
/// `due_date` is a pure calendar date. It is held as a `NaiveDate` end
/// to end and serialized as `YYYY-MM-DD`, so the date a user entered
/// round-trips identically regardless of the server timezone.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

/// Board column a task sits in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_status", rename_all = "kebab-case")]
#[serde(rename_all = "kebab-case")]
pub enum TaskStatus {
    /// Not started
    Todo,

    /// Being worked on
    InProgress,

    /// Awaiting review
    Review,

    /// Finished
    Done,
}

/// The four board columns in display order
pub const COLUMNS: [TaskStatus; 4] = [
    TaskStatus::Todo,
    TaskStatus::InProgress,
    TaskStatus::Review,
    TaskStatus::Done,
];

impl TaskStatus {
    /// Column identifier as it appears on the wire
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskStatus::Todo => "todo",
            TaskStatus::InProgress => "in-progress",
            TaskStatus::Review => "review",
            TaskStatus::Done => "done",
        }
    }
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

/// Task priority
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "task_priority", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl TaskPriority {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaskPriority::Low => "low",
            TaskPriority::Medium => "medium",
            TaskPriority::High => "high",
        }
    }
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

/// A task as serialized to clients
///
/// This is the canonical wire shape: `tags` is always an array and
/// `attachments` is always a non-negative integer, whatever the
/// storage backend handed back. Owner id and creation timestamp are
/// internal and never serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    /// Unique task id (BIGSERIAL, ascending in creation order)
    pub id: i64,

    /// Task title
    pub title: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Priority, defaults to medium
    pub priority: TaskPriority,

    /// Optional calendar due date (`YYYY-MM-DD` on the wire)
    pub due_date: Option<NaiveDate>,

    /// Board column
    pub status: TaskStatus,

    /// Ordered tag list, never null
    pub tags: Vec<String>,

    /// Attachment count, never negative
    pub attachments: u32,
}

/// A task row as a storage backend produced it
///
/// `tags` and `attachments` are loosely typed here because older rows
/// (and the JSONB columns generally) can surface as encoded text or
/// null. [`Task::format`] coerces them to the canonical shapes.
#[derive(Debug, Clone, sqlx::FromRow)]
pub struct RawTask {
    pub id: i64,
    pub user_id: i64,
    pub title: String,
    pub description: Option<String>,
    pub priority: TaskPriority,
    pub due_date: Option<NaiveDate>,
    pub status: TaskStatus,
    pub tags: Option<JsonValue>,
    pub attachments: Option<JsonValue>,
    pub created_at: DateTime<Utc>,
}

/// Caller-supplied task fields
///
/// Used both for create (`POST /tasks`) and full-replace update
/// (`PUT /tasks/:id`). Every field except `title` falls back to its
/// documented default when absent: medium priority, todo status, empty
/// tags, zero attachments.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TaskFields {
    /// Title, required and non-empty (validated by the handler)
    pub title: String,

    /// Optional description
    pub description: Option<String>,

    /// Priority override
    pub priority: Option<TaskPriority>,

    /// Optional calendar due date
    pub due_date: Option<NaiveDate>,

    /// Status override (create always honors it; tasks default to todo)
    pub status: Option<TaskStatus>,

    /// Tag list
    pub tags: Option<Vec<String>>,

    /// Attachment count
    pub attachments: Option<u32>,
}

impl TaskFields {
    pub fn priority_or_default(&self) -> TaskPriority {
        self.priority.unwrap_or_default()
    }

    pub fn status_or_default(&self) -> TaskStatus {
        self.status.unwrap_or_default()
    }

    pub fn tags_or_default(&self) -> Vec<String> {
        self.tags.clone().unwrap_or_default()
    }

    pub fn attachments_or_default(&self) -> u32 {
        self.attachments.unwrap_or(0)
    }
}

impl Task {
    /// Normalizes a raw storage row into the wire shape
    ///
    /// The defensive pieces:
    /// - `tags` encoded as a JSON string is parsed; anything that is
    ///   not an array ends up as `[]`; non-string array elements are
    ///   dropped.
    /// - `attachments` encoded as a JSON string is parsed; null,
    ///   negative, or otherwise malformed values end up as `0`.
    ///
    /// This mirrors the API contract: the client never sees a null
    /// tag list or a malformed attachment count.
    pub fn format(raw: RawTask) -> Self {
        Task {
            id: raw.id,
            title: raw.title,
            description: raw.description,
            priority: raw.priority,
            due_date: raw.due_date,
            status: raw.status,
            tags: coerce_tags(raw.tags),
            attachments: coerce_attachments(raw.attachments),
        }
    }
}

fn coerce_tags(value: Option<JsonValue>) -> Vec<String> {
    let value = match value {
        Some(JsonValue::String(encoded)) => {
            serde_json::from_str(&encoded).unwrap_or(JsonValue::Null)
        }
        Some(v) => v,
        None => return Vec::new(),
    };

    match value {
        JsonValue::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                JsonValue::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

fn coerce_attachments(value: Option<JsonValue>) -> u32 {
    let value = match value {
        Some(JsonValue::String(encoded)) => {
            serde_json::from_str(&encoded).unwrap_or(JsonValue::Null)
        }
        Some(v) => v,
        None => return 0,
    };

    match value {
        JsonValue::Number(n) => n.as_u64().map(|n| n.min(u32::MAX as u64) as u32).unwrap_or(0),
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn raw(tags: Option<JsonValue>, attachments: Option<JsonValue>) -> RawTask {
        RawTask {
            id: 1,
            user_id: 1,
            title: "t".to_string(),
            description: None,
            priority: TaskPriority::Medium,
            due_date: None,
            status: TaskStatus::Todo,
            tags,
            attachments,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(
            serde_json::to_value(TaskStatus::InProgress).unwrap(),
            json!("in-progress")
        );
        assert_eq!(serde_json::to_value(TaskStatus::Todo).unwrap(), json!("todo"));
        assert_eq!(TaskStatus::Review.as_str(), "review");
    }

    #[test]
    fn test_due_date_roundtrips_as_plain_string() {
        let task = Task::format(RawTask {
            due_date: Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()),
            ..raw(None, None)
        });

        let json = serde_json::to_value(&task).unwrap();
        assert_eq!(json["dueDate"], json!("2024-03-15"));

        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back.due_date, Some(NaiveDate::from_ymd_opt(2024, 3, 15).unwrap()));
    }

    #[test]
    fn test_format_coerces_null_tags_and_attachments() {
        let task = Task::format(raw(None, None));
        assert_eq!(task.tags, Vec::<String>::new());
        assert_eq!(task.attachments, 0);
    }

    #[test]
    fn test_format_parses_encoded_text() {
        let task = Task::format(raw(
            Some(json!(r#"["home","urgent"]"#)),
            Some(json!("3")),
        ));
        assert_eq!(task.tags, vec!["home", "urgent"]);
        assert_eq!(task.attachments, 3);
    }

    #[test]
    fn test_format_rejects_malformed_shapes() {
        // Object where an array belongs, negative count
        let task = Task::format(raw(Some(json!({"a": 1})), Some(json!(-4))));
        assert_eq!(task.tags, Vec::<String>::new());
        assert_eq!(task.attachments, 0);

        // Garbage encoded text
        let task = Task::format(raw(Some(json!("not json")), Some(json!("nope"))));
        assert_eq!(task.tags, Vec::<String>::new());
        assert_eq!(task.attachments, 0);
    }

    #[test]
    fn test_format_keeps_string_elements_only() {
        let task = Task::format(raw(Some(json!(["a", 1, "b", null])), Some(json!(2))));
        assert_eq!(task.tags, vec!["a", "b"]);
        assert_eq!(task.attachments, 2);
    }

    #[test]
    fn test_fields_defaults() {
        let fields: TaskFields = serde_json::from_value(json!({"title": "Pay rent"})).unwrap();
        assert_eq!(fields.title, "Pay rent");
        assert_eq!(fields.status_or_default(), TaskStatus::Todo);
        assert_eq!(fields.priority_or_default(), TaskPriority::Medium);
        assert_eq!(fields.tags_or_default(), Vec::<String>::new());
        assert_eq!(fields.attachments_or_default(), 0);
    }

    #[test]
    fn test_fields_missing_title_deserializes_empty() {
        let fields: TaskFields = serde_json::from_value(json!({})).unwrap();
        assert!(fields.title.is_empty());
    }
}

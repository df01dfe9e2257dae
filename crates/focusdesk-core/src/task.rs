//! Task records and the sparse-order-key ranking scheme.
//!
//! Order keys are integers spaced `ORDER_GAP` apart. Only relative rank
//! matters; the gap leaves room to drop a task between two neighbors by
//! taking the midpoint instead of renumbering every sibling. When a gap is
//! exhausted, `midpoint_order` returns `None` and the caller renumbers
//! (see `WorkspaceContext::renumber_orders`).

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use uuid::Uuid;

/// Spacing between freshly assigned order keys.
pub const ORDER_GAP: i64 = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskStatus {
    Todo,
    InProgress,
    Completed,
}

impl Default for TaskStatus {
    fn default() -> Self {
        TaskStatus::Todo
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "todo" => Ok(TaskStatus::Todo),
            "in-progress" | "in_progress" => Ok(TaskStatus::InProgress),
            "completed" | "done" => Ok(TaskStatus::Completed),
            other => Err(format!("unknown status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskPriority {
    Low,
    Medium,
    High,
}

impl Default for TaskPriority {
    fn default() -> Self {
        TaskPriority::Medium
    }
}

impl std::str::FromStr for TaskPriority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "low" => Ok(TaskPriority::Low),
            "medium" => Ok(TaskPriority::Medium),
            "high" => Ok(TaskPriority::High),
            other => Err(format!("unknown priority: {other}")),
        }
    }
}

/// A task row. Field names match the hosted `tasks` table columns so the
/// same shape serializes to the wire and to the local mirror.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub status: TaskStatus,
    #[serde(default)]
    pub priority: TaskPriority,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    /// Sparse rank. `None` sorts as 0, matching rows created before
    /// ordering existed.
    #[serde(default)]
    pub order: Option<i64>,
    /// Empty string = unassigned/local (anonymous mode).
    #[serde(default)]
    pub workspace_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Task {
    pub fn new(title: impl Into<String>) -> Self {
        let now = Utc::now();
        Task {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            description: None,
            status: TaskStatus::default(),
            priority: TaskPriority::default(),
            due_date: None,
            order: None,
            workspace_id: String::new(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_completed(&self) -> bool {
        self.status == TaskStatus::Completed
    }

    /// Full row as a JSON object for remote upserts.
    pub fn to_row(&self) -> Value {
        json!({
            "id": self.id,
            "title": self.title,
            "description": self.description,
            "status": self.status,
            "priority": self.priority,
            "due_date": self.due_date,
            "order": self.order,
            "workspace_id": self.workspace_id,
            "created_at": self.created_at,
            "updated_at": self.updated_at,
        })
    }
}

/// Partial update for a task. Only set fields are applied, and only set
/// fields travel in the remote PATCH body.
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<TaskPriority>,
    pub due_date: Option<NaiveDate>,
    pub order: Option<i64>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.status.is_none()
            && self.priority.is_none()
            && self.due_date.is_none()
            && self.order.is_none()
    }

    /// Merge into `task`, refreshing `updated_at`.
    pub fn apply(&self, task: &mut Task) {
        if let Some(ref title) = self.title {
            task.title = title.clone();
        }
        if let Some(ref description) = self.description {
            task.description = Some(description.clone());
        }
        if let Some(status) = self.status {
            task.status = status;
        }
        if let Some(priority) = self.priority {
            task.priority = priority;
        }
        if let Some(due_date) = self.due_date {
            task.due_date = Some(due_date);
        }
        if let Some(order) = self.order {
            task.order = Some(order);
        }
        task.updated_at = Utc::now();
    }

    /// JSON object holding only the set fields plus the refreshed
    /// `updated_at`, for the remote PATCH.
    pub fn to_fields(&self, updated_at: DateTime<Utc>) -> Value {
        let mut fields = Map::new();
        if let Some(ref title) = self.title {
            fields.insert("title".into(), json!(title));
        }
        if let Some(ref description) = self.description {
            fields.insert("description".into(), json!(description));
        }
        if let Some(status) = self.status {
            fields.insert("status".into(), json!(status));
        }
        if let Some(priority) = self.priority {
            fields.insert("priority".into(), json!(priority));
        }
        if let Some(due_date) = self.due_date {
            fields.insert("due_date".into(), json!(due_date));
        }
        if let Some(order) = self.order {
            fields.insert("order".into(), json!(order));
        }
        fields.insert("updated_at".into(), json!(updated_at));
        Value::Object(fields)
    }
}

/// Rank for the next task created: past the end of every existing key.
pub fn next_order(tasks: &[Task]) -> i64 {
    tasks
        .iter()
        .filter_map(|t| t.order)
        .max()
        .unwrap_or(0)
        .saturating_add(ORDER_GAP)
}

/// Key that slots between two neighbors, or `None` when the gap is
/// exhausted and the caller must renumber.
pub fn midpoint_order(before: Option<i64>, after: Option<i64>) -> Option<i64> {
    match (before, after) {
        (Some(b), Some(a)) => {
            let (lo, hi) = if b <= a { (b, a) } else { (a, b) };
            (hi - lo >= 2).then(|| lo + (hi - lo) / 2)
        }
        (Some(b), None) => Some(b.saturating_add(ORDER_GAP)),
        (None, Some(a)) => Some(a.saturating_sub(ORDER_GAP)),
        (None, None) => Some(ORDER_GAP),
    }
}

/// Display sort: active tasks by order ascending (ties newest-created
/// first), then completed tasks purely by recency. Completed tasks never
/// interleave with active ones.
pub fn sort_tasks(tasks: &mut [Task]) {
    tasks.sort_by(|a, b| {
        match (a.is_completed(), b.is_completed()) {
            (false, true) => std::cmp::Ordering::Less,
            (true, false) => std::cmp::Ordering::Greater,
            (true, true) => b.created_at.cmp(&a.created_at),
            (false, false) => a
                .order
                .unwrap_or(0)
                .cmp(&b.order.unwrap_or(0))
                .then_with(|| b.created_at.cmp(&a.created_at)),
        }
    });
}

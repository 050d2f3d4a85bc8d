use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// A task as the client sees it.
///
/// The backend has been observed sending the completion flag as either
/// `completed` or `isCompleted`. Deserialization folds both into the single
/// `completed` field; nothing past the API boundary sees the raw shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TaskPayload")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub due_date: Option<NaiveDate>,
    pub completed: bool,
    /// Parent project, when the server echoes it. The client always
    /// addresses tasks through the project id in the URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
}

/// Wire shape of a task response, before completion normalization
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskPayload {
    id: String,
    title: String,
    #[serde(default)]
    description: Option<String>,
    #[serde(default)]
    due_date: Option<NaiveDate>,
    #[serde(default)]
    completed: Option<bool>,
    #[serde(default)]
    is_completed: Option<bool>,
    #[serde(default)]
    project_id: Option<String>,
}

impl From<TaskPayload> for Task {
    fn from(p: TaskPayload) -> Self {
        Task {
            id: p.id,
            title: p.title,
            description: p.description.unwrap_or_default(),
            due_date: p.due_date,
            completed: p.completed.unwrap_or(false) || p.is_completed.unwrap_or(false),
            project_id: p.project_id,
        }
    }
}

impl Task {
    /// True when the due date has passed and the task is still open
    pub fn is_overdue(&self, today: NaiveDate) -> bool {
        !self.completed && self.due_date.is_some_and(|due| due < today)
    }
}

/// Body for `POST /projects/{id}/tasks` and `PUT /tasks/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRequest {
    pub title: String,
    pub description: String,
    pub due_date: NaiveDate,
}

/// Status filter applied to an already-fetched task list
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatusFilter {
    #[default]
    All,
    Pending,
    Completed,
}

impl StatusFilter {
    pub fn matches(self, task: &Task) -> bool {
        match self {
            StatusFilter::All => true,
            StatusFilter::Pending => !task.completed,
            StatusFilter::Completed => task.completed,
        }
    }

    /// Next filter in the all → pending → completed cycle
    pub fn cycle(self) -> StatusFilter {
        match self {
            StatusFilter::All => StatusFilter::Pending,
            StatusFilter::Pending => StatusFilter::Completed,
            StatusFilter::Completed => StatusFilter::All,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            StatusFilter::All => "all",
            StatusFilter::Pending => "pending",
            StatusFilter::Completed => "completed",
        }
    }

    pub fn parse(s: &str) -> Option<StatusFilter> {
        match s.to_ascii_lowercase().as_str() {
            "all" => Some(StatusFilter::All),
            "pending" => Some(StatusFilter::Pending),
            "completed" | "done" => Some(StatusFilter::Completed),
            _ => None,
        }
    }
}

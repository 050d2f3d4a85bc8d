use chrono::NaiveDate;

use crate::model::{Project, ProjectRequest, Task, TaskRequest};

/// Date format accepted by the due date field
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// A form that failed validation. Nothing was sent.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormError {
    #[error("title is required")]
    MissingTitle,
    #[error("description is required")]
    MissingDescription,
    #[error("due date is required")]
    MissingDueDate,
    #[error("due date must be YYYY-MM-DD, got '{0}'")]
    InvalidDueDate(String),
    #[error("due date {due} is before today ({today})")]
    DueDateInPast { due: NaiveDate, today: NaiveDate },
}

/// Create/edit form for a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProjectForm {
    pub title: String,
    pub description: String,
    /// Set when the form edits an existing project
    pub editing_id: Option<String>,
}

impl ProjectForm {
    pub fn for_project(project: &Project) -> Self {
        ProjectForm {
            title: project.title.clone(),
            description: project.description.clone().unwrap_or_default(),
            editing_id: Some(project.id.clone()),
        }
    }

    /// Title is required; a blank description is omitted from the request
    pub fn validate(&self) -> Result<ProjectRequest, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let description = self.description.trim();
        Ok(ProjectRequest {
            title: title.to_string(),
            description: (!description.is_empty()).then(|| description.to_string()),
        })
    }
}

/// Create/edit form for a task. All three fields are required.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskForm {
    pub title: String,
    pub description: String,
    /// Raw due date text as typed
    pub due_date: String,
}

impl TaskForm {
    pub fn for_task(task: &Task) -> Self {
        TaskForm {
            title: task.title.clone(),
            description: task.description.clone(),
            due_date: task
                .due_date
                .map(|d| d.format(DATE_FORMAT).to_string())
                .unwrap_or_default(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_empty() && self.description.is_empty() && self.due_date.is_empty()
    }

    pub fn validate(&self, today: NaiveDate) -> Result<TaskRequest, FormError> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(FormError::MissingTitle);
        }
        let description = self.description.trim();
        if description.is_empty() {
            return Err(FormError::MissingDescription);
        }
        let due_date = parse_due_date(&self.due_date)?;
        if due_date < today {
            return Err(FormError::DueDateInPast {
                due: due_date,
                today,
            });
        }
        Ok(TaskRequest {
            title: title.to_string(),
            description: description.to_string(),
            due_date,
        })
    }
}

/// Parse a `YYYY-MM-DD` due date
pub fn parse_due_date(raw: &str) -> Result<NaiveDate, FormError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(FormError::MissingDueDate);
    }
    NaiveDate::parse_from_str(raw, DATE_FORMAT).map_err(|_| FormError::InvalidDueDate(raw.into()))
}

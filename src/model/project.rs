use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// A project as returned by the backend.
///
/// `progress_percentage` is derived server-side from task completion. The
/// client only displays it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub progress_percentage: f64,
    #[serde(default)]
    pub completed_tasks: u32,
    #[serde(default)]
    pub total_tasks: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<NaiveDateTime>,
}

impl Project {
    /// Progress rounded for display, clamped to 0..=100
    pub fn progress_display(&self) -> u8 {
        self.progress_percentage.round().clamp(0.0, 100.0) as u8
    }

    /// Whether every task is done (drives the "complete" bar color)
    pub fn is_complete(&self) -> bool {
        self.progress_percentage >= 100.0
    }

    /// Description, or None when absent or blank
    pub fn description_text(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|d| !d.is_empty())
    }
}

/// One page of `GET /projects`
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPage {
    #[serde(default)]
    pub content: Vec<Project>,
    #[serde(default)]
    pub total_pages: u32,
}

/// Body for `POST /projects` and `PUT /projects/{id}`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProjectRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Query for one page of projects
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectQuery {
    pub search: String,
    pub page: u32,
    pub limit: u32,
}

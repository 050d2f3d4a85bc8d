use chrono::NaiveDate;
use serde::Serialize;

use crate::model::{ClientConfig, Project, Session, Task};
use crate::ops::project_list::ProjectListView;
use crate::ops::task_list::TaskListView;
use crate::util::unicode;

// ---------------------------------------------------------------------------
// JSON output structs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectPageJson<'a> {
    /// One-based, like the text output
    pub page: u32,
    pub total_pages: u32,
    pub search: &'a str,
    pub projects: &'a [Project],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskListJson<'a> {
    pub project: &'a Project,
    pub status: &'static str,
    #[serde(skip_serializing_if = "str::is_empty")]
    pub search: &'a str,
    pub tasks: Vec<&'a Task>,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WhoamiJson<'a> {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<&'a str>,
}

pub fn project_page_json(view: &ProjectListView) -> ProjectPageJson<'_> {
    ProjectPageJson {
        page: view.page() + 1,
        total_pages: view.total_pages,
        search: view.search(),
        projects: &view.projects,
    }
}

pub fn whoami_json(session: Option<&Session>) -> WhoamiJson<'_> {
    WhoamiJson {
        logged_in: session.is_some(),
        email: session.map(|s| s.email.as_str()),
        user_id: session.and_then(|s| s.user_id.as_deref()),
    }
}

// ---------------------------------------------------------------------------
// Text output
// ---------------------------------------------------------------------------

/// Width of the text progress bar
const BAR_WIDTH: usize = 10;

/// `[████░░░░░░]` for a percentage
pub fn progress_bar(project: &Project) -> String {
    let pct = project.progress_display() as usize;
    let filled = (pct * BAR_WIDTH + 50) / 100;
    format!(
        "[{}{}]",
        "\u{2588}".repeat(filled),
        "\u{2591}".repeat(BAR_WIDTH - filled)
    )
}

/// One row of `projects list`
pub fn format_project_line(project: &Project, id_width: usize, title_width: usize) -> String {
    format!(
        "{:<id_w$}  {}  {} {:>3}%  {}/{} tasks",
        project.id,
        unicode::fit_to_width(&project.title, title_width),
        progress_bar(project),
        project.progress_display(),
        project.completed_tasks,
        project.total_tasks,
        id_w = id_width,
    )
}

pub fn format_project_page(view: &ProjectListView) -> String {
    if view.projects.is_empty() {
        return "No projects found.".to_string();
    }
    let id_width = view.projects.iter().map(|p| p.id.len()).max().unwrap_or(0);
    let title_width = view
        .projects
        .iter()
        .map(|p| unicode::display_width(&p.title))
        .max()
        .unwrap_or(0)
        .min(40);
    let mut out: Vec<String> = view
        .projects
        .iter()
        .map(|p| format_project_line(p, id_width, title_width))
        .collect();
    out.push(String::new());
    out.push(view.page_label());
    out.join("\n")
}

pub fn format_project_detail(project: &Project) -> String {
    let mut out = vec![
        format!("{}  {}", project.id, project.title),
        format!(
            "  {}",
            project
                .description_text()
                .unwrap_or("No description provided.")
        ),
        format!(
            "  {} {}%  {} / {} tasks completed",
            progress_bar(project),
            project.progress_display(),
            project.completed_tasks,
            project.total_tasks
        ),
    ];
    if let Some(created) = project.created_at {
        out.push(format!("  created {}", created.format("%Y-%m-%d %H:%M")));
    }
    out.join("\n")
}

/// One row of `tasks list`
pub fn format_task_line(task: &Task, today: NaiveDate) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut line = format!("{} {}  {}", check, task.id, task.title);
    if let Some(due) = task.due_date {
        line.push_str(&format!("  due {}", due.format("%Y-%m-%d")));
        if task.is_overdue(today) {
            line.push_str(" (Overdue)");
        }
    }
    line
}

pub fn format_task_list(view: &TaskListView, today: NaiveDate) -> String {
    let mut out = Vec::new();
    if let Some(project) = &view.project {
        out.push(format_project_detail(project));
        out.push(String::new());
    }
    out.push(format!("Tasks ({})", view.tasks.len()));
    let visible = view.visible_tasks();
    if view.tasks.is_empty() {
        out.push("No tasks yet. Add one above!".to_string());
    } else if visible.is_empty() {
        out.push("No tasks match the current filter.".to_string());
    } else {
        for task in visible {
            out.push(format_task_line(task, today));
            if !task.description.is_empty() {
                out.push(format!("      {}", task.description));
            }
        }
    }
    out.join("\n")
}

pub fn format_whoami(session: Option<&Session>) -> String {
    match session {
        Some(s) => s.email.clone(),
        None => "not logged in".to_string(),
    }
}

pub fn format_config(config: &ClientConfig, path: &str) -> String {
    [
        format!("config file  {}", path),
        format!("base_url     {}", config.api.base_url),
        format!("timeout      {}s", config.api.timeout_secs),
        format!("page_size    {}", config.ui.page_size),
        format!(
            "reconcile    {}",
            match config.ui.reconcile {
                crate::model::Reconcile::Refetch => "refetch",
                crate::model::Reconcile::Apply => "apply",
            }
        ),
        format!("log level    {}", config.log.level),
    ]
    .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Reconcile, StatusFilter};
    use pretty_assertions::assert_eq;

    fn project(id: &str, title: &str, pct: f64, done: u32, total: u32) -> Project {
        Project {
            id: id.into(),
            title: title.into(),
            description: None,
            progress_percentage: pct,
            completed_tasks: done,
            total_tasks: total,
            created_at: None,
        }
    }

    fn task(id: &str, title: &str, completed: bool, due: Option<&str>) -> Task {
        Task {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            due_date: due.map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").unwrap()),
            completed,
            project_id: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    #[test]
    fn progress_bar_fills_by_rounded_percent() {
        assert_eq!(progress_bar(&project("p", "t", 0.0, 0, 0)), "[░░░░░░░░░░]");
        assert_eq!(progress_bar(&project("p", "t", 66.7, 2, 3)), "[███████░░░]");
        assert_eq!(progress_bar(&project("p", "t", 100.0, 1, 1)), "[██████████]");
    }

    #[test]
    fn project_line_aligns_columns() {
        let line = format_project_line(&project("p1", "Web", 50.0, 1, 2), 3, 6);
        assert_eq!(line, "p1   Web     [█████░░░░░]  50%  1/2 tasks");
    }

    #[test]
    fn empty_page_prints_no_projects() {
        let view = ProjectListView::new(6);
        assert_eq!(format_project_page(&view), "No projects found.");
    }

    #[test]
    fn page_includes_label() {
        let mut view = ProjectListView::new(6);
        view.projects = vec![project("p1", "Web", 0.0, 0, 0)];
        view.total_pages = 3;
        let text = format_project_page(&view);
        assert!(text.ends_with("Page 1 of 3"));
    }

    #[test]
    fn task_line_marks_overdue() {
        assert_eq!(
            format_task_line(&task("t1", "Ship", false, Some("2026-10-01")), today()),
            "[ ] t1  Ship  due 2026-10-01 (Overdue)"
        );
        assert_eq!(
            format_task_line(&task("t1", "Ship", true, Some("2026-10-01")), today()),
            "[x] t1  Ship  due 2026-10-01"
        );
        assert_eq!(
            format_task_line(&task("t2", "Plan", false, None), today()),
            "[ ] t2  Plan"
        );
    }

    #[test]
    fn task_list_distinguishes_empty_from_filtered() {
        let mut view = TaskListView::new("p1", Reconcile::Refetch);
        assert!(format_task_list(&view, today()).contains("No tasks yet. Add one above!"));
        view.tasks = vec![task("t1", "Ship", false, None)];
        view.filter.status = StatusFilter::Completed;
        assert!(format_task_list(&view, today()).contains("No tasks match the current filter."));
    }

    #[test]
    fn project_detail_falls_back_to_placeholder() {
        let text = format_project_detail(&project("p1", "Web", 25.0, 1, 4));
        assert!(text.contains("No description provided."));
        assert!(text.contains("25%  1 / 4 tasks completed"));
    }

    #[test]
    fn whoami_json_shape() {
        let json = serde_json::to_string(&whoami_json(None)).unwrap();
        assert_eq!(json, r#"{"loggedIn":false}"#);
    }
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::task_list::{LoadStatus, TaskListView};
use crate::tui::app::App;
use crate::util::unicode;

use super::cards::{NO_DESCRIPTION, progress_bar_spans, task_item_lines};

pub const NO_TASKS: &str = "No tasks yet. Add one above!";
pub const NO_MATCHES: &str = "No tasks match the current filter.";

/// Render the project screen: project summary, filter line, task list
pub fn render_project_view(frame: &mut Frame, app: &App, area: Rect) {
    let Some(view) = &app.tasks else {
        return;
    };
    match view.status {
        LoadStatus::Loading => {
            render_message(frame, app, area, "Loading...");
            return;
        }
        LoadStatus::NotFound => {
            render_message(frame, app, area, "Project not found");
            return;
        }
        LoadStatus::Ready => {}
    }

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4), // title, description, progress, blank
            Constraint::Length(1), // filter line
            Constraint::Min(1),    // tasks
        ])
        .split(area);

    render_summary(frame, app, view, chunks[0]);
    render_filter_line(frame, app, view, chunks[1]);
    render_tasks(frame, app, view, chunks[2]);
}

fn render_message(frame: &mut Frame, app: &App, area: Rect, text: &str) {
    let line = Line::from(Span::styled(
        format!(" {}", text),
        Style::default()
            .fg(app.theme.dim)
            .bg(app.theme.background)
            .add_modifier(Modifier::ITALIC),
    ));
    frame.render_widget(Paragraph::new(vec![Line::from(""), line]), area);
}

fn render_summary(frame: &mut Frame, app: &App, view: &TaskListView, area: Rect) {
    let Some(project) = &view.project else {
        return;
    };
    let bg = app.theme.background;
    let width = area.width.saturating_sub(2) as usize;

    let title = Line::from(Span::styled(
        format!(" {}", unicode::truncate_to_width(&project.title, width)),
        Style::default()
            .fg(app.theme.text_bright)
            .bg(bg)
            .add_modifier(Modifier::BOLD),
    ));
    let description = match project.description_text() {
        Some(d) => Span::styled(
            format!(" {}", unicode::truncate_to_width(d, width)),
            Style::default().fg(app.theme.text).bg(bg),
        ),
        None => Span::styled(
            format!(" {}", NO_DESCRIPTION),
            Style::default()
                .fg(app.theme.dim)
                .bg(bg)
                .add_modifier(Modifier::ITALIC),
        ),
    };

    let counts = format!(
        " {:>3}%  {} / {} tasks completed",
        project.progress_display(),
        project.completed_tasks,
        project.total_tasks
    );
    let bar_w = width.saturating_sub(counts.len()).min(30);
    let mut bar = vec![Span::styled(" ", Style::default().bg(bg))];
    bar.extend(progress_bar_spans(&app.theme, project, bar_w, bg));
    bar.push(Span::styled(counts, Style::default().fg(app.theme.dim).bg(bg)));

    frame.render_widget(
        Paragraph::new(vec![title, Line::from(description), Line::from(bar)])
            .style(Style::default().bg(bg)),
        area,
    );
}

fn render_filter_line(frame: &mut Frame, app: &App, view: &TaskListView, area: Rect) {
    let bg = app.theme.background;
    let dim = Style::default().fg(app.theme.dim).bg(bg);
    let mut spans = vec![
        Span::styled(" show: ", dim),
        Span::styled(
            view.filter.status.label(),
            Style::default().fg(app.theme.highlight).bg(bg),
        ),
    ];
    let query = view.filter.query.trim();
    if !query.is_empty() {
        spans.push(Span::styled("  search: ", dim));
        spans.push(Span::styled(
            query.to_string(),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    let shown = view.visible_tasks().len();
    spans.push(Span::styled(
        format!("  ({} of {})", shown, view.tasks.len()),
        dim,
    ));
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_tasks(frame: &mut Frame, app: &App, view: &TaskListView, area: Rect) {
    let visible = view.visible_tasks();
    if visible.is_empty() {
        let text = if view.tasks.is_empty() {
            NO_TASKS
        } else {
            NO_MATCHES
        };
        render_message(frame, app, area, text);
        return;
    }

    let width = area.width as usize;
    let today = app.today();
    let search_re = app.search_regex();
    let mut lines: Vec<Line> = Vec::new();
    let mut selected_span = (0, 0);
    for (i, task) in visible.iter().enumerate() {
        let selected = i == app.task_cursor;
        let item = task_item_lines(&app.theme, task, today, selected, width, search_re.as_ref());
        if selected {
            selected_span = (lines.len(), lines.len() + item.len());
        }
        lines.extend(item);
    }

    // Scroll so every line of the selected task is on screen
    let height = area.height as usize;
    let scroll = selected_span.1.saturating_sub(height).min(selected_span.0);
    frame.render_widget(
        Paragraph::new(lines)
            .style(Style::default().bg(app.theme.background))
            .scroll((scroll as u16, 0)),
        area,
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::StatusFilter;
    use crate::tui::render::test_helpers::*;
    use crate::api::fake::FakeBackend;
    use tempfile::TempDir;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 20, |frame, area| render_project_view(frame, app, area))
    }

    #[tokio::test]
    async fn summary_and_tasks_are_drawn() {
        let dir = TempDir::new().unwrap();
        let app = app_on_project(website_backend(), "p1", &dir).await;
        let out = draw(&app);
        assert!(out.contains("Website"));
        assert!(out.contains(NO_DESCRIPTION));
        assert!(out.contains("50%  1 / 2 tasks completed"));
        assert!(out.contains("show: all"));
        assert!(out.contains("[ ] Design mockups"));
        assert!(out.contains("[x] Write copy"));
        assert!(out.contains("due 2030-01-01"));
    }

    #[tokio::test]
    async fn filter_with_no_matches_has_its_own_message() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_project(website_backend(), "p1", &dir).await;
        app.tasks.as_mut().unwrap().filter.query = "zzz".into();
        let out = draw(&app);
        assert!(out.contains(NO_MATCHES));
        assert!(out.contains("search: zzz"));
        assert!(out.contains("(0 of 2)"));
    }

    #[tokio::test]
    async fn status_filter_hides_other_tasks() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_project(website_backend(), "p1", &dir).await;
        app.tasks.as_mut().unwrap().filter.status = StatusFilter::Pending;
        let out = draw(&app);
        assert!(out.contains("show: pending"));
        assert!(out.contains("Design mockups"));
        assert!(!out.contains("Write copy"));
    }

    #[tokio::test]
    async fn project_without_tasks_invites_adding_one() {
        let dir = TempDir::new().unwrap();
        let backend = FakeBackend::new().with_project("p1", "Empty");
        let app = app_on_project(backend, "p1", &dir).await;
        assert!(draw(&app).contains(NO_TASKS));
    }

    #[tokio::test]
    async fn unknown_project_shows_not_found() {
        let dir = TempDir::new().unwrap();
        let app = app_on_project(FakeBackend::new(), "nope", &dir).await;
        let out = draw(&app);
        assert!(out.contains("Project not found"));
    }

    #[tokio::test]
    async fn selection_scrolls_into_view() {
        let dir = TempDir::new().unwrap();
        let mut backend = FakeBackend::new().with_project("p1", "Big");
        for i in 0..12 {
            backend = backend.with_task("p1", &format!("t{}", i), &format!("Task {:02}", i), false);
        }
        let mut app = app_on_project(backend, "p1", &dir).await;
        app.task_cursor = 11;
        let out = draw(&app);
        assert!(out.contains("Task 11"));
        assert!(!out.contains("Task 00"));
    }
}

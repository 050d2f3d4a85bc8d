use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use crate::guard::Route;
use crate::ops::project_list::DELETE_PROJECT_PROMPT;
use crate::ops::task_list::DELETE_TASK_PROMPT;
use crate::tui::app::{App, ConfirmAction};
use crate::tui::input::form_labels;
use crate::util::unicode;

pub fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width, height)
}

/// Bordered box with a bold title, cleared underneath
fn render_box(
    frame: &mut Frame,
    app: &App,
    title: &str,
    border: Color,
    lines: Vec<Line>,
    area: Rect,
) {
    let bg = app.theme.background;
    let w: u16 = 56.min(area.width.saturating_sub(2));
    let h = (lines.len() as u16 + 2).min(area.height.saturating_sub(2));
    let popup = centered_rect_fixed(w, h, area);
    frame.render_widget(Clear, popup);

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border).bg(bg))
        .title(Span::styled(
            format!(" {} ", title),
            Style::default()
                .fg(border)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));
    frame.render_widget(
        Paragraph::new(lines).block(block).style(Style::default().bg(bg)),
        popup,
    );
}

fn popup_inner_width(area: Rect) -> usize {
    56.min(area.width.saturating_sub(2)).saturating_sub(4) as usize
}

pub fn render_confirm_popup(frame: &mut Frame, app: &App, area: Rect) {
    let Some(action) = &app.confirm else {
        return;
    };
    let bg = app.theme.background;
    let prompt = match action {
        ConfirmAction::DeleteProject { .. } => DELETE_PROJECT_PROMPT,
        ConfirmAction::DeleteTask { .. } => DELETE_TASK_PROMPT,
    };
    let text_style = Style::default().fg(app.theme.text_bright).bg(bg);
    let mut lines: Vec<Line> = unicode::wrap_words(prompt, popup_inner_width(area))
        .into_iter()
        .map(|l| Line::from(Span::styled(format!(" {}", l), text_style)))
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(" y", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" delete   ", Style::default().fg(app.theme.dim).bg(bg)),
        Span::styled("n", Style::default().fg(app.theme.highlight).bg(bg)),
        Span::styled(" cancel", Style::default().fg(app.theme.dim).bg(bg)),
    ]));
    render_box(frame, app, "Confirm", app.theme.highlight, lines, area);
}

pub fn render_alert_popup(frame: &mut Frame, app: &App, message: &str, area: Rect) {
    let bg = app.theme.background;
    let mut lines: Vec<Line> = unicode::wrap_words(message, popup_inner_width(area))
        .into_iter()
        .map(|l| {
            Line::from(Span::styled(
                format!(" {}", l),
                Style::default().fg(app.theme.text_bright).bg(bg),
            ))
        })
        .collect();
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " press any key",
        Style::default().fg(app.theme.dim).bg(bg),
    )));
    render_box(frame, app, "Error", app.theme.red, lines, area);
}

/// Create/edit form for whichever screen is open
pub fn render_form_popup(frame: &mut Frame, app: &App, area: Rect) {
    let (title, values): (&str, Vec<String>) = match &app.route {
        Route::Dashboard => {
            let Some(form) = &app.dashboard.form else {
                return;
            };
            let title = if form.editing_id.is_some() {
                "Edit project"
            } else {
                "New project"
            };
            (title, vec![form.title.clone(), form.description.clone()])
        }
        Route::Project(_) => {
            let Some(view) = &app.tasks else {
                return;
            };
            let title = if view.editing_id.is_some() {
                "Edit task"
            } else {
                "New task"
            };
            let f = &view.form;
            (
                title,
                vec![f.title.clone(), f.description.clone(), f.due_date.clone()],
            )
        }
        _ => return,
    };

    let bg = app.theme.background;
    let inner_w = popup_inner_width(area);
    let label_style = Style::default().fg(app.theme.dim).bg(bg);
    let mut lines = Vec::new();

    for (i, (label, value)) in form_labels(&app.route).iter().zip(values).enumerate() {
        let focused = i == app.form_field;
        let label = if *label == "Due date" {
            format!(" {} (YYYY-MM-DD)", label)
        } else {
            format!(" {}", label)
        };
        lines.push(Line::from(Span::styled(label, label_style)));
        let (shown, style) = if focused {
            (
                format!("{}\u{258C}", value),
                Style::default()
                    .fg(app.theme.text_bright)
                    .bg(app.theme.selection_bg),
            )
        } else {
            (value, Style::default().fg(app.theme.text).bg(bg))
        };
        lines.push(Line::from(vec![
            Span::styled(" ", Style::default().bg(bg)),
            Span::styled(unicode::fit_to_width(&shown, inner_w), style),
        ]));
    }

    if let Some(error) = &app.form_error {
        lines.push(Line::from(""));
        for l in unicode::wrap_words(error, inner_w) {
            lines.push(Line::from(Span::styled(
                format!(" {}", l),
                Style::default().fg(app.theme.red).bg(bg),
            )));
        }
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        " Enter save  Tab next field  Esc cancel",
        label_style,
    )));

    render_box(frame, app, title, app.theme.highlight, lines, area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::tui::app::Mode;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    #[test]
    fn centered_rect_stays_inside_area() {
        let area = Rect::new(0, 0, 20, 10);
        assert_eq!(centered_rect_fixed(10, 4, area), Rect::new(5, 3, 10, 4));
        assert_eq!(centered_rect_fixed(30, 40, area), area);
    }

    #[tokio::test]
    async fn confirm_shows_delete_prompt() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_project(website_backend(), "p1", &dir).await;
        app.confirm = Some(ConfirmAction::DeleteTask { id: "t1".into() });
        app.mode = Mode::Confirm;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_confirm_popup(frame, &app, area)
        });
        assert!(out.contains(DELETE_TASK_PROMPT));
        assert!(out.contains("y delete"));
    }

    #[tokio::test]
    async fn edit_form_is_prefilled() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_project(website_backend(), "p1", &dir).await;
        app.tasks.as_mut().unwrap().edit("t1");
        app.mode = Mode::Form;
        app.form_error = Some("title is required".into());
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_popup(frame, &app, area)
        });
        assert!(out.contains("Edit task"));
        assert!(out.contains("Design mockups"));
        assert!(out.contains("Design mockups details"));
        assert!(out.contains("2030-01-01"));
        assert!(out.contains("title is required"));
    }

    #[tokio::test]
    async fn new_project_form_has_two_fields() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_dashboard(FakeBackend::new(), &dir).await;
        app.dashboard.open_create_form();
        app.mode = Mode::Form;
        let out = render_to_string(TERM_W, TERM_H, |frame, area| {
            render_form_popup(frame, &app, area)
        });
        assert!(out.contains("New project"));
        assert!(out.contains("Description"));
        assert!(!out.contains("Due date"));
    }
}

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::guard::Route;
use crate::tui::app::App;
use crate::util::unicode;

/// Render the header: app name, where you are, and who is signed in, with
/// a separator line below
pub fn render_header(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1), // title row
            Constraint::Length(1), // separator
        ])
        .split(area);

    render_title_row(frame, app, chunks[0]);

    let sep = Paragraph::new(Line::from(Span::styled(
        "\u{2500}".repeat(area.width as usize),
        Style::default().fg(app.theme.dim).bg(app.theme.background),
    )));
    frame.render_widget(sep, chunks[1]);
}

fn render_title_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let bg_style = Style::default().bg(bg);
    let width = area.width as usize;

    let mut spans = vec![
        Span::styled(" ", bg_style),
        Span::styled(
            "\u{25B6} taskboard",
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ),
    ];

    let crumbs: Vec<String> = match &app.route {
        Route::Dashboard => vec!["Projects".into()],
        Route::Project(id) => {
            let title = app
                .tasks
                .as_ref()
                .and_then(|v| v.project.as_ref())
                .map(|p| p.title.clone())
                .unwrap_or_else(|| id.clone());
            vec!["Projects".into(), title]
        }
        Route::Register => vec!["Register".into()],
        _ => vec!["Log in".into()],
    };
    for crumb in crumbs {
        spans.push(Span::styled(
            " \u{203A} ",
            Style::default().fg(app.theme.dim).bg(bg),
        ));
        spans.push(Span::styled(
            unicode::truncate_to_width(&crumb, 40),
            Style::default().fg(app.theme.text_bright).bg(bg),
        ));
    }

    // Signed-in user and the logout key on the right
    if let Some(session) = app.auth.current_user() {
        let used: usize = spans
            .iter()
            .map(|s| unicode::display_width(&s.content))
            .sum();
        let user = format!("{}  ", session.email);
        let hint = "L log out ";
        let right_w = unicode::display_width(&user) + hint.len();
        if used + right_w + 2 <= width {
            spans.push(Span::styled(" ".repeat(width - used - right_w), bg_style));
            spans.push(Span::styled(
                user,
                Style::default().fg(app.theme.text).bg(bg),
            ));
            spans.push(Span::styled(hint, Style::default().fg(app.theme.dim).bg(bg)));
        }
    }

    frame.render_widget(Paragraph::new(Line::from(spans)).style(bg_style), area);
}

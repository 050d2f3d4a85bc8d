use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::guard::Route;
use crate::tui::app::{App, Mode};
use crate::util::unicode;

const DASHBOARD_HINTS: &str = "\u{21B5} open  n new  e edit  d delete  / search  \u{2190}\u{2192} page  L log out  q quit";
const PROJECT_HINTS: &str = "space toggle  a add  e edit  d delete  f filter  / search  esc back  q quit";

/// Render the status row (bottom of screen)
pub fn render_status_row(frame: &mut Frame, app: &App, area: Rect) {
    let bg = app.theme.background;
    let width = area.width as usize;

    let line = match app.mode {
        Mode::Search => {
            // Search prompt: /pattern▌
            let mut spans = vec![
                Span::styled(
                    format!("/{}", app.search_input),
                    Style::default().fg(app.theme.text_bright).bg(bg),
                ),
                Span::styled("\u{258C}", Style::default().fg(app.theme.highlight).bg(bg)),
            ];
            let hint = match app.route {
                Route::Dashboard => "Enter search  Esc clear",
                _ => "Enter done  Esc clear",
            };
            push_right(&mut spans, hint, width, Style::default().fg(app.theme.dim).bg(bg));
            Line::from(spans)
        }
        _ => {
            if let Some(message) = &app.status_message {
                Line::from(Span::styled(
                    unicode::truncate_to_width(message, width),
                    Style::default().fg(app.theme.highlight).bg(bg),
                ))
            } else if app.config.ui.show_key_hints && app.mode == Mode::Navigate {
                let hints = match app.route {
                    Route::Dashboard => DASHBOARD_HINTS,
                    Route::Project(_) => PROJECT_HINTS,
                    _ => "",
                };
                Line::from(Span::styled(
                    unicode::truncate_to_width(hints, width),
                    Style::default().fg(app.theme.dim).bg(bg),
                ))
            } else {
                Line::from("")
            }
        }
    };

    frame.render_widget(Paragraph::new(line).style(Style::default().bg(bg)), area);
}

/// Right-align `hint` after the spans already in the row, if it fits
fn push_right(spans: &mut Vec<Span<'static>>, hint: &'static str, width: usize, style: Style) {
    let used: usize = spans.iter().map(|s| unicode::display_width(&s.content)).sum();
    let hint_width = unicode::display_width(hint);
    if used + hint_width < width {
        spans.push(Span::styled(" ".repeat(width - used - hint_width), style));
        spans.push(Span::styled(hint, style));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 1, |frame, area| render_status_row(frame, app, area))
    }

    #[tokio::test]
    async fn search_prompt_shows_typed_text() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_dashboard(website_backend(), &dir).await;
        app.mode = Mode::Search;
        app.search_input = "web".into();
        let out = draw(&app);
        assert!(out.starts_with("/web\u{258C}"));
        assert!(out.ends_with("Enter search  Esc clear"));
    }

    #[tokio::test]
    async fn message_replaces_hints() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_project(website_backend(), "p1", &dir).await;
        assert!(draw(&app).contains("space toggle"));
        app.status_message = Some("Showing pending tasks".into());
        let out = draw(&app);
        assert!(out.contains("Showing pending tasks"));
        assert!(!out.contains("space toggle"));
    }

    #[tokio::test]
    async fn hints_can_be_turned_off() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_dashboard(website_backend(), &dir).await;
        app.config.ui.show_key_hints = false;
        assert_eq!(draw(&app), "");
    }
}

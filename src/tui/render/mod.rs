pub mod cards;
pub mod dashboard;
pub mod header;
pub mod login;
pub mod popups;
pub mod project_view;
pub mod status_row;

#[cfg(test)]
pub mod test_helpers;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout};
use ratatui::style::Style;
use ratatui::text::Span;
use ratatui::widgets::Block;
use regex::Regex;

use super::app::{App, Mode};
use crate::guard::Route;

/// Main render function: dispatches to sub-renderers
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Background fill
    let bg_style = Style::default().bg(app.theme.background);
    frame.render_widget(Block::default().style(bg_style), area);

    // Layout: header (2 rows) | content | status row (1 row)
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // title + separator
            Constraint::Min(1),    // content area
            Constraint::Length(1), // status row
        ])
        .split(area);

    header::render_header(frame, app, chunks[0]);

    match &app.route {
        Route::Dashboard => dashboard::render_dashboard(frame, app, chunks[1]),
        Route::Project(_) => project_view::render_project_view(frame, app, chunks[1]),
        _ => login::render_login(frame, app, chunks[1]),
    }

    // Popups (rendered on top of everything)
    if app.mode == Mode::Form && !app.route.is_public() {
        popups::render_form_popup(frame, app, area);
    }
    if app.mode == Mode::Confirm {
        popups::render_confirm_popup(frame, app, area);
    }
    if let Some(message) = &app.alert {
        popups::render_alert_popup(frame, app, message, area);
    }

    status_row::render_status_row(frame, app, chunks[2]);
}

/// Push spans for text with regex match highlighting. If no regex or no matches,
/// pushes a single span with `base_style`. Otherwise splits text at match boundaries.
pub(super) fn push_highlighted_spans<'a>(
    spans: &mut Vec<Span<'a>>,
    text: &str,
    base_style: Style,
    highlight_style: Style,
    search_re: Option<&Regex>,
) {
    let re = match search_re {
        Some(r) => r,
        None => {
            spans.push(Span::styled(text.to_string(), base_style));
            return;
        }
    };

    let mut last_end = 0;
    for m in re.find_iter(text) {
        if m.start() > last_end {
            spans.push(Span::styled(
                text[last_end..m.start()].to_string(),
                base_style,
            ));
        }
        spans.push(Span::styled(
            text[m.start()..m.end()].to_string(),
            highlight_style,
        ));
        last_end = m.end();
    }
    if last_end < text.len() || text.is_empty() {
        spans.push(Span::styled(text[last_end..].to_string(), base_style));
    }
}

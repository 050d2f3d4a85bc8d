use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::ops::project_list::ListDisplay;
use crate::tui::app::App;

use super::cards::{CARD_HEIGHT, render_project_card};

/// Two columns of cards once the terminal is at least this wide
const TWO_COLUMN_WIDTH: u16 = 80;

pub fn columns_for(width: u16) -> usize {
    if width >= TWO_COLUMN_WIDTH { 2 } else { 1 }
}

/// Render the project grid with the page footer below it
pub fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(area);
    let bg = app.theme.background;

    match app.dashboard.display() {
        ListDisplay::Loading => {
            render_message(frame, app, chunks[0], "Loading projects...");
            return;
        }
        ListDisplay::Empty => render_message(frame, app, chunks[0], "No projects found."),
        ListDisplay::Grid => render_grid(frame, app, chunks[0]),
    }

    let mut spans = Vec::new();
    if app.dashboard.total_pages > 0 {
        spans.push(Span::styled(
            format!(" {}", app.dashboard.page_label()),
            Style::default().fg(app.theme.dim).bg(bg),
        ));
    }
    let search = app.dashboard.search().trim();
    if !search.is_empty() {
        spans.push(Span::styled(
            format!("  search: {}", search),
            Style::default().fg(app.theme.highlight).bg(bg),
        ));
    }
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().bg(bg)),
        chunks[1],
    );
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

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let projects = &app.dashboard.projects;
    let cols = columns_for(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let cursor_row = app.dashboard_cursor / cols;
    // Scroll just far enough to keep the selected card on screen
    let first_row = (cursor_row + 1).saturating_sub(visible_rows);
    let card_w = area.width / cols as u16;
    let search_re = app.search_regex();

    for (i, project) in projects.iter().enumerate().skip(first_row * cols) {
        let row = i / cols - first_row;
        if row >= visible_rows {
            break;
        }
        let col = (i % cols) as u16;
        let y = area.y + row as u16 * CARD_HEIGHT;
        let height = CARD_HEIGHT.min(area.y + area.height - y);
        let card = Rect::new(area.x + col * card_w, y, card_w, height);
        render_project_card(
            frame,
            &app.theme,
            card,
            project,
            i == app.dashboard_cursor,
            search_re.as_ref(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    fn draw(app: &App, width: u16) -> String {
        render_to_string(width, 20, |frame, area| render_dashboard(frame, app, area))
    }

    #[test]
    fn column_count_follows_width() {
        assert_eq!(columns_for(79), 1);
        assert_eq!(columns_for(80), 2);
        assert_eq!(columns_for(140), 2);
    }

    #[tokio::test]
    async fn cards_and_page_label_are_drawn() {
        let dir = TempDir::new().unwrap();
        let app = app_on_dashboard(website_backend().with_project("p2", "Mobile app"), &dir).await;
        let out = draw(&app, TERM_W);
        assert!(out.contains("Website"));
        assert!(out.contains("Mobile app"));
        assert!(out.contains("1 / 2 tasks completed"));
        assert!(out.contains("Page 1 of 1"));
    }

    #[tokio::test]
    async fn wide_terminal_puts_two_cards_side_by_side() {
        let dir = TempDir::new().unwrap();
        let app = app_on_dashboard(website_backend().with_project("p2", "Mobile app"), &dir).await;
        let out = draw(&app, TERM_W);
        let title_row = out.lines().find(|l| l.contains("Website")).unwrap();
        assert!(title_row.contains("Mobile app"));

        let narrow = draw(&app, 60);
        let title_row = narrow.lines().find(|l| l.contains("Website")).unwrap();
        assert!(!title_row.contains("Mobile app"));
    }

    #[tokio::test]
    async fn empty_result_says_so() {
        let dir = TempDir::new().unwrap();
        let mut app = app_on_dashboard(FakeBackend::new(), &dir).await;
        app.dashboard.set_search("zzz");
        let out = draw(&app, TERM_W);
        assert!(out.contains("No projects found."));
        assert!(out.contains("search: zzz"));
    }

    #[test]
    fn loading_state_hides_the_grid() {
        let dir = TempDir::new().unwrap();
        let app = app_with(FakeBackend::new(), true, &dir);
        let out = draw(&app, TERM_W);
        assert!(out.contains("Loading projects..."));
        assert!(!out.contains("Page"));
    }
}

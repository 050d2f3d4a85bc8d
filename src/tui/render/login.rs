use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::tui::app::{App, LoginField};
use crate::util::unicode;

use super::popups::centered_rect_fixed;

/// Render the login/register form centered in `area`
pub fn render_login(frame: &mut Frame, app: &App, area: Rect) {
    let form = &app.login;
    let bg = app.theme.background;
    let w: u16 = 50.min(area.width.saturating_sub(2));
    let field_w = w.saturating_sub(4) as usize;
    let label_style = Style::default().fg(app.theme.dim).bg(bg);

    let field_line = |value: String, focused: bool| -> Line<'static> {
        let style = if focused {
            Style::default()
                .fg(app.theme.text_bright)
                .bg(app.theme.selection_bg)
        } else {
            Style::default().fg(app.theme.text).bg(bg)
        };
        let shown = if focused {
            format!("{}\u{258C}", value)
        } else {
            value
        };
        Line::from(Span::styled(
            unicode::fit_to_width(&shown, field_w),
            style,
        ))
    };

    let mut lines = vec![
        Line::from(Span::styled("Email", label_style)),
        field_line(form.email.clone(), form.field == LoginField::Email),
        Line::from(""),
        Line::from(Span::styled("Password", label_style)),
        field_line(
            "\u{2022}".repeat(form.password.chars().count()),
            form.field == LoginField::Password,
        ),
        Line::from(""),
    ];

    if let Some(error) = &form.error {
        for l in unicode::wrap_words(error, field_w) {
            lines.push(Line::from(Span::styled(
                l,
                Style::default().fg(app.theme.red).bg(bg),
            )));
        }
    } else if let Some(notice) = &form.notice {
        for l in unicode::wrap_words(notice, field_w) {
            lines.push(Line::from(Span::styled(
                l,
                Style::default().fg(app.theme.green).bg(bg),
            )));
        }
    }

    let switch_hint = if form.register {
        "Ctrl-R back to log in"
    } else {
        "Ctrl-R create an account"
    };
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        format!("Enter submit  Tab next  {}", switch_hint),
        label_style,
    )));

    let title = if form.register { " Register " } else { " Log in " };
    let h = (lines.len() as u16 + 2).min(area.height);
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(app.theme.highlight).bg(bg))
        .title(Span::styled(
            title,
            Style::default()
                .fg(app.theme.highlight)
                .bg(bg)
                .add_modifier(Modifier::BOLD),
        ))
        .style(Style::default().bg(bg));

    let paragraph = Paragraph::new(lines)
        .block(block)
        .style(Style::default().bg(bg));
    frame.render_widget(paragraph, centered_rect_fixed(w, h, area));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::FakeBackend;
    use crate::guard::Route;
    use crate::tui::render::test_helpers::*;
    use tempfile::TempDir;

    fn draw(app: &App) -> String {
        render_to_string(TERM_W, 20, |frame, area| render_login(frame, app, area))
    }

    #[test]
    fn password_is_masked() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(FakeBackend::new(), false, &dir);
        app.navigate(Route::Root);
        app.login.email = "ana@x.io".into();
        app.login.password = "hunter2".into();
        let out = draw(&app);
        assert!(out.contains("ana@x.io"));
        assert!(!out.contains("hunter2"));
        assert!(out.contains("\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}\u{2022}"));
    }

    #[test]
    fn register_mode_and_error_are_shown() {
        let dir = TempDir::new().unwrap();
        let mut app = app_with(FakeBackend::new(), false, &dir);
        app.navigate(Route::Register);
        app.login.error = Some("Email already in use".into());
        let out = draw(&app);
        assert!(out.contains("Register"));
        assert!(out.contains("Email already in use"));
        assert!(out.contains("back to log in"));
    }
}

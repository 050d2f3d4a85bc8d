use chrono::NaiveDate;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::TestBackend;
use ratatui::layout::Rect;
use tempfile::TempDir;

use crate::api::fake::FakeBackend;
use crate::auth::AuthState;
use crate::guard::Route;
use crate::io::session_store::SessionStore;
use crate::model::{ClientConfig, Session};
use crate::tui::app::App;

pub const TERM_W: u16 = 80;
pub const TERM_H: u16 = 24;

/// Render into an in-memory buffer and return plain text (no styles).
pub fn render_to_string<F>(w: u16, h: u16, f: F) -> String
where
    F: FnOnce(&mut ratatui::Frame, Rect),
{
    let backend = TestBackend::new(w, h);
    let mut terminal = Terminal::new(backend).unwrap();
    terminal
        .draw(|frame| {
            let area = frame.area();
            f(frame, area);
        })
        .unwrap();

    let buf = terminal.backend().buffer().clone();
    let w = buf.area.width as usize;
    let lines: Vec<String> = buf
        .content
        .chunks(w)
        .map(|row| {
            let s: String = row.iter().map(|cell| cell.symbol()).collect();
            s.trim_end().to_string()
        })
        .collect();

    // Trim trailing blank lines
    let end = lines
        .iter()
        .rposition(|l| !l.is_empty())
        .map_or(0, |i| i + 1);
    lines[..end].join("\n")
}

/// Build an App over a fake backend, with the session file in `dir`.
/// "Today" is pinned to 2026-10-19.
pub fn app_with(backend: FakeBackend, logged_in: bool, dir: &TempDir) -> App {
    let store = SessionStore::new(dir.path().join("session.json"));
    if logged_in {
        store
            .write(&Session {
                access_token: "t".into(),
                token_type: "Bearer".into(),
                user_id: None,
                email: "ana@example.com".into(),
            })
            .unwrap();
    }
    let mut app = App::new(
        ClientConfig::default(),
        AuthState::load(store),
        Box::new(backend),
    );
    app.today_override = NaiveDate::from_ymd_opt(2026, 10, 19);
    app
}

/// Logged-in App on the dashboard with the first page fetched
pub async fn app_on_dashboard(backend: FakeBackend, dir: &TempDir) -> App {
    let mut app = app_with(backend, true, dir);
    if let Some(effect) = app.navigate(Route::Dashboard) {
        app.run_effect(effect).await;
    }
    app
}

/// Logged-in App on a project screen with project and tasks fetched
pub async fn app_on_project(backend: FakeBackend, project_id: &str, dir: &TempDir) -> App {
    let mut app = app_with(backend, true, dir);
    if let Some(effect) = app.navigate(Route::Project(project_id.into())) {
        app.run_effect(effect).await;
    }
    app
}

/// Website project with one pending and one completed task
pub fn website_backend() -> FakeBackend {
    FakeBackend::new()
        .with_project("p1", "Website")
        .with_task("p1", "t1", "Design mockups", false)
        .with_task("p1", "t2", "Write copy", true)
}

pub fn press(code: KeyCode) -> KeyEvent {
    KeyEvent::new(code, KeyModifiers::NONE)
}

pub fn ch(c: char) -> KeyEvent {
    press(KeyCode::Char(c))
}

pub fn ctrl(c: char) -> KeyEvent {
    KeyEvent::new(KeyCode::Char(c), KeyModifiers::CONTROL)
}

/// Feed each character of `text` as a key press
pub fn type_text(app: &mut App, text: &str) {
    for c in text.chars() {
        let effect = crate::tui::input::handle_key(app, ch(c));
        assert_eq!(effect, None, "typing {:?} should not trigger work", c);
    }
}

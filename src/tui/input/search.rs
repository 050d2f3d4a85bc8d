use crossterm::event::{KeyCode, KeyEvent};

use crate::guard::Route;
use crate::tui::app::{App, Effect, Mode};
use crate::util::unicode;

use super::typed_char;

/// Dashboard search runs on the server when submitted. Task search is a
/// local filter and follows each keystroke.
pub(super) fn handle_search(app: &mut App, key: KeyEvent) -> Option<Effect> {
    let live = matches!(app.route, Route::Project(_));
    match key.code {
        KeyCode::Esc => {
            app.mode = Mode::Navigate;
            app.search_input.clear();
            if live && let Some(view) = app.tasks.as_mut() {
                view.filter.query.clear();
            }
            None
        }
        KeyCode::Enter => {
            app.mode = Mode::Navigate;
            if live {
                return None;
            }
            app.dashboard.set_search(app.search_input.trim());
            app.dashboard.loading = true;
            app.dashboard_cursor = 0;
            Some(Effect::LoadProjects)
        }
        KeyCode::Backspace => {
            unicode::pop_grapheme(&mut app.search_input);
            apply_live(app, live);
            None
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                app.search_input.push(c);
                apply_live(app, live);
            }
            None
        }
    }
}

fn apply_live(app: &mut App, live: bool) {
    if !live {
        return;
    }
    if let Some(view) = app.tasks.as_mut() {
        view.filter.query = app.search_input.clone();
    }
    app.task_cursor = 0;
}

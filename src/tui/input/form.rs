use crossterm::event::{KeyCode, KeyEvent};

use crate::guard::Route;
use crate::tui::app::{App, Effect, Mode};
use crate::util::unicode;

use super::typed_char;

/// Labels of the fields in the open form, in focus order
pub fn form_labels(route: &Route) -> &'static [&'static str] {
    match route {
        Route::Project(_) => &["Title", "Description", "Due date"],
        _ => &["Title", "Description"],
    }
}

/// The text of the focused form field
fn focused_field(app: &mut App) -> Option<&mut String> {
    let index = app.form_field;
    match app.route {
        Route::Dashboard => {
            let form = app.dashboard.form.as_mut()?;
            match index {
                0 => Some(&mut form.title),
                _ => Some(&mut form.description),
            }
        }
        Route::Project(_) => {
            let form = &mut app.tasks.as_mut()?.form;
            match index {
                0 => Some(&mut form.title),
                1 => Some(&mut form.description),
                _ => Some(&mut form.due_date),
            }
        }
        _ => None,
    }
}

fn close_form(app: &mut App) {
    match app.route {
        Route::Dashboard => app.dashboard.close_form(),
        Route::Project(_) => {
            if let Some(view) = app.tasks.as_mut() {
                view.cancel_edit();
            }
        }
        _ => {}
    }
    app.form_error = None;
    app.mode = Mode::Navigate;
}

pub(super) fn handle_form(app: &mut App, key: KeyEvent) -> Option<Effect> {
    let count = form_labels(&app.route).len();
    match key.code {
        KeyCode::Esc => {
            close_form(app);
            None
        }
        KeyCode::Tab | KeyCode::Down => {
            app.form_field = (app.form_field + 1) % count;
            None
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_field = (app.form_field + count - 1) % count;
            None
        }
        KeyCode::Enter => {
            app.form_error = None;
            match app.route {
                Route::Dashboard => Some(Effect::SubmitProjectForm),
                Route::Project(_) => Some(Effect::SaveTask),
                _ => None,
            }
        }
        KeyCode::Backspace => {
            if let Some(field) = focused_field(app) {
                unicode::pop_grapheme(field);
            }
            None
        }
        _ => {
            if let Some(c) = typed_char(&key)
                && let Some(field) = focused_field(app)
            {
                field.push(c);
            }
            None
        }
    }
}

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::guard::Route;
use crate::tui::app::{App, Effect, LoginField};
use crate::util::unicode;

use super::typed_char;

pub(super) fn handle_login(app: &mut App, key: KeyEvent) -> Option<Effect> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('r') {
        let target = if app.login.register {
            Route::Login
        } else {
            Route::Register
        };
        app.login.error = None;
        app.login.notice = None;
        return app.navigate(target);
    }

    match key.code {
        KeyCode::Esc => {
            app.should_quit = true;
            None
        }
        KeyCode::Tab | KeyCode::BackTab | KeyCode::Up | KeyCode::Down => {
            app.login.field = match app.login.field {
                LoginField::Email => LoginField::Password,
                LoginField::Password => LoginField::Email,
            };
            None
        }
        KeyCode::Enter => submit(app),
        KeyCode::Backspace => {
            unicode::pop_grapheme(app.login.focused_mut());
            None
        }
        _ => {
            if let Some(c) = typed_char(&key) {
                app.login.focused_mut().push(c);
            }
            None
        }
    }
}

fn submit(app: &mut App) -> Option<Effect> {
    if app.login.email.trim().is_empty() || app.login.password.is_empty() {
        app.login.error = Some("Email and password are required".into());
        return None;
    }
    app.login.error = None;
    app.login.notice = None;
    if app.login.register {
        Some(Effect::Register)
    } else {
        Some(Effect::Login)
    }
}

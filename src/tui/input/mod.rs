mod confirm;
mod form;
mod login;
mod navigate;
mod search;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use super::app::{App, Effect, Mode};

use confirm::handle_confirm;
use form::handle_form;
use login::handle_login;
use navigate::handle_navigate;
use search::handle_search;

pub use form::form_labels;

/// Handle a key event. Returns work for the event loop to run after the
/// next redraw; handlers themselves never touch the network or disk.
pub fn handle_key(app: &mut App, key: KeyEvent) -> Option<Effect> {
    // Ignore bare modifier key presses (Shift, Ctrl, Alt, etc.)
    if matches!(key.code, KeyCode::Modifier(_)) {
        return None;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return None;
    }

    // An alert swallows the key that dismisses it
    if app.alert.take().is_some() {
        return None;
    }
    app.status_message = None;

    if app.route.is_public() {
        return handle_login(app, key);
    }
    match app.mode {
        Mode::Navigate => handle_navigate(app, key),
        Mode::Search => handle_search(app, key),
        Mode::Form => handle_form(app, key),
        Mode::Confirm => handle_confirm(app, key),
    }
}

/// A printable character typed without Ctrl/Alt
fn typed_char(key: &KeyEvent) -> Option<char> {
    match key.code {
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            Some(c)
        }
        _ => None,
    }
}

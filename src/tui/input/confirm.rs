use crossterm::event::{KeyCode, KeyEvent};

use crate::tui::app::{App, ConfirmAction, Effect, Mode};

pub(super) fn handle_confirm(app: &mut App, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.mode = Mode::Navigate;
            match app.confirm.take()? {
                ConfirmAction::DeleteProject { id } => Some(Effect::DeleteProject(id)),
                ConfirmAction::DeleteTask { id } => Some(Effect::DeleteTask(id)),
            }
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.confirm = None;
            app.mode = Mode::Navigate;
            None
        }
        _ => None,
    }
}

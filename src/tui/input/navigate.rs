use crossterm::event::{KeyCode, KeyEvent};

use crate::guard::Route;
use crate::tui::app::{App, ConfirmAction, Effect, Mode};

pub(super) fn handle_navigate(app: &mut App, key: KeyEvent) -> Option<Effect> {
    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.should_quit = true;
            return None;
        }
        KeyCode::Char('L') => return Some(Effect::Logout),
        _ => {}
    }

    match app.route {
        Route::Dashboard => handle_dashboard(app, key),
        Route::Project(_) => handle_project(app, key),
        _ => None,
    }
}

fn open_form(app: &mut App) {
    app.mode = Mode::Form;
    app.form_field = 0;
    app.form_error = None;
}

fn handle_dashboard(app: &mut App, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => {
            let count = app.dashboard.projects.len();
            if app.dashboard_cursor + 1 < count {
                app.dashboard_cursor += 1;
            }
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.dashboard_cursor = app.dashboard_cursor.saturating_sub(1);
            None
        }
        KeyCode::Right | KeyCode::Char('l') => {
            if !app.dashboard.next_page() {
                return None;
            }
            app.dashboard.loading = true;
            app.dashboard_cursor = 0;
            Some(Effect::LoadProjects)
        }
        KeyCode::Left | KeyCode::Char('h') => {
            if !app.dashboard.prev_page() {
                return None;
            }
            app.dashboard.loading = true;
            app.dashboard_cursor = 0;
            Some(Effect::LoadProjects)
        }
        KeyCode::Enter => {
            let id = app.selected_project_id()?;
            app.navigate(Route::Project(id))
        }
        KeyCode::Char('/') => {
            app.search_input = app.dashboard.search().to_string();
            app.mode = Mode::Search;
            None
        }
        KeyCode::Char('n') => {
            app.dashboard.open_create_form();
            open_form(app);
            None
        }
        KeyCode::Char('e') => {
            let id = app.selected_project_id()?;
            if app.dashboard.open_edit_form(&id) {
                open_form(app);
            }
            None
        }
        KeyCode::Char('d') => {
            let id = app.selected_project_id()?;
            app.confirm = Some(ConfirmAction::DeleteProject { id });
            app.mode = Mode::Confirm;
            None
        }
        KeyCode::Char('r') => {
            app.dashboard.loading = true;
            Some(Effect::LoadProjects)
        }
        _ => None,
    }
}

fn handle_project(app: &mut App, key: KeyEvent) -> Option<Effect> {
    match key.code {
        KeyCode::Esc | KeyCode::Backspace => app.navigate(Route::Dashboard),
        KeyCode::Down | KeyCode::Char('j') => {
            let count = app
                .tasks
                .as_ref()
                .map(|v| v.visible_tasks().len())
                .unwrap_or(0);
            if app.task_cursor + 1 < count {
                app.task_cursor += 1;
            }
            None
        }
        KeyCode::Up | KeyCode::Char('k') => {
            app.task_cursor = app.task_cursor.saturating_sub(1);
            None
        }
        KeyCode::Char(' ') | KeyCode::Char('x') => {
            let id = app.selected_task_id()?;
            let pending = app.tasks.as_mut()?.begin_toggle(&id)?;
            // The task may leave the filtered list
            app.clamp_cursors();
            Some(Effect::FinishToggle(pending))
        }
        KeyCode::Char('a') => {
            app.tasks.as_mut()?.open_create_form();
            open_form(app);
            None
        }
        KeyCode::Char('e') => {
            let id = app.selected_task_id()?;
            if app.tasks.as_mut()?.edit(&id) {
                open_form(app);
            }
            None
        }
        KeyCode::Char('d') => {
            let id = app.selected_task_id()?;
            app.confirm = Some(ConfirmAction::DeleteTask { id });
            app.mode = Mode::Confirm;
            None
        }
        KeyCode::Char('f') => {
            let view = app.tasks.as_mut()?;
            view.filter.status = view.filter.status.cycle();
            app.status_message = Some(format!("showing {}", view.filter.status.label()));
            app.task_cursor = 0;
            None
        }
        KeyCode::Char('/') => {
            app.search_input = app
                .tasks
                .as_ref()
                .map(|v| v.filter.query.clone())
                .unwrap_or_default();
            app.mode = Mode::Search;
            None
        }
        KeyCode::Char('r') => Some(Effect::LoadTasks),
        _ => None,
    }
}

use std::io;
use std::path::PathBuf;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use regex::Regex;

use crate::api::{ApiClient, Backend};
use crate::auth::{AuthState, LoginError};
use crate::guard::{self, Access, Route};
use crate::io::session_store::SessionStore;
use crate::io::{config_io, logging, paths};
use crate::model::{ClientConfig, Credentials};
use crate::ops::project_list::ProjectListView;
use crate::ops::task_list::{PendingToggle, TaskListView};
use crate::ops::{Outcome, Prompt};

use super::input;
use super::render;
use super::theme::Theme;

/// Current interaction mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Navigate,
    /// Typing a search term into the status row
    Search,
    /// A create/edit form popup has focus
    Form,
    /// Waiting for y/n on `App::confirm`
    Confirm,
}

/// Which login field has focus
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Email,
    Password,
}

/// State of the login/register screen
#[derive(Debug, Clone, Default)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
    pub field: LoginField,
    /// Register instead of log in
    pub register: bool,
    pub error: Option<String>,
    /// Informational line, e.g. after registering
    pub notice: Option<String>,
}

impl LoginForm {
    pub fn focused_mut(&mut self) -> &mut String {
        match self.field {
            LoginField::Email => &mut self.email,
            LoginField::Password => &mut self.password,
        }
    }
}

/// A destructive action waiting for confirmation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfirmAction {
    DeleteProject { id: String },
    DeleteTask { id: String },
}

/// Work a key handler asks the event loop to do. Effects run after the
/// next redraw, so any local state change made by the handler is visible
/// while the request is in flight.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Login,
    Register,
    Logout,
    LoadProjects,
    LoadTasks,
    SubmitProjectForm,
    /// Already confirmed
    DeleteProject(String),
    SaveTask,
    FinishToggle(PendingToggle),
    /// Already confirmed
    DeleteTask(String),
}

/// Prompt for effects: confirmations already happened in `Mode::Confirm`,
/// alerts are collected for the popup.
#[derive(Default)]
struct AlertCollector {
    alerts: Vec<String>,
}

impl Prompt for AlertCollector {
    fn confirm(&mut self, _message: &str) -> bool {
        true
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Main application state
pub struct App {
    pub auth: AuthState,
    pub backend: Box<dyn Backend>,
    pub route: Route,
    pub mode: Mode,
    pub should_quit: bool,
    pub theme: Theme,
    pub config: ClientConfig,

    pub login: LoginForm,
    pub dashboard: ProjectListView,
    pub dashboard_cursor: usize,
    /// Present while a project screen is open
    pub tasks: Option<TaskListView>,
    pub task_cursor: usize,

    /// Text being typed in Search mode
    pub search_input: String,
    /// Focused field index in the open form popup
    pub form_field: usize,
    /// Validation problem shown inside the form popup
    pub form_error: Option<String>,
    pub confirm: Option<ConfirmAction>,
    /// Modal notice; any key dismisses it
    pub alert: Option<String>,
    /// One-line message in the status row, cleared on the next key
    pub status_message: Option<String>,
    /// Effect queued by the last key press
    pub pending: Option<Effect>,
    /// Fixed "today" for due date checks; None means the local date
    pub today_override: Option<NaiveDate>,
}

impl App {
    pub fn new(config: ClientConfig, auth: AuthState, backend: Box<dyn Backend>) -> Self {
        App {
            theme: Theme::from_config(&config.ui),
            dashboard: ProjectListView::new(config.ui.page_size),
            config,
            auth,
            backend,
            route: Route::Login,
            mode: Mode::Navigate,
            should_quit: false,
            login: LoginForm::default(),
            dashboard_cursor: 0,
            tasks: None,
            task_cursor: 0,
            search_input: String::new(),
            form_field: 0,
            form_error: None,
            confirm: None,
            alert: None,
            status_message: None,
            pending: None,
            today_override: None,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.today_override
            .unwrap_or_else(|| Local::now().date_naive())
    }

    /// Go to a screen through the route guard. Returns the fetch the new
    /// screen needs, if any.
    pub fn navigate(&mut self, route: Route) -> Option<Effect> {
        let target = match guard::guard(route, &self.auth) {
            Access::Render(r) => r,
            Access::Redirect(r) => {
                tracing::debug!(to = ?r, "redirected");
                r
            }
        };
        self.mode = Mode::Navigate;
        self.route = target.clone();
        match target {
            Route::Login => {
                self.login.register = false;
                None
            }
            Route::Register => {
                self.login.register = true;
                None
            }
            Route::Dashboard => {
                self.tasks = None;
                self.dashboard.loading = true;
                Some(Effect::LoadProjects)
            }
            Route::Project(id) => {
                self.tasks = Some(TaskListView::new(&id, self.config.ui.reconcile));
                self.task_cursor = 0;
                Some(Effect::LoadTasks)
            }
            // guard() resolves Root
            Route::Root => None,
        }
    }

    /// Case-insensitive matcher for the active search term
    pub fn search_regex(&self) -> Option<Regex> {
        let term = match &self.route {
            Route::Project(_) => self.tasks.as_ref().map(|v| v.filter.query.as_str())?,
            Route::Dashboard => self.dashboard.search(),
            _ => return None,
        };
        if term.trim().is_empty() {
            return None;
        }
        Regex::new(&format!("(?i){}", regex::escape(term.trim()))).ok()
    }

    /// ID of the project card under the cursor
    pub fn selected_project_id(&self) -> Option<String> {
        self.dashboard
            .projects
            .get(self.dashboard_cursor)
            .map(|p| p.id.clone())
    }

    /// ID of the visible task under the cursor
    pub fn selected_task_id(&self) -> Option<String> {
        let view = self.tasks.as_ref()?;
        view.visible_tasks()
            .get(self.task_cursor)
            .map(|t| t.id.clone())
    }

    /// Keep cursors inside their lists after the lists change
    pub fn clamp_cursors(&mut self) {
        let projects = self.dashboard.projects.len();
        self.dashboard_cursor = self.dashboard_cursor.min(projects.saturating_sub(1));
        let tasks = self
            .tasks
            .as_ref()
            .map(|v| v.visible_tasks().len())
            .unwrap_or(0);
        self.task_cursor = self.task_cursor.min(tasks.saturating_sub(1));
    }

    /// Run one effect to completion
    pub async fn run_effect(&mut self, effect: Effect) {
        tracing::debug!(?effect, "running effect");
        let mut prompt = AlertCollector::default();
        match effect {
            Effect::Login => self.run_login().await,
            Effect::Register => self.run_register().await,
            Effect::Logout => {
                if let Err(e) = self.auth.logout() {
                    tracing::warn!(error = %e, "failed to remove session file");
                }
                self.backend.set_session(None);
                self.login = LoginForm::default();
                self.dashboard = ProjectListView::new(self.config.ui.page_size);
                self.pending = self.navigate(Route::Login);
            }
            Effect::LoadProjects => {
                self.dashboard.load(self.backend.as_ref()).await;
                if self.dashboard.load_failed {
                    self.status_message = Some("Failed to fetch projects".into());
                }
            }
            Effect::LoadTasks => {
                if let Some(view) = self.tasks.as_mut() {
                    view.load(self.backend.as_ref()).await;
                }
            }
            Effect::SubmitProjectForm => {
                let outcome = self
                    .dashboard
                    .submit_form(self.backend.as_ref(), &mut prompt)
                    .await;
                self.after_form(outcome);
            }
            Effect::DeleteProject(id) => {
                self.dashboard
                    .delete(self.backend.as_ref(), &mut prompt, &id)
                    .await;
            }
            Effect::SaveTask => {
                let today = self.today();
                if let Some(view) = self.tasks.as_mut() {
                    let outcome = view.save(self.backend.as_ref(), &mut prompt, today).await;
                    self.after_form(outcome);
                }
            }
            Effect::FinishToggle(pending) => {
                if let Some(view) = self.tasks.as_mut() {
                    view.finish_toggle(self.backend.as_ref(), &mut prompt, pending)
                        .await;
                }
            }
            Effect::DeleteTask(id) => {
                if let Some(view) = self.tasks.as_mut() {
                    view.delete(self.backend.as_ref(), &mut prompt, &id).await;
                }
            }
        }
        if let Some(message) = prompt.alerts.pop() {
            self.alert = Some(message);
        }
        self.clamp_cursors();
    }

    fn after_form(&mut self, outcome: Outcome) {
        match outcome {
            Outcome::Done => {
                self.mode = Mode::Navigate;
                self.form_error = None;
            }
            Outcome::Invalid(e) => self.form_error = Some(e.to_string()),
            // Form stays open so the input is not lost
            Outcome::Failed | Outcome::Declined => {}
        }
    }

    async fn run_login(&mut self) {
        let creds = Credentials {
            email: self.login.email.trim().to_string(),
            password: self.login.password.clone(),
        };
        match self.auth.login(self.backend.as_ref(), &creds).await {
            Ok(session) => {
                self.backend.set_session(Some(session));
                self.login = LoginForm::default();
                self.pending = self.navigate(Route::Dashboard);
            }
            Err(LoginError::Request(e)) => {
                self.login.error = Some(e.user_message("Login failed"));
            }
            Err(e) => self.login.error = Some(e.to_string()),
        }
    }

    async fn run_register(&mut self) {
        let creds = Credentials {
            email: self.login.email.trim().to_string(),
            password: self.login.password.clone(),
        };
        match self.auth.register(self.backend.as_ref(), &creds).await {
            Ok(()) => {
                self.login.password.clear();
                self.login.error = None;
                self.login.notice = Some("Account created. Log in to continue.".into());
                self.navigate(Route::Login);
            }
            Err(e) => self.login.error = Some(e.user_message("Registration failed")),
        }
    }
}

// ---------------------------------------------------------------------------
// Entry point
// ---------------------------------------------------------------------------

/// Launch the TUI
pub fn run(
    config_path: Option<PathBuf>,
    api_url: Option<&str>,
) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = config_path.unwrap_or_else(paths::default_config_path);
    let mut config = config_io::read_config(&config_path)?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }

    let log_path = config
        .log
        .file
        .as_ref()
        .map(PathBuf::from)
        .unwrap_or_else(paths::default_log_path);
    logging::init_file(&config.log.level, &log_path);
    tracing::info!(base_url = %config.api.base_url, "starting tui");

    let auth = AuthState::load(SessionStore::new(paths::default_session_path()));
    let client = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?
    .with_session(auth.current_user().cloned());

    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    let mut app = App::new(config, auth, Box::new(client));
    app.pending = app.navigate(Route::Root);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    // Install panic hook to restore terminal on panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let result = run_event_loop(&mut terminal, &mut app, &rt);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    rt: &tokio::runtime::Runtime,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| render::render(frame, app))?;

        // The frame above already shows the handler's local changes
        if let Some(effect) = app.pending.take() {
            rt.block_on(app.run_effect(effect));
            continue;
        }

        if app.should_quit {
            break;
        }

        if event::poll(Duration::from_millis(250))?
            && let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            app.pending = input::handle_key(app, key);
        }
    }
    Ok(())
}

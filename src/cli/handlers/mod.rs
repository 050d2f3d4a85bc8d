use std::io::{self, BufRead, Write};
use std::path::Path;
use std::time::Duration;

use chrono::Local;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal;
use crossterm::tty::IsTty;

use crate::api::{ApiClient, Backend, RequestError};
use crate::auth::AuthState;
use crate::cli::commands::*;
use crate::cli::output::*;
use crate::guard::{self, Access, Route};
use crate::io::session_store::SessionStore;
use crate::io::{config_io, logging, paths};
use crate::model::{ClientConfig, Credentials, StatusFilter};
use crate::ops::form::ProjectForm;
use crate::ops::project_list::ProjectListView;
use crate::ops::task_list::{LoadStatus, TaskListView};
use crate::ops::{Outcome, Prompt};
use crate::util::unicode;

type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Everything a command needs: settings, who is signed in, and a client
/// carrying that session
struct Context {
    config: ClientConfig,
    auth: AuthState,
    client: ApiClient,
    json: bool,
}

// ---------------------------------------------------------------------------
// Dispatch
// ---------------------------------------------------------------------------

pub fn dispatch(cli: Cli) -> CmdResult {
    let config_path = cli.config.clone().unwrap_or_else(paths::default_config_path);
    let Some(command) = cli.command else {
        return Err("no command given (try `tb --help`)".into());
    };

    // Config commands work without a backend or a session
    if let Commands::Config(args) = command {
        return match args.action {
            ConfigAction::Show => cmd_config_show(&config_path, cli.api_url.as_deref(), cli.json),
            ConfigAction::SetUrl(a) => cmd_config_set_url(&config_path, &a.url),
        };
    }

    let ctx = load_context(&config_path, cli.api_url.as_deref(), cli.json)?;
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;

    rt.block_on(async move {
        let mut ctx = ctx;
        match command {
            Commands::Login(args) => cmd_login(&mut ctx, args).await,
            Commands::Register(args) => cmd_register(&ctx, args).await,
            Commands::Logout => cmd_logout(&mut ctx),
            Commands::Whoami => cmd_whoami(&ctx),
            Commands::Projects(args) => {
                require_login(&ctx, Route::Dashboard)?;
                match args.action {
                    ProjectsAction::List(a) => cmd_projects_list(&ctx, a).await,
                    ProjectsAction::Show(a) => cmd_projects_show(&ctx, a).await,
                    ProjectsAction::Create(a) => cmd_projects_create(&ctx, a).await,
                    ProjectsAction::Edit(a) => cmd_projects_edit(&ctx, a).await,
                    ProjectsAction::Delete(a) => cmd_projects_delete(&ctx, a).await,
                }
            }
            Commands::Tasks(args) => match args.action {
                TasksAction::List(a) => {
                    require_login(&ctx, Route::Project(a.project.clone()))?;
                    cmd_tasks_list(&ctx, a).await
                }
                TasksAction::Add(a) => {
                    require_login(&ctx, Route::Project(a.project.clone()))?;
                    cmd_tasks_add(&ctx, a).await
                }
                TasksAction::Edit(a) => {
                    require_login(&ctx, Route::Project(a.project.clone()))?;
                    cmd_tasks_edit(&ctx, a).await
                }
                TasksAction::Toggle(a) => {
                    require_login(&ctx, Route::Project(a.project.clone()))?;
                    cmd_tasks_toggle(&ctx, a).await
                }
                TasksAction::Delete(a) => {
                    require_login(&ctx, Route::Project(a.project.clone()))?;
                    cmd_tasks_delete(&ctx, a).await
                }
            },
            Commands::Config(_) => Ok(()),
        }
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn load_config(
    path: &Path,
    api_url: Option<&str>,
) -> Result<ClientConfig, Box<dyn std::error::Error>> {
    let mut config = config_io::read_config(path)?;
    if let Some(url) = api_url {
        config.api.base_url = url.to_string();
    }
    Ok(config)
}

fn load_context(
    config_path: &Path,
    api_url: Option<&str>,
    json: bool,
) -> Result<Context, Box<dyn std::error::Error>> {
    let config = load_config(config_path, api_url)?;
    logging::init_stderr(&config.log.level);

    let auth = AuthState::load(SessionStore::new(paths::default_session_path()));
    let client = ApiClient::new(
        &config.api.base_url,
        Duration::from_secs(config.api.timeout_secs),
    )?
    .with_session(auth.current_user().cloned());

    Ok(Context {
        config,
        auth,
        client,
        json,
    })
}

/// The same guard the TUI navigates through
fn require_login(ctx: &Context, route: Route) -> CmdResult {
    match guard::guard(route, &ctx.auth) {
        Access::Render(_) => Ok(()),
        Access::Redirect(_) => Err("not logged in: run `tb login` first".into()),
    }
}

/// What to tell the user when fetching one resource fails
fn fetch_error(err: &RequestError, what: &str, id: &str) -> String {
    if err.is_not_found() {
        format!("{} not found: {}", what, id)
    } else if err.is_unauthorized() {
        "session expired or rejected: run `tb login` again".to_string()
    } else {
        err.user_message(&format!("failed to fetch {}", what))
    }
}

/// Confirms on stdin; collects alerts so the handler can report them
struct CliPrompt {
    assume_yes: bool,
    alerts: Vec<String>,
}

impl CliPrompt {
    fn new(assume_yes: bool) -> Self {
        CliPrompt {
            assume_yes,
            alerts: Vec::new(),
        }
    }
}

impl Prompt for CliPrompt {
    fn confirm(&mut self, message: &str) -> bool {
        if self.assume_yes {
            return true;
        }
        eprint!("{} [y/N] ", message);
        let _ = io::stderr().flush();
        let mut answer = String::new();
        if io::stdin().lock().read_line(&mut answer).is_err() {
            return false;
        }
        matches!(answer.trim().to_lowercase().as_str(), "y" | "yes")
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }
}

/// Turn a view outcome into the command's result. Returns whether the
/// mutation actually happened.
fn finish(outcome: Outcome, prompt: &mut CliPrompt) -> Result<bool, Box<dyn std::error::Error>> {
    match outcome {
        Outcome::Done => Ok(true),
        Outcome::Declined => {
            eprintln!("cancelled");
            Ok(false)
        }
        Outcome::Invalid(e) => Err(e.into()),
        Outcome::Failed => Err(prompt
            .alerts
            .pop()
            .unwrap_or_else(|| "request failed".to_string())
            .into()),
    }
}

fn read_line(label: &str) -> io::Result<String> {
    eprint!("{}: ", label);
    io::stderr().flush()?;
    let mut line = String::new();
    io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}

/// What a key press means while typing a hidden password
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PasswordKey {
    Continue,
    Submit,
    Cancel,
}

fn password_key(password: &mut String, key: KeyEvent) -> PasswordKey {
    match key.code {
        KeyCode::Enter => PasswordKey::Submit,
        KeyCode::Esc => PasswordKey::Cancel,
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            PasswordKey::Cancel
        }
        KeyCode::Backspace => {
            unicode::pop_grapheme(password);
            PasswordKey::Continue
        }
        KeyCode::Char(c)
            if !key
                .modifiers
                .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
        {
            password.push(c);
            PasswordKey::Continue
        }
        _ => PasswordKey::Continue,
    }
}

/// Read a password without echoing it. Piped input is read as a plain line.
fn read_password(label: &str) -> io::Result<String> {
    if !io::stdin().is_tty() {
        return read_line(label);
    }
    eprint!("{}: ", label);
    io::stderr().flush()?;

    terminal::enable_raw_mode()?;
    let typed = read_hidden();
    let restored = terminal::disable_raw_mode();
    eprintln!();

    let typed = typed?;
    restored?;
    typed.ok_or_else(|| io::Error::new(io::ErrorKind::Interrupted, "password entry cancelled"))
}

fn read_hidden() -> io::Result<Option<String>> {
    let mut password = String::new();
    loop {
        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
        {
            match password_key(&mut password, key) {
                PasswordKey::Submit => return Ok(Some(password)),
                PasswordKey::Cancel => return Ok(None),
                PasswordKey::Continue => {}
            }
        }
    }
}

fn credentials(args: LoginArgs) -> io::Result<Credentials> {
    let email = match args.email {
        Some(e) => e,
        None => read_line("email")?,
    };
    let password = match args.password {
        Some(p) => p,
        None => read_password("password")?,
    };
    Ok(Credentials { email, password })
}

fn backend(ctx: &Context) -> &dyn Backend {
    &ctx.client
}

// ---------------------------------------------------------------------------
// Auth commands
// ---------------------------------------------------------------------------

async fn cmd_login(ctx: &mut Context, args: LoginArgs) -> CmdResult {
    let creds = credentials(args)?;
    let session = ctx.auth.login(&ctx.client, &creds).await?;
    println!("logged in as {}", session.email);
    Ok(())
}

async fn cmd_register(ctx: &Context, args: LoginArgs) -> CmdResult {
    let creds = credentials(args)?;
    ctx.auth.register(&ctx.client, &creds).await?;
    println!("registered {}; run `tb login` to sign in", creds.email);
    Ok(())
}

fn cmd_logout(ctx: &mut Context) -> CmdResult {
    let was_logged_in = ctx.auth.is_logged_in();
    ctx.auth.logout()?;
    if was_logged_in {
        println!("logged out");
    } else {
        println!("not logged in");
    }
    Ok(())
}

fn cmd_whoami(ctx: &Context) -> CmdResult {
    let session = ctx.auth.current_user();
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&whoami_json(session))?);
    } else {
        println!("{}", format_whoami(session));
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Project commands
// ---------------------------------------------------------------------------

async fn cmd_projects_list(ctx: &Context, args: ProjectListArgs) -> CmdResult {
    if args.page == 0 {
        return Err("--page starts at 1".into());
    }
    let mut view = ProjectListView::new(ctx.config.ui.page_size);
    view.set_search(&args.search);
    view.set_page(args.page - 1);
    view.load(backend(ctx)).await;
    if view.load_failed {
        return Err("failed to fetch projects".into());
    }

    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&project_page_json(&view))?);
    } else {
        println!("{}", format_project_page(&view));
    }
    Ok(())
}

async fn cmd_projects_show(ctx: &Context, args: ProjectIdArgs) -> CmdResult {
    let project = ctx
        .client
        .get_project(&args.id)
        .await
        .map_err(|e| fetch_error(&e, "project", &args.id))?;
    if ctx.json {
        println!("{}", serde_json::to_string_pretty(&project)?);
    } else {
        println!("{}", format_project_detail(&project));
    }
    Ok(())
}

async fn cmd_projects_create(ctx: &Context, args: ProjectCreateArgs) -> CmdResult {
    let mut view = ProjectListView::new(ctx.config.ui.page_size);
    view.form = Some(ProjectForm {
        title: args.title.clone(),
        description: args.description.unwrap_or_default(),
        editing_id: None,
    });
    let mut prompt = CliPrompt::new(true);
    if finish(view.create(backend(ctx), &mut prompt).await, &mut prompt)? {
        println!("created project '{}'", args.title.trim());
    }
    Ok(())
}

async fn cmd_projects_edit(ctx: &Context, args: ProjectEditArgs) -> CmdResult {
    let project = ctx
        .client
        .get_project(&args.id)
        .await
        .map_err(|e| fetch_error(&e, "project", &args.id))?;

    let mut form = ProjectForm::for_project(&project);
    if let Some(title) = args.title {
        form.title = title;
    }
    if let Some(description) = args.description {
        form.description = description;
    }

    let mut view = ProjectListView::new(ctx.config.ui.page_size);
    view.form = Some(form);
    let mut prompt = CliPrompt::new(true);
    if finish(view.update(backend(ctx), &mut prompt, &args.id).await, &mut prompt)? {
        println!("updated project {}", args.id);
    }
    Ok(())
}

async fn cmd_projects_delete(ctx: &Context, args: ProjectDeleteArgs) -> CmdResult {
    let mut view = ProjectListView::new(ctx.config.ui.page_size);
    let mut prompt = CliPrompt::new(args.yes);
    if finish(view.delete(backend(ctx), &mut prompt, &args.id).await, &mut prompt)? {
        println!("deleted project {}", args.id);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Task commands
// ---------------------------------------------------------------------------

/// Load a project's task view, failing if the project cannot be fetched
async fn load_tasks(
    ctx: &Context,
    project_id: &str,
) -> Result<TaskListView, Box<dyn std::error::Error>> {
    let mut view = TaskListView::new(project_id, ctx.config.ui.reconcile);
    view.load(backend(ctx)).await;
    if view.status == LoadStatus::NotFound {
        return Err(format!("project not found: {}", project_id).into());
    }
    Ok(view)
}

async fn cmd_tasks_list(ctx: &Context, args: TaskListArgs) -> CmdResult {
    let status = StatusFilter::parse(&args.status).ok_or_else(|| {
        format!(
            "unknown status '{}' (expected all, pending or completed)",
            args.status
        )
    })?;
    let mut view = load_tasks(ctx, &args.project).await?;
    view.filter.status = status;
    view.filter.query = args.search.clone();
    let today = Local::now().date_naive();

    if ctx.json {
        let Some(project) = view.project.as_ref() else {
            return Err(format!("project not found: {}", args.project).into());
        };
        let output = TaskListJson {
            project,
            status: status.label(),
            search: &args.search,
            tasks: view.visible_tasks(),
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    } else {
        println!("{}", format_task_list(&view, today));
    }
    Ok(())
}

async fn cmd_tasks_add(ctx: &Context, args: TaskAddArgs) -> CmdResult {
    let mut view = TaskListView::new(&args.project, ctx.config.ui.reconcile);
    view.open_create_form();
    view.form.title = args.title.clone();
    view.form.description = args.description;
    view.form.due_date = args.due;

    let mut prompt = CliPrompt::new(true);
    let today = Local::now().date_naive();
    if finish(view.save(backend(ctx), &mut prompt, today).await, &mut prompt)? {
        println!("added task '{}'", args.title.trim());
    }
    Ok(())
}

async fn cmd_tasks_edit(ctx: &Context, args: TaskEditArgs) -> CmdResult {
    let mut view = load_tasks(ctx, &args.project).await?;
    if !view.edit(&args.task) {
        return Err(format!("task not found: {}", args.task).into());
    }
    if let Some(title) = args.title {
        view.form.title = title;
    }
    if let Some(description) = args.description {
        view.form.description = description;
    }
    if let Some(due) = args.due {
        view.form.due_date = due;
    }

    let mut prompt = CliPrompt::new(true);
    let today = Local::now().date_naive();
    if finish(view.save(backend(ctx), &mut prompt, today).await, &mut prompt)? {
        println!("updated task {}", args.task);
    }
    Ok(())
}

async fn cmd_tasks_toggle(ctx: &Context, args: TaskRefArgs) -> CmdResult {
    let mut view = load_tasks(ctx, &args.project).await?;
    if view.find(&args.task).is_none() {
        return Err(format!("task not found: {}", args.task).into());
    }
    let mut prompt = CliPrompt::new(true);
    let outcome = view
        .toggle_complete(backend(ctx), &mut prompt, &args.task)
        .await;
    finish(outcome, &mut prompt)?;

    if let Some(task) = view.find(&args.task) {
        println!("{}", format_task_line(task, Local::now().date_naive()));
    }
    Ok(())
}

async fn cmd_tasks_delete(ctx: &Context, args: TaskDeleteArgs) -> CmdResult {
    let mut view = TaskListView::new(&args.project, ctx.config.ui.reconcile);
    let mut prompt = CliPrompt::new(args.yes);
    if finish(view.delete(backend(ctx), &mut prompt, &args.task).await, &mut prompt)? {
        println!("deleted task {}", args.task);
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Config commands
// ---------------------------------------------------------------------------

fn cmd_config_show(path: &Path, api_url: Option<&str>, json: bool) -> CmdResult {
    let config = load_config(path, api_url)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&config)?);
    } else {
        println!("{}", format_config(&config, &path.display().to_string()));
    }
    Ok(())
}

fn cmd_config_set_url(path: &Path, url: &str) -> CmdResult {
    // Reject anything the client could not use
    reqwest::Url::parse(url).map_err(|e| format!("invalid URL '{}': {}", url, e))?;

    let mut doc = config_io::read_config_doc(path)?;
    config_io::set_base_url(&mut doc, url);
    config_io::write_config(path, &doc)?;
    println!("base_url = {}", url);
    Ok(())
}

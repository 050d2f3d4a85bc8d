use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

#[derive(Parser)]
#[command(name = "tb", about = concat!("taskboard v", env!("CARGO_PKG_VERSION"), " - projects and tasks from the terminal"), version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output as JSON
    #[arg(long, global = true)]
    pub json: bool,

    /// Use a different config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL (overrides the config file)
    #[arg(long = "api-url", global = true, env = "TASKBOARD_API_URL")]
    pub api_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Sign in and remember the session
    Login(LoginArgs),
    /// Create an account
    Register(LoginArgs),
    /// Forget the stored session
    Logout,
    /// Show who is signed in
    Whoami,
    /// List and manage projects
    Projects(ProjectsCmd),
    /// List and manage the tasks of a project
    Tasks(TasksCmd),
    /// Show or change client settings
    Config(ConfigCmd),
}

// ---------------------------------------------------------------------------
// Auth args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct LoginArgs {
    /// Account email (prompted if omitted)
    #[arg(long)]
    pub email: Option<String>,
    /// Account password (prompted if omitted)
    #[arg(long, env = "TASKBOARD_PASSWORD", hide_env_values = true)]
    pub password: Option<String>,
}

// ---------------------------------------------------------------------------
// Project args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ProjectsCmd {
    #[command(subcommand)]
    pub action: ProjectsAction,
}

#[derive(Subcommand)]
pub enum ProjectsAction {
    /// List one page of projects
    List(ProjectListArgs),
    /// Show one project
    Show(ProjectIdArgs),
    /// Create a project
    Create(ProjectCreateArgs),
    /// Change a project's title or description
    Edit(ProjectEditArgs),
    /// Delete a project and its tasks
    Delete(ProjectDeleteArgs),
}

#[derive(Args)]
pub struct ProjectListArgs {
    /// Only projects whose title contains this text
    #[arg(long, default_value = "")]
    pub search: String,
    /// Page number, starting at 1
    #[arg(long, default_value = "1")]
    pub page: u32,
}

#[derive(Args)]
pub struct ProjectIdArgs {
    /// Project ID
    pub id: String,
}

#[derive(Args)]
pub struct ProjectCreateArgs {
    /// Project title
    pub title: String,
    /// Optional description
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ProjectEditArgs {
    /// Project ID
    pub id: String,
    /// New title (default: keep)
    #[arg(long)]
    pub title: Option<String>,
    /// New description (default: keep)
    #[arg(long)]
    pub description: Option<String>,
}

#[derive(Args)]
pub struct ProjectDeleteArgs {
    /// Project ID
    pub id: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Task args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct TasksCmd {
    #[command(subcommand)]
    pub action: TasksAction,
}

#[derive(Subcommand)]
pub enum TasksAction {
    /// List a project's tasks
    List(TaskListArgs),
    /// Add a task to a project
    Add(TaskAddArgs),
    /// Replace a task's title, description and due date
    Edit(TaskEditArgs),
    /// Flip a task between complete and incomplete
    Toggle(TaskRefArgs),
    /// Delete a task
    Delete(TaskDeleteArgs),
}

#[derive(Args)]
pub struct TaskListArgs {
    /// Project ID
    pub project: String,
    /// Filter by status (all, pending, completed)
    #[arg(long, default_value = "all")]
    pub status: String,
    /// Only tasks whose title contains this text
    #[arg(long, default_value = "")]
    pub search: String,
}

#[derive(Args)]
pub struct TaskAddArgs {
    /// Project ID
    pub project: String,
    /// Task title
    pub title: String,
    /// Task description
    #[arg(long)]
    pub description: String,
    /// Due date (YYYY-MM-DD, today or later)
    #[arg(long)]
    pub due: String,
}

#[derive(Args)]
pub struct TaskEditArgs {
    /// Project ID
    pub project: String,
    /// Task ID
    pub task: String,
    /// New title (default: keep)
    #[arg(long)]
    pub title: Option<String>,
    /// New description (default: keep)
    #[arg(long)]
    pub description: Option<String>,
    /// New due date (default: keep)
    #[arg(long)]
    pub due: Option<String>,
}

#[derive(Args)]
pub struct TaskRefArgs {
    /// Project ID
    pub project: String,
    /// Task ID
    pub task: String,
}

#[derive(Args)]
pub struct TaskDeleteArgs {
    /// Project ID
    pub project: String,
    /// Task ID
    pub task: String,
    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ---------------------------------------------------------------------------
// Config args
// ---------------------------------------------------------------------------

#[derive(Args)]
pub struct ConfigCmd {
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Print the effective settings
    Show,
    /// Store the backend base URL in the config file
    SetUrl(SetUrlArgs),
}

#[derive(Args)]
pub struct SetUrlArgs {
    /// Base URL, e.g. http://localhost:8080/api
    pub url: String,
}

use chrono::NaiveDate;

use crate::api::Backend;
use crate::model::{Project, Reconcile, StatusFilter, Task};

use super::form::TaskForm;
use super::{Outcome, Prompt};

pub const DELETE_TASK_PROMPT: &str = "Delete this task?";

/// Load status of the project screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadStatus {
    Loading,
    Ready,
    /// The project or its tasks could not be fetched
    NotFound,
}

/// A completion flip applied locally and not yet sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingToggle {
    pub task_id: String,
    /// State requested from the server
    pub completed: bool,
}

/// In-memory filter over the fetched task list. Never causes a request.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilter {
    pub status: StatusFilter,
    /// Case-insensitive substring of the title
    pub query: String,
}

impl TaskFilter {
    pub fn matches(&self, task: &Task) -> bool {
        if !self.status.matches(task) {
            return false;
        }
        let query = self.query.trim();
        query.is_empty() || task.title.to_lowercase().contains(&query.to_lowercase())
    }

    pub fn is_active(&self) -> bool {
        self.status != StatusFilter::All || !self.query.trim().is_empty()
    }
}

/// State behind the project screen: the project header plus its full,
/// unpaginated task list.
#[derive(Debug, Clone)]
pub struct TaskListView {
    pub project_id: String,
    pub project: Option<Project>,
    pub tasks: Vec<Task>,
    pub status: LoadStatus,
    pub filter: TaskFilter,
    pub form: TaskForm,
    pub show_form: bool,
    /// Task being edited; None means the form creates
    pub editing_id: Option<String>,
    reconcile: Reconcile,
}

impl TaskListView {
    pub fn new(project_id: &str, reconcile: Reconcile) -> Self {
        TaskListView {
            project_id: project_id.to_string(),
            project: None,
            tasks: Vec::new(),
            status: LoadStatus::Loading,
            filter: TaskFilter::default(),
            form: TaskForm::default(),
            show_form: false,
            editing_id: None,
            reconcile,
        }
    }

    pub fn find(&self, task_id: &str) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == task_id)
    }

    /// Tasks passing the current status filter and title search
    pub fn visible_tasks(&self) -> Vec<&Task> {
        self.tasks.iter().filter(|t| self.filter.matches(t)).collect()
    }

    /// Fetch project and tasks together; state changes only if both succeed.
    ///
    /// A failed first load shows "not found". A failed reload after a
    /// mutation keeps what is already on screen.
    pub async fn load(&mut self, backend: &dyn Backend) {
        let fetched = tokio::try_join!(
            backend.get_project(&self.project_id),
            backend.list_tasks(&self.project_id)
        );
        match fetched {
            Ok((project, tasks)) => {
                self.project = Some(project);
                self.tasks = tasks;
                self.status = LoadStatus::Ready;
            }
            Err(e) => {
                tracing::error!(error = %e, project = %self.project_id, "failed to fetch project");
                if self.project.is_none() {
                    self.status = LoadStatus::NotFound;
                }
            }
        }
    }

    /// Refresh only the project header (progress counters)
    async fn load_project(&mut self, backend: &dyn Backend) {
        match backend.get_project(&self.project_id).await {
            Ok(project) => self.project = Some(project),
            Err(e) => tracing::warn!(error = %e, project = %self.project_id, "failed to refresh project"),
        }
    }

    pub fn open_create_form(&mut self) {
        self.form = TaskForm::default();
        self.editing_id = None;
        self.show_form = true;
    }

    /// Fill the form from an existing task; false if the task is unknown
    pub fn edit(&mut self, task_id: &str) -> bool {
        let Some(task) = self.find(task_id) else {
            return false;
        };
        self.form = TaskForm::for_task(task);
        self.editing_id = Some(task_id.to_string());
        self.show_form = true;
        true
    }

    /// Back to an empty create form, hidden
    pub fn cancel_edit(&mut self) {
        self.form = TaskForm::default();
        self.editing_id = None;
        self.show_form = false;
    }

    /// Create or fully replace a task from the form.
    ///
    /// Validation (including "due date not before `today`") happens first and
    /// sends nothing on failure.
    pub async fn save(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        today: NaiveDate,
    ) -> Outcome {
        let request = match self.form.validate(today) {
            Ok(r) => r,
            Err(e) => return Outcome::Invalid(e),
        };

        let (result, fallback) = match &self.editing_id {
            Some(id) => (
                backend.update_task(id, &request).await,
                "Failed to update task",
            ),
            None => (
                backend.create_task(&self.project_id, &request).await,
                "Failed to create task",
            ),
        };

        match result {
            Ok(task) => {
                tracing::info!(id = %task.id, title = %task.title, "task saved");
                self.cancel_edit();
                self.load(backend).await;
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(error = %e, project = %self.project_id, "save task failed");
                prompt.alert(&e.user_message(fallback));
                Outcome::Failed
            }
        }
    }

    /// Flip a task's completion locally so the UI shows it right away
    pub fn begin_toggle(&mut self, task_id: &str) -> Option<PendingToggle> {
        let task = self.tasks.iter_mut().find(|t| t.id == task_id)?;
        task.completed = !task.completed;
        Some(PendingToggle {
            task_id: task_id.to_string(),
            completed: task.completed,
        })
    }

    /// Send a pending flip and reconcile with the server
    pub async fn finish_toggle(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        pending: PendingToggle,
    ) -> Outcome {
        let result = backend
            .set_task_completed(&pending.task_id, pending.completed)
            .await;

        match (result, self.reconcile) {
            (Ok(task), Reconcile::Apply) => {
                if let Some(local) = self.tasks.iter_mut().find(|t| t.id == task.id) {
                    *local = task;
                }
                self.load_project(backend).await;
                Outcome::Done
            }
            (Ok(_), Reconcile::Refetch) => {
                self.load(backend).await;
                Outcome::Done
            }
            (Err(e), _) => {
                tracing::warn!(error = %e, task = %pending.task_id, "toggle failed");
                self.load(backend).await;
                prompt.alert("Failed to update task status");
                Outcome::Failed
            }
        }
    }

    /// Optimistic toggle followed by reconciliation
    pub async fn toggle_complete(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        task_id: &str,
    ) -> Outcome {
        match self.begin_toggle(task_id) {
            Some(pending) => self.finish_toggle(backend, prompt, pending).await,
            None => Outcome::Failed,
        }
    }

    /// Delete after confirmation. Declining sends nothing and changes nothing.
    pub async fn delete(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        task_id: &str,
    ) -> Outcome {
        if !prompt.confirm(DELETE_TASK_PROMPT) {
            return Outcome::Declined;
        }
        match backend.delete_task(task_id).await {
            Ok(()) => {
                tracing::info!(task = task_id, "task deleted");
                if self.editing_id.as_deref() == Some(task_id) {
                    self.cancel_edit();
                }
                self.load(backend).await;
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(error = %e, task = task_id, "delete task failed");
                prompt.alert("Failed to delete task");
                Outcome::Failed
            }
        }
    }
}

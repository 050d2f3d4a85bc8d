//! In-memory backend for tests.
//!
//! Mirrors the server's observable behavior closely enough for the views:
//! search and paging on projects, server-derived progress, completion
//! endpoints returning the updated task. Every call is recorded as
//! `"VERB /path"` so tests can assert on network traffic.

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::NaiveDate;

use super::{Backend, RequestError};
use crate::model::{
    Credentials, Project, ProjectPage, ProjectQuery, ProjectRequest, Session, Task, TaskRequest,
};

pub const PASSWORD: &str = "secret";

#[derive(Default)]
struct FakeState {
    projects: Vec<Project>,
    tasks: Vec<Task>,
    calls: Vec<String>,
    failures: HashMap<&'static str, (u16, String)>,
    next_id: u32,
    session: Option<Session>,
}

#[derive(Default)]
pub struct FakeBackend {
    state: Mutex<FakeState>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_project(self, id: &str, title: &str) -> Self {
        self.state.lock().unwrap().projects.push(Project {
            id: id.to_string(),
            title: title.to_string(),
            description: None,
            progress_percentage: 0.0,
            completed_tasks: 0,
            total_tasks: 0,
            created_at: None,
        });
        self
    }

    pub fn with_task(self, project_id: &str, id: &str, title: &str, completed: bool) -> Self {
        self.state.lock().unwrap().tasks.push(Task {
            id: id.to_string(),
            title: title.to_string(),
            description: format!("{} details", title),
            due_date: NaiveDate::from_ymd_opt(2030, 1, 1),
            completed,
            project_id: Some(project_id.to_string()),
        });
        self
    }

    /// Make the named operation (e.g. `"create_task"`) fail with this response
    pub fn fail(&self, op: &'static str, status: u16, body: &str) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(op, (status, body.to_string()));
    }

    pub fn heal(&self, op: &'static str) {
        self.state.lock().unwrap().failures.remove(op);
    }

    /// Email of the session last handed to `set_session`
    pub fn session_email(&self) -> Option<String> {
        self.state
            .lock()
            .unwrap()
            .session
            .as_ref()
            .map(|s| s.email.clone())
    }

    pub fn calls(&self) -> Vec<String> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn clear_calls(&self) {
        self.state.lock().unwrap().calls.clear();
    }

    pub fn task(&self, id: &str) -> Option<Task> {
        self.state
            .lock()
            .unwrap()
            .tasks
            .iter()
            .find(|t| t.id == id)
            .cloned()
    }

    pub fn project_count(&self) -> usize {
        self.state.lock().unwrap().projects.len()
    }

    fn begin(&self, op: &'static str, call: String) -> Result<std::sync::MutexGuard<'_, FakeState>, RequestError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(call);
        if let Some((status, body)) = state.failures.get(op) {
            return Err(RequestError::from_body(*status, body));
        }
        Ok(state)
    }
}

impl FakeState {
    fn next_id(&mut self, prefix: &str) -> String {
        self.next_id += 1;
        format!("{}-new-{}", prefix, self.next_id)
    }

    fn project_with_progress(&self, project: &Project) -> Project {
        let tasks: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project.id.as_str()))
            .collect();
        let total = tasks.len() as u32;
        let done = tasks.iter().filter(|t| t.completed).count() as u32;
        let mut p = project.clone();
        p.total_tasks = total;
        p.completed_tasks = done;
        p.progress_percentage = if total == 0 {
            0.0
        } else {
            done as f64 * 100.0 / total as f64
        };
        p
    }

    fn find_project(&self, id: &str) -> Result<Project, RequestError> {
        self.projects
            .iter()
            .find(|p| p.id == id)
            .map(|p| self.project_with_progress(p))
            .ok_or_else(|| RequestError::from_body(404, r#"{"message":"Project not found"}"#))
    }

    fn task_mut(&mut self, id: &str) -> Result<&mut Task, RequestError> {
        self.tasks
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| RequestError::from_body(404, r#"{"message":"Task not found"}"#))
    }
}

#[async_trait]
impl Backend for FakeBackend {
    fn set_session(&mut self, session: Option<Session>) {
        if let Ok(state) = self.state.get_mut() {
            state.session = session;
        }
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, RequestError> {
        let _state = self.begin("login", "POST /auth/login".into())?;
        if credentials.password != PASSWORD {
            return Err(RequestError::from_body(
                401,
                r#"{"message":"Bad credentials"}"#,
            ));
        }
        Ok(Session {
            access_token: format!("token-{}", credentials.email),
            token_type: "Bearer".into(),
            user_id: Some("u-1".into()),
            email: credentials.email.clone(),
        })
    }

    async fn register(&self, _credentials: &Credentials) -> Result<(), RequestError> {
        self.begin("register", "POST /auth/register".into())?;
        Ok(())
    }

    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, RequestError> {
        let state = self.begin(
            "list_projects",
            format!(
                "GET /projects?search={}&page={}&limit={}",
                query.search, query.page, query.limit
            ),
        )?;
        let needle = query.search.to_lowercase();
        let matching: Vec<Project> = state
            .projects
            .iter()
            .filter(|p| p.title.to_lowercase().contains(&needle))
            .map(|p| state.project_with_progress(p))
            .collect();
        let limit = query.limit.max(1) as usize;
        let total_pages = matching.len().div_ceil(limit) as u32;
        let content = matching
            .into_iter()
            .skip(query.page as usize * limit)
            .take(limit)
            .collect();
        Ok(ProjectPage {
            content,
            total_pages,
        })
    }

    async fn get_project(&self, id: &str) -> Result<Project, RequestError> {
        let state = self.begin("get_project", format!("GET /projects/{}", id))?;
        state.find_project(id)
    }

    async fn create_project(&self, request: &ProjectRequest) -> Result<Project, RequestError> {
        let mut state = self.begin("create_project", "POST /projects".into())?;
        let project = Project {
            id: state.next_id("p"),
            title: request.title.clone(),
            description: request.description.clone(),
            progress_percentage: 0.0,
            completed_tasks: 0,
            total_tasks: 0,
            created_at: None,
        };
        state.projects.push(project.clone());
        Ok(project)
    }

    async fn update_project(
        &self,
        id: &str,
        request: &ProjectRequest,
    ) -> Result<Project, RequestError> {
        let mut state = self.begin("update_project", format!("PUT /projects/{}", id))?;
        let project = state
            .projects
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RequestError::from_body(404, r#"{"message":"Project not found"}"#))?;
        project.title = request.title.clone();
        project.description = request.description.clone();
        let project = project.clone();
        Ok(state.project_with_progress(&project))
    }

    async fn delete_project(&self, id: &str) -> Result<(), RequestError> {
        let mut state = self.begin("delete_project", format!("DELETE /projects/{}", id))?;
        state.find_project(id)?;
        state.projects.retain(|p| p.id != id);
        state
            .tasks
            .retain(|t| t.project_id.as_deref() != Some(id));
        Ok(())
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, RequestError> {
        let state = self.begin("list_tasks", format!("GET /projects/{}/tasks", project_id))?;
        state.find_project(project_id)?;
        Ok(state
            .tasks
            .iter()
            .filter(|t| t.project_id.as_deref() == Some(project_id))
            .cloned()
            .collect())
    }

    async fn create_task(
        &self,
        project_id: &str,
        request: &TaskRequest,
    ) -> Result<Task, RequestError> {
        let mut state = self.begin(
            "create_task",
            format!("POST /projects/{}/tasks", project_id),
        )?;
        state.find_project(project_id)?;
        let task = Task {
            id: state.next_id("t"),
            title: request.title.clone(),
            description: request.description.clone(),
            due_date: Some(request.due_date),
            completed: false,
            project_id: Some(project_id.to_string()),
        };
        state.tasks.push(task.clone());
        Ok(task)
    }

    async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<Task, RequestError> {
        let mut state = self.begin("update_task", format!("PUT /tasks/{}", id))?;
        let task = state.task_mut(id)?;
        task.title = request.title.clone();
        task.description = request.description.clone();
        task.due_date = Some(request.due_date);
        Ok(task.clone())
    }

    async fn set_task_completed(&self, id: &str, completed: bool) -> Result<Task, RequestError> {
        let action = if completed { "complete" } else { "incomplete" };
        let mut state = self.begin(
            "set_task_completed",
            format!("PATCH /tasks/{}/{}", id, action),
        )?;
        let task = state.task_mut(id)?;
        task.completed = completed;
        Ok(task.clone())
    }

    async fn delete_task(&self, id: &str) -> Result<(), RequestError> {
        let mut state = self.begin("delete_task", format!("DELETE /tasks/{}", id))?;
        state.task_mut(id)?;
        state.tasks.retain(|t| t.id != id);
        Ok(())
    }
}

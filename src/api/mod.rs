pub mod client;
pub mod error;

#[cfg(test)]
pub mod fake;

pub use client::ApiClient;
pub use error::RequestError;

use async_trait::async_trait;

use crate::model::{
    Credentials, Project, ProjectPage, ProjectQuery, ProjectRequest, Session, Task, TaskRequest,
};

/// The REST surface the client depends on.
///
/// `ApiClient` talks to a real server; tests substitute an in-memory fake.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Swap the credential used for subsequent requests (login/logout)
    fn set_session(&mut self, session: Option<Session>);

    /// `POST /auth/login`
    async fn login(&self, credentials: &Credentials) -> Result<Session, RequestError>;
    /// `POST /auth/register`
    async fn register(&self, credentials: &Credentials) -> Result<(), RequestError>;
    /// `GET /projects?search=&page=&limit=`
    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, RequestError>;
    /// `GET /projects/{id}`
    async fn get_project(&self, id: &str) -> Result<Project, RequestError>;
    /// `POST /projects`
    async fn create_project(&self, request: &ProjectRequest) -> Result<Project, RequestError>;
    /// `PUT /projects/{id}`
    async fn update_project(
        &self,
        id: &str,
        request: &ProjectRequest,
    ) -> Result<Project, RequestError>;
    /// `DELETE /projects/{id}`
    async fn delete_project(&self, id: &str) -> Result<(), RequestError>;
    /// `GET /projects/{id}/tasks`
    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, RequestError>;
    /// `POST /projects/{id}/tasks`
    async fn create_task(
        &self,
        project_id: &str,
        request: &TaskRequest,
    ) -> Result<Task, RequestError>;
    /// `PUT /tasks/{id}`
    async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<Task, RequestError>;
    /// `PATCH /tasks/{id}/complete` or `PATCH /tasks/{id}/incomplete`
    async fn set_task_completed(&self, id: &str, completed: bool) -> Result<Task, RequestError>;
    /// `DELETE /tasks/{id}`
    async fn delete_task(&self, id: &str) -> Result<(), RequestError>;
}

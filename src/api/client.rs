use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Method, Url};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::{Backend, RequestError};
use crate::model::{
    Credentials, Project, ProjectPage, ProjectQuery, ProjectRequest, Session, Task, TaskRequest,
};

/// HTTP client for the backend: a base URL, a reqwest client, and the
/// session whose bearer header goes on every request.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Option<Session>,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, RequestError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(ApiClient {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session: None,
        })
    }

    pub fn with_session(mut self, session: Option<Session>) -> Self {
        self.session = session;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Base URL plus path segments and query pairs. Each segment is
    /// percent-encoded as exactly one path segment, so an ID can never
    /// reach another resource or spill into the query.
    pub fn url(&self, segments: &[&str], query: &[(&str, String)]) -> Result<Url, RequestError> {
        let invalid = |reason: String| RequestError::InvalidUrl {
            url: self.base_url.clone(),
            reason,
        };
        let mut url = Url::parse(&self.base_url).map_err(|e| invalid(e.to_string()))?;
        if let Some(bad) = segments.iter().find(|s| matches!(**s, "" | "." | "..")) {
            return Err(invalid(format!("bad path segment {:?}", bad)));
        }
        url.path_segments_mut()
            .map_err(|_| invalid("base URL cannot have a path".to_string()))?
            .pop_if_empty()
            .extend(segments);
        if !query.is_empty() {
            let mut pairs = url.query_pairs_mut();
            for (key, value) in query {
                pairs.append_pair(key, value);
            }
        }
        Ok(url)
    }

    /// Send a request and return the raw body of a 2xx response
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<String, RequestError> {
        let url = self.url(segments, query)?;
        let path = url.path().to_string();
        tracing::debug!(%method, %path, "request");

        let mut req = self.http.request(method.clone(), url);
        if let Some(session) = &self.session {
            req = req.header(AUTHORIZATION, session.authorization());
        }
        if let Some(body) = body {
            req = req.header(CONTENT_TYPE, "application/json").json(&body);
        }

        let resp = req.send().await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "request failed");
            RequestError::from(e)
        })?;
        let status = resp.status();
        let text = resp.text().await?;
        if !status.is_success() {
            let err = RequestError::from_body(status.as_u16(), &text);
            tracing::warn!(%method, %path, status = status.as_u16(), error = %err, "request rejected");
            return Err(err);
        }
        Ok(text)
    }

    async fn json<T: DeserializeOwned>(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
        body: Option<serde_json::Value>,
    ) -> Result<T, RequestError> {
        let text = self.send(method, segments, query, body).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn empty(&self, method: Method, segments: &[&str]) -> Result<(), RequestError> {
        self.send(method, segments, &[], None).await.map(|_| ())
    }
}

fn to_body<T: Serialize>(value: &T) -> Result<Option<serde_json::Value>, RequestError> {
    Ok(Some(serde_json::to_value(value)?))
}

#[async_trait]
impl Backend for ApiClient {
    fn set_session(&mut self, session: Option<Session>) {
        self.session = session;
    }

    async fn login(&self, credentials: &Credentials) -> Result<Session, RequestError> {
        self.json(Method::POST, &["auth", "login"], &[], to_body(credentials)?)
            .await
    }

    async fn register(&self, credentials: &Credentials) -> Result<(), RequestError> {
        self.send(Method::POST, &["auth", "register"], &[], to_body(credentials)?)
            .await
            .map(|_| ())
    }

    async fn list_projects(&self, query: &ProjectQuery) -> Result<ProjectPage, RequestError> {
        let params = [
            ("search", query.search.clone()),
            ("page", query.page.to_string()),
            ("limit", query.limit.to_string()),
        ];
        self.json(Method::GET, &["projects"], &params, None).await
    }

    async fn get_project(&self, id: &str) -> Result<Project, RequestError> {
        self.json(Method::GET, &["projects", id], &[], None)
            .await
    }

    async fn create_project(&self, request: &ProjectRequest) -> Result<Project, RequestError> {
        self.json(Method::POST, &["projects"], &[], to_body(request)?)
            .await
    }

    async fn update_project(
        &self,
        id: &str,
        request: &ProjectRequest,
    ) -> Result<Project, RequestError> {
        self.json(
            Method::PUT,
            &["projects", id],
            &[],
            to_body(request)?,
        )
        .await
    }

    async fn delete_project(&self, id: &str) -> Result<(), RequestError> {
        self.empty(Method::DELETE, &["projects", id])
            .await
    }

    async fn list_tasks(&self, project_id: &str) -> Result<Vec<Task>, RequestError> {
        self.json(
            Method::GET,
            &["projects", project_id, "tasks"],
            &[],
            None,
        )
        .await
    }

    async fn create_task(
        &self,
        project_id: &str,
        request: &TaskRequest,
    ) -> Result<Task, RequestError> {
        self.json(
            Method::POST,
            &["projects", project_id, "tasks"],
            &[],
            to_body(request)?,
        )
        .await
    }

    async fn update_task(&self, id: &str, request: &TaskRequest) -> Result<Task, RequestError> {
        self.json(Method::PUT, &["tasks", id], &[], to_body(request)?)
            .await
    }

    async fn set_task_completed(&self, id: &str, completed: bool) -> Result<Task, RequestError> {
        let action = if completed { "complete" } else { "incomplete" };
        self.json(
            Method::PATCH,
            &["tasks", id, action],
            &[],
            None,
        )
        .await
    }

    async fn delete_task(&self, id: &str) -> Result<(), RequestError> {
        self.empty(Method::DELETE, &["tasks", id]).await
    }
}

use crate::api::Backend;
use crate::model::{Project, ProjectQuery};

use super::form::ProjectForm;
use super::{Outcome, Prompt};

pub const DELETE_PROJECT_PROMPT: &str = "Are you sure you want to delete this project?";

/// What the dashboard should draw
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListDisplay {
    Loading,
    /// "No projects found." instead of an empty grid
    Empty,
    Grid,
}

/// State behind the dashboard: one page of projects matching a search term.
#[derive(Debug, Clone)]
pub struct ProjectListView {
    pub projects: Vec<Project>,
    pub total_pages: u32,
    pub loading: bool,
    /// Whether the most recent fetch failed
    pub load_failed: bool,
    /// Open create/edit form, if any
    pub form: Option<ProjectForm>,
    page: u32,
    search: String,
    page_size: u32,
}

impl ProjectListView {
    pub fn new(page_size: u32) -> Self {
        ProjectListView {
            projects: Vec::new(),
            total_pages: 0,
            loading: true,
            load_failed: false,
            form: None,
            page: 0,
            search: String::new(),
            page_size: page_size.max(1),
        }
    }

    /// Zero-based page index
    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn query(&self) -> ProjectQuery {
        ProjectQuery {
            search: self.search.clone(),
            page: self.page,
            limit: self.page_size,
        }
    }

    /// Change the search term. A new search always starts at the first page.
    pub fn set_search(&mut self, term: &str) {
        self.search = term.to_string();
        self.page = 0;
    }

    /// Jump straight to a zero-based page, e.g. from a command line argument
    pub fn set_page(&mut self, page: u32) {
        self.page = page;
    }

    /// Advance one page; returns whether the page changed
    pub fn next_page(&mut self) -> bool {
        if self.total_pages == 0 || self.page + 1 >= self.total_pages {
            return false;
        }
        self.page += 1;
        true
    }

    /// Go back one page; returns whether the page changed
    pub fn prev_page(&mut self) -> bool {
        if self.page == 0 {
            return false;
        }
        self.page -= 1;
        true
    }

    pub fn display(&self) -> ListDisplay {
        if self.loading {
            ListDisplay::Loading
        } else if self.projects.is_empty() {
            ListDisplay::Empty
        } else {
            ListDisplay::Grid
        }
    }

    pub fn page_label(&self) -> String {
        format!("Page {} of {}", self.page + 1, self.total_pages)
    }

    pub fn find(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|p| p.id == id)
    }

    /// Fetch the current page. On failure the previous list stays.
    pub async fn load(&mut self, backend: &dyn Backend) {
        self.loading = true;
        match backend.list_projects(&self.query()).await {
            Ok(page) => {
                self.projects = page.content;
                self.total_pages = page.total_pages;
                self.load_failed = false;
            }
            Err(e) => {
                self.load_failed = true;
                tracing::error!(error = %e, search = %self.search, page = self.page, "failed to fetch projects");
            }
        }
        self.loading = false;
    }

    pub fn open_create_form(&mut self) {
        self.form = Some(ProjectForm::default());
    }

    /// Open the form pre-filled for an existing project; false if unknown
    pub fn open_edit_form(&mut self, id: &str) -> bool {
        match self.find(id) {
            Some(project) => {
                self.form = Some(ProjectForm::for_project(project));
                true
            }
            None => false,
        }
    }

    pub fn close_form(&mut self) {
        self.form = None;
    }

    /// Submit the open form as a create or an update
    pub async fn submit_form(&mut self, backend: &dyn Backend, prompt: &mut dyn Prompt) -> Outcome {
        let editing = self.form.as_ref().and_then(|f| f.editing_id.clone());
        match editing {
            Some(id) => self.update(backend, prompt, &id).await,
            None => self.create(backend, prompt).await,
        }
    }

    /// Create a project from the form. On success the form closes and the
    /// current page is re-fetched.
    pub async fn create(&mut self, backend: &dyn Backend, prompt: &mut dyn Prompt) -> Outcome {
        let request = match self.form.clone().unwrap_or_default().validate() {
            Ok(r) => r,
            Err(e) => return Outcome::Invalid(e),
        };
        match backend.create_project(&request).await {
            Ok(project) => {
                tracing::info!(id = %project.id, title = %project.title, "project created");
                self.form = None;
                self.load(backend).await;
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(error = %e, "create project failed");
                prompt.alert("Failed to create project");
                Outcome::Failed
            }
        }
    }

    /// Replace title and description of an existing project
    pub async fn update(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        id: &str,
    ) -> Outcome {
        let request = match self.form.clone().unwrap_or_default().validate() {
            Ok(r) => r,
            Err(e) => return Outcome::Invalid(e),
        };
        match backend.update_project(id, &request).await {
            Ok(_) => {
                self.form = None;
                self.load(backend).await;
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(error = %e, id, "update project failed");
                prompt.alert("Failed to update project");
                Outcome::Failed
            }
        }
    }

    /// Delete after confirmation. Declining sends nothing and changes nothing.
    pub async fn delete(
        &mut self,
        backend: &dyn Backend,
        prompt: &mut dyn Prompt,
        id: &str,
    ) -> Outcome {
        if !prompt.confirm(DELETE_PROJECT_PROMPT) {
            return Outcome::Declined;
        }
        match backend.delete_project(id).await {
            Ok(()) => {
                tracing::info!(id, "project deleted");
                self.load(backend).await;
                // Deleting the last card on a trailing page leaves it empty
                if self.projects.is_empty() && self.prev_page() {
                    self.load(backend).await;
                }
                Outcome::Done
            }
            Err(e) => {
                tracing::warn!(error = %e, id, "delete project failed");
                prompt.alert("Failed to delete project");
                Outcome::Failed
            }
        }
    }
}

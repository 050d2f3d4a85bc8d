use crate::api::{Backend, RequestError};
use crate::io::session_store::{SessionError, SessionStore};
use crate::model::{Credentials, Session};

/// Error from a login attempt
#[derive(Debug, thiserror::Error)]
pub enum LoginError {
    #[error(transparent)]
    Request(#[from] RequestError),
    #[error(transparent)]
    Persist(#[from] SessionError),
}

/// Who is signed in. Passed explicitly to whatever needs it; initialized
/// from the session store and torn down on logout.
#[derive(Debug)]
pub struct AuthState {
    store: SessionStore,
    session: Option<Session>,
}

impl AuthState {
    /// Initialize from persisted storage
    pub fn load(store: SessionStore) -> Self {
        let session = store.read();
        if let Some(s) = &session {
            tracing::debug!(email = %s.email, "restored session");
        }
        AuthState { store, session }
    }

    pub fn current_user(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn is_logged_in(&self) -> bool {
        self.session.is_some()
    }

    /// Authenticate and persist the session. The last login wins.
    pub async fn login(
        &mut self,
        backend: &dyn Backend,
        credentials: &Credentials,
    ) -> Result<Session, LoginError> {
        let session = backend.login(credentials).await?;
        self.store.write(&session)?;
        tracing::info!(email = %session.email, "logged in");
        self.session = Some(session.clone());
        Ok(session)
    }

    /// Create an account. Does not log in.
    pub async fn register(
        &self,
        backend: &dyn Backend,
        credentials: &Credentials,
    ) -> Result<(), RequestError> {
        backend.register(credentials).await?;
        tracing::info!(email = %credentials.email, "registered");
        Ok(())
    }

    /// Clear persisted and in-memory state. In-memory state is cleared even
    /// if the file cannot be removed.
    pub fn logout(&mut self) -> Result<(), SessionError> {
        if let Some(s) = self.session.take() {
            tracing::info!(email = %s.email, "logged out");
        }
        self.store.clear()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{FakeBackend, PASSWORD};
    use tempfile::TempDir;

    fn creds(password: &str) -> Credentials {
        Credentials {
            email: "ana@example.com".into(),
            password: password.into(),
        }
    }

    #[tokio::test]
    async fn login_persists_and_reload_restores() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let backend = FakeBackend::new();

        let mut auth = AuthState::load(SessionStore::new(&path));
        assert!(auth.current_user().is_none());
        auth.login(&backend, &creds(PASSWORD)).await.unwrap();
        assert_eq!(auth.current_user().unwrap().email, "ana@example.com");

        let reloaded = AuthState::load(SessionStore::new(&path));
        assert_eq!(
            reloaded.current_user().unwrap().access_token,
            "token-ana@example.com"
        );
    }

    #[tokio::test]
    async fn failed_login_changes_nothing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut auth = AuthState::load(SessionStore::new(&path));
        let err = auth
            .login(&FakeBackend::new(), &creds("wrong"))
            .await
            .unwrap_err();
        assert!(matches!(err, LoginError::Request(ref e) if e.is_unauthorized()));
        assert!(!auth.is_logged_in());
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn logout_clears_memory_and_disk() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("session.json");
        let mut auth = AuthState::load(SessionStore::new(&path));
        auth.login(&FakeBackend::new(), &creds(PASSWORD)).await.unwrap();
        auth.logout().unwrap();
        assert!(!auth.is_logged_in());
        assert!(!path.exists());
        assert!(AuthState::load(SessionStore::new(&path)).current_user().is_none());
        // Already logged out
        auth.logout().unwrap();
    }

    #[tokio::test]
    async fn register_does_not_log_in() {
        let dir = TempDir::new().unwrap();
        let auth = AuthState::load(SessionStore::new(dir.path().join("s.json")));
        auth.register(&FakeBackend::new(), &creds(PASSWORD))
            .await
            .unwrap();
        assert!(!auth.is_logged_in());
    }
}

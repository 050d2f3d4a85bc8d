use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::model::Session;

/// Error type for session persistence
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error("could not write session to {path}: {source}")]
    Write { path: PathBuf, source: io::Error },
    #[error("could not remove session {path}: {source}")]
    Remove { path: PathBuf, source: io::Error },
    #[error("could not serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Where the session lives between runs (a JSON file)
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        SessionStore { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the persisted session. Missing or malformed files read as none.
    pub fn read(&self) -> Option<Session> {
        let content = fs::read_to_string(&self.path).ok()?;
        match serde_json::from_str(&content) {
            Ok(session) => Some(session),
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "ignoring malformed session file");
                None
            }
        }
    }

    pub fn write(&self, session: &Session) -> Result<(), SessionError> {
        let content = serde_json::to_string_pretty(session)?;
        atomic_write(&self.path, content.as_bytes()).map_err(|source| SessionError::Write {
            path: self.path.clone(),
            source,
        })
    }

    /// Remove the persisted session; already gone is fine
    pub fn clear(&self) -> Result<(), SessionError> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(source) => Err(SessionError::Remove {
                path: self.path.clone(),
                source,
            }),
        }
    }
}

/// Write `content` to `path` atomically using a temp file + rename.
/// The file is readable by the owner only.
fn atomic_write(path: &Path, content: &[u8]) -> io::Result<()> {
    let dir = path.parent().unwrap_or(Path::new("."));
    fs::create_dir_all(dir)?;
    let mut tmp = NamedTempFile::new_in(dir)?;
    tmp.write_all(content)?;
    tmp.flush()?;
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tmp.as_file()
            .set_permissions(fs::Permissions::from_mode(0o600))?;
    }
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

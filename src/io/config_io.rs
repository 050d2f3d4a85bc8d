use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::model::config::ClientConfig;

/// Error type for config file operations
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("could not read {path}: {source}")]
    ReadError { path: PathBuf, source: io::Error },
    #[error("could not write {path}: {source}")]
    WriteError { path: PathBuf, source: io::Error },
    #[error("could not parse config: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("could not edit config: {0}")]
    EditError(#[from] toml_edit::TomlError),
}

/// Read the client config. A missing file yields the defaults.
pub fn read_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    match read_text(path)? {
        Some(text) => Ok(toml::from_str(&text)?),
        None => Ok(ClientConfig::default()),
    }
}

/// Read the config as a toml_edit document for round-trip-safe editing.
/// A missing file yields an empty document.
pub fn read_config_doc(path: &Path) -> Result<toml_edit::DocumentMut, ConfigError> {
    match read_text(path)? {
        Some(text) => {
            // Validate against the schema before handing out an editable doc
            toml::from_str::<ClientConfig>(&text)?;
            Ok(text.parse()?)
        }
        None => Ok(toml_edit::DocumentMut::new()),
    }
}

/// Write the config document back to disk, preserving formatting.
pub fn write_config(path: &Path, doc: &toml_edit::DocumentMut) -> Result<(), ConfigError> {
    let write = || -> io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, doc.to_string())
    };
    write().map_err(|source| ConfigError::WriteError {
        path: path.to_path_buf(),
        source,
    })
}

/// Update `[api] base_url` in the config document
pub fn set_base_url(doc: &mut toml_edit::DocumentMut, url: &str) {
    if !doc.contains_key("api") {
        doc["api"] = toml_edit::Item::Table(toml_edit::Table::new());
    }
    doc["api"]["base_url"] = toml_edit::value(url);
}

fn read_text(path: &Path) -> Result<Option<String>, ConfigError> {
    match fs::read_to_string(path) {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(source) => Err(ConfigError::ReadError {
            path: path.to_path_buf(),
            source,
        }),
    }
}

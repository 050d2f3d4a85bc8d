use std::path::PathBuf;

const APP_DIR: &str = "taskboard";

/// Config directory, respecting XDG_CONFIG_HOME
pub fn config_dir() -> PathBuf {
    std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".config"))
        .join(APP_DIR)
}

/// State directory (logs), respecting XDG_STATE_HOME
pub fn state_dir() -> PathBuf {
    std::env::var("XDG_STATE_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| home_dir().join(".local").join("state"))
        .join(APP_DIR)
}

pub fn default_config_path() -> PathBuf {
    config_dir().join("config.toml")
}

pub fn default_session_path() -> PathBuf {
    config_dir().join("session.json")
}

pub fn default_log_path() -> PathBuf {
    state_dir().join("taskboard.log")
}

/// Get the user's home directory
fn home_dir() -> PathBuf {
    std::env::var("HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/"))
}

//! Integration tests for the `tb` CLI.
//!
//! Each test points the config and state directories at a temp dir, runs
//! `tb` as a subprocess, and checks its output, exit status, and the files
//! it leaves behind. None of them need a running backend.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use pretty_assertions::assert_eq;
use tempfile::TempDir;

/// Get the path to the built `tb` binary.
fn tb_bin() -> PathBuf {
    // cargo test builds to target/debug/
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("tb");
    path
}

/// Run `tb` with an isolated config/state home
fn run_tb(home: &Path, args: &[&str]) -> Output {
    Command::new(tb_bin())
        .args(args)
        .env("XDG_CONFIG_HOME", home.join("config"))
        .env("XDG_STATE_HOME", home.join("state"))
        .env_remove("TASKBOARD_API_URL")
        .env_remove("TASKBOARD_PASSWORD")
        .env("RUST_LOG", "off")
        .output()
        .expect("failed to run tb")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

fn config_file(home: &Path) -> PathBuf {
    home.join("config").join("taskboard").join("config.toml")
}

fn session_file(home: &Path) -> PathBuf {
    home.join("config").join("taskboard").join("session.json")
}

#[test]
fn help_lists_commands() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["--help"]);
    assert!(out.status.success());
    let text = stdout(&out);
    for cmd in ["login", "register", "logout", "whoami", "projects", "tasks", "config"] {
        assert!(text.contains(cmd), "help is missing {}", cmd);
    }
}

#[test]
fn set_url_is_written_and_shown() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["config", "set-url", "http://tasks.example.com:8080"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "base_url = http://tasks.example.com:8080");

    let written = fs::read_to_string(config_file(home.path())).unwrap();
    assert!(written.contains("[api]"));
    assert!(written.contains("base_url = \"http://tasks.example.com:8080\""));

    let show = run_tb(home.path(), &["config", "show"]);
    assert!(show.status.success());
    assert!(stdout(&show).contains("base_url     http://tasks.example.com:8080"));
}

#[test]
fn set_url_keeps_other_settings() {
    let home = TempDir::new().unwrap();
    let path = config_file(home.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        "# my settings\n[ui]\npage_size = 3\n\n[api]\nbase_url = \"http://old\"\n",
    )
    .unwrap();

    let out = run_tb(home.path(), &["config", "set-url", "http://new.example.com"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));

    let written = fs::read_to_string(&path).unwrap();
    assert!(written.contains("# my settings"));
    assert!(written.contains("page_size = 3"));
    assert!(written.contains("http://new.example.com"));
    assert!(!written.contains("http://old"));
}

#[test]
fn config_show_json_applies_url_override() {
    let home = TempDir::new().unwrap();
    let out = run_tb(
        home.path(),
        &["--json", "--api-url", "http://override:1", "config", "show"],
    );
    assert!(out.status.success());
    let value: serde_json::Value = serde_json::from_str(&stdout(&out)).unwrap();
    assert_eq!(value["api"]["base_url"], "http://override:1");
}

#[test]
fn invalid_url_is_rejected() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["config", "set-url", "not a url"]);
    assert!(!out.status.success());
    assert!(stderr(&out).contains("invalid URL"));
    assert!(!config_file(home.path()).exists());
}

#[test]
fn whoami_when_logged_out() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["whoami"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "not logged in");

    let json = run_tb(home.path(), &["--json", "whoami"]);
    let value: serde_json::Value = serde_json::from_str(&stdout(&json)).unwrap();
    assert_eq!(value["loggedIn"], false);
}

#[test]
fn whoami_reads_stored_session() {
    let home = TempDir::new().unwrap();
    let path = session_file(home.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"accessToken":"abc","tokenType":"Bearer","email":"ana@example.com"}"#,
    )
    .unwrap();

    let out = run_tb(home.path(), &["whoami"]);
    assert!(out.status.success(), "stderr: {}", stderr(&out));
    assert_eq!(stdout(&out).trim(), "ana@example.com");
}

#[test]
fn project_commands_require_login() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["projects", "list"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("not logged in"));

    let out = run_tb(home.path(), &["tasks", "list", "p1"]);
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).contains("not logged in"));
}

#[test]
fn logout_when_logged_out_is_harmless() {
    let home = TempDir::new().unwrap();
    let out = run_tb(home.path(), &["logout"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "not logged in");
}

#[test]
fn logout_removes_session_file() {
    let home = TempDir::new().unwrap();
    let path = session_file(home.path());
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(
        &path,
        r#"{"accessToken":"abc","tokenType":"Bearer","email":"ana@example.com"}"#,
    )
    .unwrap();

    let out = run_tb(home.path(), &["logout"]);
    assert!(out.status.success());
    assert_eq!(stdout(&out).trim(), "logged out");
    assert!(!path.exists());
}

#[test]
fn failed_login_stores_nothing() {
    let home = TempDir::new().unwrap();
    // Nothing listens on the discard port
    let out = run_tb(
        home.path(),
        &[
            "--api-url",
            "http://127.0.0.1:9",
            "login",
            "--email",
            "ana@example.com",
            "--password",
            "secret",
        ],
    );
    assert_eq!(out.status.code(), Some(1));
    assert!(stderr(&out).starts_with("error:"));
    assert!(!session_file(home.path()).exists());
}

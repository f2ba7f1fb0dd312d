//! Helpers for driving the `tsync` binary

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

/// Result of one CLI invocation
pub struct CommandResult {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl CommandResult {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Run `tsync` with `--no-color` in `dir`
pub fn tsync(dir: &Path, args: &[&str]) -> CommandResult {
    let output = Command::new(env!("CARGO_BIN_EXE_tsync"))
        .arg("--no-color")
        .args(args)
        .current_dir(dir)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run tsync");
    CommandResult {
        stdout: String::from_utf8_lossy(&output.stdout).to_string(),
        stderr: String::from_utf8_lossy(&output.stderr).to_string(),
        exit_code: output.status.code().unwrap_or(-1),
    }
}

/// Temporary directory holding snapshot files
pub struct Fixture {
    pub dir: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn write(&self, name: &str, contents: &str) -> PathBuf {
        let path = self.dir.path().join(name);
        std::fs::write(&path, contents).expect("write fixture");
        path
    }
}

/// Single-model snapshot with one file holding the given case ids
pub fn snapshot(cases: &[&str]) -> String {
    let children: Vec<String> = cases
        .iter()
        .enumerate()
        .map(|(i, id)| {
            format!(
                r#"{{"id": "{id}", "kind": "case", "title": "{id}",
                    "location": {{"file": "/ws/a.spec.ts", "line": {line}, "column": 1}}}}"#,
                id = id,
                line = i + 1
            )
        })
        .collect();
    format!(
        r#"{{"models": [{{
            "config": {{"workspace_folder": "/ws", "config_file": "/ws/playwright.config.ts"}},
            "projects": [{{"name": "default", "suite": {{
                "id": "suite", "kind": "root", "title": "",
                "children": [{{"id": "a", "kind": "file", "title": "a.spec.ts",
                    "location": {{"file": "/ws/a.spec.ts"}},
                    "children": [{children}]}}]
            }}}}]
        }}]}}"#,
        children = children.join(",")
    )
}

/// Snapshot whose only model failed to load
pub fn broken_snapshot(message: &str) -> String {
    format!(
        r#"{{"models": [{{
            "config": {{"workspace_folder": "/ws", "config_file": "/ws/playwright.config.ts"}},
            "errors": [{{"message": "{message}"}}]
        }}]}}"#,
        message = message
    )
}

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};

use assert_cmd::Command;
use serde_json::Value;
use tempfile::TempDir;

/// Reference date used by every CLI test unless overridden.
pub const TODAY: &str = "2025-08-28";

pub const STORE_FILE: &str = "video-prod-tracker-v1.json";

pub fn reeltrack_cmd() -> Command {
    let mut cmd = Command::cargo_bin("reeltrack").expect("binary");
    cmd.env_remove("RUST_LOG")
        .env_remove("REELTRACK_DIR")
        .env_remove("REELTRACK_TODAY");
    cmd
}

/// A private data directory for one test.
pub struct TestDir {
    dir: TempDir,
}

impl TestDir {
    pub fn new() -> Self {
        Self {
            dir: tempfile::tempdir().expect("failed to create tempdir"),
        }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn store_file(&self) -> PathBuf {
        self.dir.path().join(STORE_FILE)
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn write_config(&self, contents: &str) -> std::io::Result<PathBuf> {
        self.write_file("reeltrack.toml", contents)
    }

    /// `reeltrack` bound to this directory and the fixed reference date.
    pub fn cmd(&self) -> Command {
        let mut cmd = reeltrack_cmd();
        cmd.current_dir(self.path())
            .env("REELTRACK_DIR", self.path())
            .env("REELTRACK_TODAY", TODAY);
        cmd
    }

    /// Run with `--json`, require success, and return the envelope.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json envelope")
    }

    /// Run with `--json`, require the given exit code, and return the envelope.
    pub fn json_failure(&self, args: &[&str], code: i32) -> Value {
        let output = self
            .cmd()
            .args(args)
            .arg("--json")
            .assert()
            .code(code)
            .get_output()
            .stdout
            .clone();
        serde_json::from_slice(&output).expect("json error envelope")
    }

    pub fn read_store(&self) -> Value {
        let raw = fs::read_to_string(self.store_file()).expect("read store file");
        serde_json::from_str(&raw).expect("store json")
    }
}

pub fn task_ids(list: &Value) -> Vec<String> {
    list["data"]["tasks"]
        .as_array()
        .expect("tasks array")
        .iter()
        .map(|task| task["id"].as_str().expect("task id").to_string())
        .collect()
}

pub fn find<'a>(items: &'a Value, key: &str, value: &str) -> &'a Value {
    items
        .as_array()
        .expect("array")
        .iter()
        .find(|item| item[key].as_str() == Some(value))
        .unwrap_or_else(|| panic!("no entry with {key} = {value}"))
}

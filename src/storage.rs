//! Storage layer for reeltrack
//!
//! All state lives in a single data directory:
//!
//! ```text
//! <data_dir>/
//!   reeltrack.toml                  # Optional configuration
//!   video-prod-tracker-v1.json      # Working set (file named after the storage key)
//!   video-prod-tracker-v1.json.lock # Write lock
//! ```
//!
//! The data directory comes from `--data-dir` / `REELTRACK_DIR`, else the
//! platform data directory, else `.reeltrack` under the current directory.

use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{de::DeserializeOwned, Serialize};

use crate::config::CONFIG_FILE;
use crate::error::Result;
use crate::lock::{self, DEFAULT_LOCK_TIMEOUT_MS};

/// Fallback directory name when no platform data directory is available
pub const LOCAL_DIR: &str = ".reeltrack";

/// Storage manager for the data directory
#[derive(Debug, Clone)]
pub struct Storage {
    data_dir: PathBuf,
}

impl Storage {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    /// Storage rooted at the explicit directory, or the default location
    pub fn resolve(explicit: Option<PathBuf>) -> Self {
        Self::new(explicit.unwrap_or_else(default_data_dir))
    }

    // =========================================================================
    // Path accessors
    // =========================================================================

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config_file(&self) -> PathBuf {
        self.data_dir.join(CONFIG_FILE)
    }

    /// Working-set file for a storage key
    pub fn working_set_file(&self, key: &str) -> PathBuf {
        self.data_dir.join(format!("{key}.json"))
    }

    // =========================================================================
    // File I/O helpers
    // =========================================================================

    pub fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.data_dir)?;
        Ok(())
    }

    /// Write pretty JSON atomically while holding the file's lock
    pub fn write_json<T: Serialize>(&self, path: &Path, data: &T) -> Result<()> {
        let json = serde_json::to_string_pretty(data)?;
        lock::write_atomic_locked(path, json.as_bytes(), DEFAULT_LOCK_TIMEOUT_MS)
    }

    /// Read JSON from a file. Missing files read as `None`.
    pub fn read_json<T: DeserializeOwned>(&self, path: &Path) -> Result<Option<T>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path)?;
        let data: T = serde_json::from_str(&content)?;
        Ok(Some(data))
    }
}

fn default_data_dir() -> PathBuf {
    ProjectDirs::from("", "", "reeltrack")
        .map(|dirs| dirs.data_dir().to_path_buf())
        .unwrap_or_else(|| PathBuf::from(LOCAL_DIR))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn paths_are_under_data_dir() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(temp_dir.path().to_path_buf());
        assert_eq!(storage.config_file(), temp_dir.path().join("reeltrack.toml"));
        assert_eq!(
            storage.working_set_file("video-prod-tracker-v1"),
            temp_dir.path().join("video-prod-tracker-v1.json")
        );
    }

    #[test]
    fn json_round_trip_and_missing_file() {
        let temp_dir = TempDir::new().unwrap();
        let storage = Storage::new(temp_dir.path().join("nested"));
        let path = storage.working_set_file("k");

        let missing: Option<Vec<String>> = storage.read_json(&path).unwrap();
        assert!(missing.is_none());

        storage
            .write_json(&path, &vec!["a".to_string(), "b".to_string()])
            .unwrap();
        let read: Option<Vec<String>> = storage.read_json(&path).unwrap();
        assert_eq!(read, Some(vec!["a".to_string(), "b".to_string()]));
    }

    #[test]
    fn resolve_prefers_explicit_dir() {
        let storage = Storage::resolve(Some(PathBuf::from("/tmp/reeltrack-explicit")));
        assert_eq!(storage.data_dir(), Path::new("/tmp/reeltrack-explicit"));
    }
}

//! Configuration loading and management
//!
//! Handles parsing of `reeltrack.toml` from the data directory.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// File name of the configuration inside the data directory
pub const CONFIG_FILE: &str = "reeltrack.toml";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// Team roster (assignees and producers)
    #[serde(default)]
    pub team: TeamConfig,

    /// Persistence configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Id generation
    #[serde(default)]
    pub ids: IdConfig,

    /// Placeholder values for new records
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Export configuration
    #[serde(default)]
    pub export: ExportConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeamConfig {
    /// Allowed assignees/producers; the first entry is the default for new
    /// tasks and projects
    #[serde(default = "default_roster")]
    pub roster: Vec<String>,
}

fn default_roster() -> Vec<String> {
    [
        "Karan", "Rumi", "Somya", "Tushar", "Ravi", "Avinash", "Editor 1", "Editor 2", "Graphics",
        "Audio", "Client",
    ]
    .iter()
    .map(|name| name.to_string())
    .collect()
}

impl Default for TeamConfig {
    fn default() -> Self {
        Self {
            roster: default_roster(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Storage key; the working set lives in `<data_dir>/<key>.json`
    #[serde(default = "default_storage_key")]
    pub key: String,
}

fn default_storage_key() -> String {
    "video-prod-tracker-v1".to_string()
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key: default_storage_key(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdConfig {
    #[serde(default = "default_task_prefix")]
    pub task_prefix: String,

    #[serde(default = "default_project_prefix")]
    pub project_prefix: String,

    /// Zero-padded width of the numeric part
    #[serde(default = "default_id_width")]
    pub width: usize,
}

fn default_task_prefix() -> String {
    "T".to_string()
}

fn default_project_prefix() -> String {
    "P".to_string()
}

fn default_id_width() -> usize {
    3
}

impl Default for IdConfig {
    fn default() -> Self {
        Self {
            task_prefix: default_task_prefix(),
            project_prefix: default_project_prefix(),
            width: default_id_width(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DefaultsConfig {
    #[serde(default = "default_task_name")]
    pub task_name: String,

    #[serde(default = "default_project_name")]
    pub project_name: String,

    #[serde(default = "default_client")]
    pub client: String,

    /// Project reference used by new tasks when no project exists
    #[serde(default = "default_fallback_project_id")]
    pub fallback_project_id: String,

    #[serde(default = "default_fallback_project_name")]
    pub fallback_project_name: String,
}

fn default_task_name() -> String {
    "New Task".to_string()
}

fn default_project_name() -> String {
    "New Project".to_string()
}

fn default_client() -> String {
    "Client".to_string()
}

fn default_fallback_project_id() -> String {
    "P-001".to_string()
}

fn default_fallback_project_name() -> String {
    "Project".to_string()
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            task_name: default_task_name(),
            project_name: default_project_name(),
            client: default_client(),
            fallback_project_id: default_fallback_project_id(),
            fallback_project_name: default_fallback_project_name(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExportConfig {
    /// Default file name for `reeltrack export`
    #[serde(default = "default_export_file")]
    pub file_name: String,
}

fn default_export_file() -> String {
    "tracker-data.json".to_string()
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            file_name: default_export_file(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from the data directory, or return defaults
    pub fn load_from_dir(data_dir: &Path) -> Self {
        let config_path = data_dir.join(CONFIG_FILE);
        if !config_path.exists() {
            return Self::default();
        }
        match Self::load(&config_path) {
            Ok(config) => config,
            Err(err) => {
                tracing::warn!(path = %config_path.display(), error = %err, "ignoring invalid config");
                Self::default()
            }
        }
    }

    /// Default assignee/producer for new records
    pub fn default_member(&self) -> &str {
        self.team
            .roster
            .first()
            .map(String::as_str)
            .unwrap_or_default()
    }

    pub fn is_member(&self, name: &str) -> bool {
        self.team.roster.iter().any(|member| member == name)
    }

    fn validate(&self) -> crate::error::Result<()> {
        self.team.validate()?;
        self.storage.validate()?;
        self.ids.validate()?;
        if self.export.file_name.trim().is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "export.file_name cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

impl TeamConfig {
    fn validate(&self) -> crate::error::Result<()> {
        if self.roster.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "team.roster cannot be empty".to_string(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for member in &self.roster {
            let trimmed = member.trim();
            if trimmed.is_empty() {
                return Err(crate::error::Error::InvalidConfig(
                    "team.roster cannot include empty entries".to_string(),
                ));
            }
            if !seen.insert(trimmed) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "team.roster has duplicate entry '{trimmed}'"
                )));
            }
        }
        Ok(())
    }
}

impl StorageConfig {
    fn validate(&self) -> crate::error::Result<()> {
        let key = self.key.trim();
        if key.is_empty() {
            return Err(crate::error::Error::InvalidConfig(
                "storage.key cannot be empty".to_string(),
            ));
        }
        if !key
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || matches!(ch, '-' | '_' | '.'))
        {
            return Err(crate::error::Error::InvalidConfig(format!(
                "storage.key '{key}' may only contain letters, digits, '-', '_' and '.'"
            )));
        }
        Ok(())
    }
}

impl IdConfig {
    fn validate(&self) -> crate::error::Result<()> {
        for (field, prefix) in [
            ("ids.task_prefix", &self.task_prefix),
            ("ids.project_prefix", &self.project_prefix),
        ] {
            let trimmed = prefix.trim();
            if trimmed.is_empty() {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} cannot be empty"
                )));
            }
            if !trimmed.chars().all(|ch| ch.is_ascii_alphanumeric()) {
                return Err(crate::error::Error::InvalidConfig(format!(
                    "{field} must be alphanumeric"
                )));
            }
        }
        if self.width == 0 || self.width > 9 {
            return Err(crate::error::Error::InvalidConfig(
                "ids.width must be between 1 and 9".to_string(),
            ));
        }
        Ok(())
    }
}

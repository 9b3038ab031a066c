//! reeltrack config command implementation
//!
//! Shows the configuration in effect and where data lives. Unlike the other
//! commands, an invalid `reeltrack.toml` is reported as an error here instead
//! of silently falling back to defaults.

use std::path::PathBuf;

use serde::Serialize;

use crate::config::Config;
use crate::error::Result;
use crate::model::format_id;
use crate::output::{emit_success, HumanOutput, OutputOptions};
use crate::storage::Storage;
use crate::store::JsonFileStore;

/// Options for the config command
pub struct ConfigOptions {
    pub data_dir: Option<PathBuf>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ConfigReport {
    data_dir: String,
    config_file: String,
    config_file_exists: bool,
    working_set_file: String,
    config: Config,
}

pub fn run(options: ConfigOptions) -> Result<()> {
    let storage = Storage::resolve(options.data_dir);
    let config_file = storage.config_file();
    let exists = config_file.exists();
    let config = if exists {
        Config::load(&config_file)?
    } else {
        Config::default()
    };
    let store = JsonFileStore::from_config(storage.clone(), &config);

    let report = ConfigReport {
        data_dir: storage.data_dir().display().to_string(),
        config_file: config_file.display().to_string(),
        config_file_exists: exists,
        working_set_file: store.path().display().to_string(),
        config,
    };

    let mut human = HumanOutput::new("Configuration");
    human.push_summary("Data dir", report.data_dir.clone());
    human.push_summary(
        "Config file",
        if exists {
            report.config_file.clone()
        } else {
            format!("{} (not present, using defaults)", report.config_file)
        },
    );
    human.push_summary("Working set", report.working_set_file.clone());
    human.push_summary("Roster", report.config.team.roster.join(", "));
    human.push_summary(
        "Ids",
        format!(
            "{} / {}",
            format_id(&report.config.ids.task_prefix, 1, report.config.ids.width),
            format_id(&report.config.ids.project_prefix, 1, report.config.ids.width)
        ),
    );
    human.push_summary("Export file", report.config.export.file_name.clone());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "config",
        &report,
        Some(&human),
    )
}

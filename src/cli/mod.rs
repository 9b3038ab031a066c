//! Command-line interface for reeltrack
//!
//! This module defines the CLI structure using clap derive macros.
//! Each command group is implemented in its own submodule.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::{Error, Result};
use crate::fields;
use crate::output::HumanOutput;
use crate::storage::Storage;
use crate::store::{JsonFileStore, Store};
use crate::tracker::Tracker;

mod config;
mod dashboard;
mod export;
mod project;
mod task;

/// reeltrack - video production tracker
///
/// Tracks production tasks across projects and reports progress, dependency
/// readiness and delivery metrics from a local working set.
#[derive(Parser, Debug)]
#[command(name = "reeltrack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Directory holding the working set and reeltrack.toml
    #[arg(long, global = true, env = "REELTRACK_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Reference date for overdue checks (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true, env = "REELTRACK_TODAY")]
    pub today: Option<String>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Delivery metrics for all tasks or one project
    Dashboard {
        /// Project id to focus on, or "all"
        #[arg(short, long, default_value = "all")]
        project: String,
    },

    /// Task management
    #[command(subcommand)]
    Task(TaskCommands),

    /// Project management
    #[command(subcommand)]
    Project(ProjectCommands),

    /// Export projects and tasks as JSON
    Export {
        /// Output file, or "-" for stdout (defaults to the configured file name)
        #[arg(short, long)]
        out: Option<String>,
    },

    /// Show the effective configuration and data paths
    Config,
}

/// Task subcommands
#[derive(Subcommand, Debug)]
pub enum TaskCommands {
    /// Create a task with default values
    New {
        /// Name for the new task
        #[arg(long)]
        name: Option<String>,
    },

    /// List tasks with progress and readiness
    #[command(alias = "ls")]
    List {
        /// Project id to filter on, or "all"
        #[arg(short, long, default_value = "all")]
        project: String,
    },

    /// Show one task
    Show {
        /// Task id
        id: String,
    },

    /// Replace one field of a task (an empty value clears optional fields)
    Set {
        /// Task id
        id: String,

        /// Field name (e.g. status, dueDate, manualPct)
        field: String,

        /// New value
        #[arg(default_value = "", allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a task
    Rm {
        /// Task id
        id: String,
    },
}

/// Project subcommands
#[derive(Subcommand, Debug)]
pub enum ProjectCommands {
    /// Create a project with placeholder values
    New {
        /// Name for the new project
        #[arg(long)]
        name: Option<String>,
    },

    /// List projects with overall progress
    #[command(alias = "ls")]
    List,

    /// Replace one field of a project (an empty value clears dates)
    Set {
        /// Project id
        id: String,

        /// Field name (id, name, client, producer, startDate, endDate)
        field: String,

        /// New value
        #[arg(default_value = "", allow_hyphen_values = true)]
        value: String,
    },

    /// Delete a project (its tasks are kept)
    Rm {
        /// Project id
        id: String,
    },
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        match self.command {
            Commands::Dashboard { project } => dashboard::run(dashboard::DashboardOptions {
                project,
                data_dir: self.data_dir,
                today: self.today,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Task(cmd) => match cmd {
                TaskCommands::New { name } => task::run_new(task::NewOptions {
                    name,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::List { project } => task::run_list(task::ListOptions {
                    project,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Show { id } => task::run_show(task::ShowOptions {
                    id,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Set { id, field, value } => task::run_set(task::SetOptions {
                    id,
                    field,
                    value,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                TaskCommands::Rm { id } => task::run_rm(task::RmOptions {
                    id,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Project(cmd) => match cmd {
                ProjectCommands::New { name } => project::run_new(project::NewOptions {
                    name,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ProjectCommands::List => project::run_list(project::ListOptions {
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
                ProjectCommands::Set { id, field, value } => {
                    project::run_set(project::SetOptions {
                        id,
                        field,
                        value,
                        data_dir: self.data_dir,
                        today: self.today,
                        json: self.json,
                        quiet: self.quiet,
                    })
                }
                ProjectCommands::Rm { id } => project::run_rm(project::RmOptions {
                    id,
                    data_dir: self.data_dir,
                    today: self.today,
                    json: self.json,
                    quiet: self.quiet,
                }),
            },
            Commands::Export { out } => export::run(export::ExportOptions {
                out,
                data_dir: self.data_dir,
                today: self.today,
                json: self.json,
                quiet: self.quiet,
            }),
            Commands::Config => config::run(config::ConfigOptions {
                data_dir: self.data_dir,
                json: self.json,
                quiet: self.quiet,
            }),
        }
    }
}

/// Everything a command needs once the data directory is resolved.
pub(crate) struct Context {
    pub storage: Storage,
    pub tracker: Tracker<JsonFileStore>,
    pub today: String,
}

pub(crate) fn load_context(data_dir: Option<PathBuf>, today: Option<String>) -> Result<Context> {
    let today = resolve_today(today.as_deref())?;
    let storage = Storage::resolve(data_dir);
    let config = Config::load_from_dir(storage.data_dir());
    let store = JsonFileStore::from_config(storage.clone(), &config);
    tracing::debug!(
        data_dir = %storage.data_dir().display(),
        store = %store.path().display(),
        today = %today,
        "loading tracker"
    );
    let tracker = Tracker::open(store, config);

    Ok(Context {
        storage,
        tracker,
        today,
    })
}

fn resolve_today(explicit: Option<&str>) -> Result<String> {
    match explicit {
        Some(value) => fields::date("today", value)?
            .ok_or_else(|| Error::InvalidArgument("--today cannot be empty".to_string())),
        None => Ok(chrono::Local::now().date_naive().format("%Y-%m-%d").to_string()),
    }
}

/// Surface a failed save on an otherwise successful command.
pub(crate) fn push_save_warning<S: Store>(tracker: &Tracker<S>, human: &mut HumanOutput) {
    if let Some(err) = tracker.last_save_error() {
        human.push_warning(format!("changes were not saved: {err}"));
    }
}

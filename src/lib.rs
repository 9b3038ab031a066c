//! reeltrack - video production tracking library
//!
//! This library holds the tracking and metrics engine behind the
//! `reeltrack` CLI: projects and tasks, the rules that derive progress and
//! readiness from them, and the delivery analytics computed on top.
//!
//! # Core Concepts
//!
//! - **Working set**: the `{projects, tasks}` pair plus id counters
//! - **Effective percent**: a task's manual percent, else one derived from status
//! - **Readiness**: a task is Ready when its dependency is absent or Done
//! - **Dashboard**: status/stage/assignee distributions, on-time rate,
//!   overdue count and per-project progress
//!
//! # Module Organization
//!
//! - `model`: records, enums and the working set
//! - `rules`: per-task derivations (percent, readiness, overdue)
//! - `metrics`: aggregates over a task collection
//! - `fields`: typed single-field updates and their parsing
//! - `tracker`: the mutation API over an injected store
//! - `store`: the load/save contract, file and memory stores
//! - `seed`: the dataset used when nothing has been saved yet
//! - `storage`: data directory layout and JSON file helpers
//! - `lock`: file locking and atomic writes
//! - `export`: the `{projects, tasks}` JSON export
//! - `config`: configuration loading from `reeltrack.toml`
//! - `output`: human and JSON rendering for the CLI
//! - `cli`: command-line interface using clap
//! - `error`: error types and result aliases

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod fields;
pub mod lock;
pub mod metrics;
pub mod model;
pub mod output;
pub mod rules;
pub mod seed;
pub mod storage;
pub mod store;
pub mod tracker;

pub use error::{Error, Result};

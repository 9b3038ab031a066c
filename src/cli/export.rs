//! reeltrack export command implementation

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::load_context;
use crate::error::Result;
use crate::export;
use crate::output::{emit_success, HumanOutput, OutputOptions};

/// Options for the export command
pub struct ExportOptions {
    pub out: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ExportReport {
    path: String,
    bytes: u64,
    projects: usize,
    tasks: usize,
}

pub fn run(options: ExportOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.today)?;
    let set = ctx.tracker.working_set();

    // "-" streams the bare document, never wrapped in the envelope.
    if options.out.as_deref().map(str::trim) == Some("-") {
        println!("{}", export::to_json(set)?);
        return Ok(());
    }

    let path = options
        .out
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from(&ctx.tracker.config().export.file_name));
    let bytes = export::write(set, &path)?;

    let report = ExportReport {
        path: path.display().to_string(),
        bytes,
        projects: set.projects.len(),
        tasks: set.tasks.len(),
    };

    let mut human = HumanOutput::new("Export written");
    human.push_summary("Path", report.path.clone());
    human.push_summary("Projects", report.projects.to_string());
    human.push_summary("Tasks", report.tasks.to_string());
    human.push_summary("Source", ctx.storage.data_dir().display().to_string());

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "export",
        &report,
        Some(&human),
    )
}

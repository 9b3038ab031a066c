//! reeltrack dashboard command implementation
//!
//! Renders the KPI roll-up for the filtered task set plus per-project
//! progress over all tasks.

use std::path::PathBuf;

use crate::cli::load_context;
use crate::error::Result;
use crate::metrics::ProjectFilter;
use crate::output::{emit_success, progress_bar, HumanOutput, OutputOptions};

/// Options for the dashboard command
pub struct DashboardOptions {
    pub project: String,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub fn run(options: DashboardOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.today)?;
    let filter: ProjectFilter = options.project.parse()?;
    let dashboard = ctx.tracker.dashboard(&filter, &ctx.today);

    let mut human = HumanOutput::new("Dashboard");
    human.push_summary("Filter", dashboard.filter.clone());
    human.push_summary("Today", dashboard.today.clone());
    human.push_summary("Projects", dashboard.projects_total.to_string());
    human.push_summary("Tasks", dashboard.tasks_total.to_string());
    human.push_summary("Completed", dashboard.tasks_completed.to_string());
    human.push_summary("Overdue", dashboard.tasks_overdue.to_string());
    human.push_summary("On-time rate", format!("{}%", dashboard.on_time_rate));

    for entry in &dashboard.statuses {
        human.push_line("By status", format!("{}: {}", entry.status, entry.count));
    }
    for entry in &dashboard.stages {
        human.push_line("By stage", format!("{}: {}", entry.stage, entry.count));
    }
    for entry in &dashboard.assignees {
        human.push_line("By assignee", format!("{}: {}", entry.assignee, entry.count));
    }
    for entry in &dashboard.project_progress {
        human.push_line(
            "Project progress",
            format!(
                "{} {} {}",
                entry.project_id,
                progress_bar(entry.percent),
                entry.name
            ),
        );
    }

    if let ProjectFilter::Project(id) = &filter {
        if ctx.tracker.working_set().project(id).is_none() {
            human.push_warning(format!("no project with id {id}"));
        }
    }
    if ctx.tracker.was_seeded() {
        human.push_next_step("reeltrack task new to start tracking your own work");
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "dashboard",
        &dashboard,
        Some(&human),
    )
}

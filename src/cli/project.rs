//! reeltrack project command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{load_context, push_save_warning};
use crate::error::{Error, Result};
use crate::fields::{self, ProjectField};
use crate::metrics::{self, ProjectProgress};
use crate::model::Project;
use crate::output::{emit_success, progress_bar, HumanOutput, OutputOptions};

pub struct NewOptions {
    pub name: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct SetOptions {
    pub id: String,
    pub field: String,
    pub value: String,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct RmOptions {
    pub id: String,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

#[derive(Serialize)]
struct ProjectEntry {
    #[serde(flatten)]
    project: Project,
    tasks: usize,
    percent: u8,
}

#[derive(Serialize)]
struct ProjectListOutput {
    total: usize,
    projects: Vec<ProjectEntry>,
}

#[derive(Serialize)]
struct ProjectSetOutput {
    id: String,
    field: &'static str,
    updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    project: Option<Project>,
}

#[derive(Serialize)]
struct ProjectRmOutput {
    id: String,
    removed: bool,
    orphaned_tasks: Vec<String>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let name = options
        .name
        .as_deref()
        .map(|name| fields::required("name", name))
        .transpose()?;

    let project = ctx.tracker.create_project(name);

    let mut human = HumanOutput::new("Project created");
    human.push_summary("ID", project.id.clone());
    human.push_summary("Name", project.name.clone());
    human.push_summary("Client", project.client.clone());
    human.push_summary("Producer", project.producer.clone());
    push_save_warning(&ctx.tracker, &mut human);
    human.push_next_step(format!("reeltrack project set {} <field> <value>", project.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project new",
        &project,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.today)?;
    let progress = metrics::project_progress(ctx.tracker.projects(), ctx.tracker.tasks());

    let entries: Vec<ProjectEntry> = ctx
        .tracker
        .projects()
        .iter()
        .zip(progress)
        .map(|(project, ProjectProgress { tasks, percent, .. })| ProjectEntry {
            project: project.clone(),
            tasks,
            percent,
        })
        .collect();

    let mut human = HumanOutput::new("Projects");
    human.push_summary("Total", entries.len().to_string());
    for entry in &entries {
        let project = &entry.project;
        human.push_detail(format!(
            "{} {} ({}; producer {}; {} tasks) {}",
            project.id,
            project.name,
            project.client,
            project.producer,
            entry.tasks,
            progress_bar(entry.percent)
        ));
    }

    let output = ProjectListOutput {
        total: entries.len(),
        projects: entries,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project list",
        &output,
        Some(&human),
    )
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let id = options.id.trim().to_string();
    let field = ProjectField::parse(&options.field, &options.value, ctx.tracker.config())?;

    let mut human = HumanOutput::new("Project updated");
    if let ProjectField::Id(new_id) = &field {
        if *new_id != id && ctx.tracker.working_set().project(new_id).is_some() {
            return Err(Error::invalid_value(
                "id",
                format!("project id '{new_id}' is already in use"),
            ));
        }
        let attached = tasks_of(ctx.tracker.tasks(), &id);
        if *new_id != id && !attached.is_empty() {
            human.push_warning(format!(
                "{} task(s) still reference {id}: {}",
                attached.len(),
                attached.join(", ")
            ));
        }
    }

    let name = field.name();
    let target_id = match &field {
        ProjectField::Id(new_id) => new_id.clone(),
        _ => id.clone(),
    };
    let updated = ctx.tracker.update_project(&id, field);
    let project = if updated {
        ctx.tracker.working_set().project(&target_id).cloned()
    } else {
        None
    };

    human.push_summary("ID", id.clone());
    human.push_summary("Field", name);
    if !updated {
        human.push_warning(format!("no project with id {id}; nothing changed"));
    }
    push_save_warning(&ctx.tracker, &mut human);

    let output = ProjectSetOutput {
        id,
        field: name,
        updated,
        project,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project set",
        &output,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let id = options.id.trim().to_string();
    let removed = ctx.tracker.delete_project(&id);
    let orphaned_tasks = if removed {
        tasks_of(ctx.tracker.tasks(), &id)
    } else {
        Vec::new()
    };

    let mut human = HumanOutput::new("Project removed");
    human.push_summary("ID", id.clone());
    if !removed {
        human.push_warning(format!("no project with id {id}; nothing changed"));
    }
    if !orphaned_tasks.is_empty() {
        human.push_warning(format!(
            "{} task(s) kept with projectId {id}: {}",
            orphaned_tasks.len(),
            orphaned_tasks.join(", ")
        ));
    }
    push_save_warning(&ctx.tracker, &mut human);

    let output = ProjectRmOutput {
        id,
        removed,
        orphaned_tasks,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "project rm",
        &output,
        Some(&human),
    )
}

fn tasks_of(tasks: &[crate::model::Task], project_id: &str) -> Vec<String> {
    tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .map(|task| task.id.clone())
        .collect()
}

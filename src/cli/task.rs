//! reeltrack task command implementations.

use std::path::PathBuf;

use serde::Serialize;

use crate::cli::{load_context, push_save_warning};
use crate::error::{Error, Result};
use crate::fields::{self, TaskField};
use crate::metrics::ProjectFilter;
use crate::output::{emit_success, progress_bar, HumanOutput, OutputOptions};
use crate::tracker::TaskRow;

pub struct NewOptions {
    pub name: Option<String>,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ListOptions {
    pub project: String,
    pub data_dir: Option<PathBuf>,
    pub today: Option<String>,
    pub json: bool,
    pub quiet: bool,
}

pub struct ShowOptions {
    pub id: String,
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
struct TaskListOutput {
    filter: String,
    total: usize,
    tasks: Vec<TaskRow>,
}

#[derive(Serialize)]
struct TaskSetOutput {
    id: String,
    field: &'static str,
    updated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    task: Option<TaskRow>,
}

#[derive(Serialize)]
struct TaskRmOutput {
    id: String,
    removed: bool,
    dangling_dependents: Vec<String>,
}

pub fn run_new(options: NewOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let name = options
        .name
        .as_deref()
        .map(|name| fields::required("name", name))
        .transpose()?;

    let task = ctx.tracker.create_task(name);
    let row = ctx
        .tracker
        .task_row(&task.id, &ctx.today)
        .ok_or_else(|| Error::OperationFailed(format!("created task {} not found", task.id)))?;

    let mut human = HumanOutput::new("Task created");
    human.push_summary("ID", row.task.id.clone());
    human.push_summary("Name", row.task.name.clone());
    human.push_summary("Project", format!("{} ({})", row.project, row.task.project_id));
    human.push_summary("Assignee", row.task.assignee.clone());
    push_save_warning(&ctx.tracker, &mut human);
    human.push_next_step(format!("reeltrack task set {} <field> <value>", row.task.id));

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task new",
        &row,
        Some(&human),
    )
}

pub fn run_list(options: ListOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.today)?;
    let filter: ProjectFilter = options.project.parse()?;
    let rows = ctx.tracker.task_rows(&filter, &ctx.today);

    let mut human = HumanOutput::new("Tasks");
    human.push_summary("Total", rows.len().to_string());
    if let ProjectFilter::Project(id) = &filter {
        human.push_summary("Project", id.clone());
        if ctx.tracker.working_set().project(id).is_none() {
            human.push_warning(format!("no project with id {id}"));
        }
    }
    for row in &rows {
        human.push_detail(format_row(row));
    }

    let output = TaskListOutput {
        filter: filter.label().to_string(),
        total: rows.len(),
        tasks: rows,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task list",
        &output,
        Some(&human),
    )
}

pub fn run_show(options: ShowOptions) -> Result<()> {
    let ctx = load_context(options.data_dir, options.today)?;
    let id = options.id.trim();
    let row = ctx
        .tracker
        .task_row(id, &ctx.today)
        .ok_or_else(|| Error::InvalidArgument(format!("task not found: {id}")))?;
    let task = &row.task;

    let mut human = HumanOutput::new(format!("Task {}", task.id));
    human.push_summary("Name", task.name.clone());
    human.push_summary("Project", format!("{} ({})", row.project, task.project_id));
    human.push_summary("Stage", task.stage.to_string());
    human.push_summary("Assignee", task.assignee.clone());
    human.push_summary("Priority", task.priority.to_string());
    human.push_summary("Status", task.status.to_string());
    human.push_summary("Progress", progress_bar(row.effective_pct));
    match task.depends_on.as_deref() {
        Some(dep) => human.push_summary("Depends on", format!("{dep} ({})", row.readiness)),
        None => human.push_summary("Depends on", format!("- ({})", row.readiness)),
    }
    human.push_summary("Start", task.start_date.clone().unwrap_or_default());
    human.push_summary("Due", task.due_date.clone().unwrap_or_default());
    human.push_summary("Actual end", task.actual_end.clone().unwrap_or_default());
    if row.overdue {
        human.push_warning(format!("overdue (due {})", task.due_date.as_deref().unwrap_or("")));
    }
    if let Some(notes) = task.notes.as_deref() {
        human.push_line("Notes", notes);
    }

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task show",
        &row,
        Some(&human),
    )
}

pub fn run_set(options: SetOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let id = options.id.trim().to_string();
    let field = TaskField::parse(&options.field, &options.value, ctx.tracker.config())?;

    let mut human = HumanOutput::new("Task updated");
    match &field {
        TaskField::ProjectId(project_id) if ctx.tracker.working_set().project(project_id).is_none() => {
            return Err(Error::invalid_value(
                "projectId",
                format!("no project with id '{project_id}'"),
            ));
        }
        TaskField::DependsOn(Some(dep)) if *dep == id => {
            human.push_warning(format!("{id} depends on itself and will always wait"));
        }
        TaskField::DependsOn(Some(dep)) if ctx.tracker.working_set().task(dep).is_none() => {
            human.push_warning(format!("no task with id {dep}; {id} will wait"));
        }
        _ => {}
    }

    let name = field.name();
    let updated = ctx.tracker.update_task(&id, field);
    let row = ctx.tracker.task_row(&id, &ctx.today);

    human.push_summary("ID", id.clone());
    human.push_summary("Field", name);
    match &row {
        Some(row) if updated => {
            human.push_summary("Progress", progress_bar(row.effective_pct));
            human.push_summary("Readiness", row.readiness.to_string());
        }
        _ => human.push_warning(format!("no task with id {id}; nothing changed")),
    }
    push_save_warning(&ctx.tracker, &mut human);

    let output = TaskSetOutput {
        id,
        field: name,
        updated,
        task: row,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task set",
        &output,
        Some(&human),
    )
}

pub fn run_rm(options: RmOptions) -> Result<()> {
    let mut ctx = load_context(options.data_dir, options.today)?;
    let id = options.id.trim().to_string();
    let removed = ctx.tracker.delete_task(&id);

    let dangling_dependents: Vec<String> = if removed {
        ctx.tracker
            .tasks()
            .iter()
            .filter(|task| task.depends_on.as_deref() == Some(id.as_str()))
            .map(|task| task.id.clone())
            .collect()
    } else {
        Vec::new()
    };

    let mut human = HumanOutput::new("Task removed");
    human.push_summary("ID", id.clone());
    if !removed {
        human.push_warning(format!("no task with id {id}; nothing changed"));
    }
    for dependent in &dangling_dependents {
        human.push_warning(format!("{dependent} depends on {id} and will now wait"));
    }
    push_save_warning(&ctx.tracker, &mut human);

    let output = TaskRmOutput {
        id,
        removed,
        dangling_dependents,
    };

    emit_success(
        OutputOptions {
            json: options.json,
            quiet: options.quiet,
        },
        "task rm",
        &output,
        Some(&human),
    )
}

fn format_row(row: &TaskRow) -> String {
    let task = &row.task;
    let mut line = format!(
        "[{}][{}] {} {} ({}; {}; {})",
        task.status, row.badge, task.id, task.name, row.project, task.stage, task.assignee
    );
    if let Some(dep) = task.depends_on.as_deref() {
        line.push_str(&format!(" after {dep}: {}", row.readiness));
    }
    if let Some(due) = task.due_date.as_deref() {
        line.push_str(&format!(" due {due}"));
    }
    line
}

//! Aggregate delivery metrics.
//!
//! Every function recomputes from the task slice it is handed. Callers apply
//! the project filter first (see [`ProjectFilter`]); only per-project
//! progress looks at the full task collection.

use std::collections::HashMap;
use std::str::FromStr;

use serde::Serialize;

use crate::error::{Error, Result};
use crate::model::{Project, Stage, Task, TaskStatus};
use crate::rules::{effective_pct, is_on_time, is_overdue};

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StatusCount {
    pub status: TaskStatus,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct StageCount {
    pub stage: Stage,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AssigneeCount {
    pub assignee: String,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProjectProgress {
    pub project_id: String,
    pub name: String,
    pub tasks: usize,
    pub percent: u8,
}

/// Which tasks the dashboard and task list look at.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ProjectFilter {
    #[default]
    All,
    Project(String),
}

impl ProjectFilter {
    pub fn matches(&self, task: &Task) -> bool {
        match self {
            ProjectFilter::All => true,
            ProjectFilter::Project(id) => task.project_id == *id,
        }
    }

    pub fn apply<'a>(&self, tasks: &'a [Task]) -> Vec<&'a Task> {
        tasks.iter().filter(|task| self.matches(task)).collect()
    }

    pub fn label(&self) -> &str {
        match self {
            ProjectFilter::All => "all",
            ProjectFilter::Project(id) => id,
        }
    }
}

impl FromStr for ProjectFilter {
    type Err = Error;

    fn from_str(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidArgument(
                "project filter cannot be empty".to_string(),
            ));
        }
        if trimmed.eq_ignore_ascii_case("all") {
            return Ok(ProjectFilter::All);
        }
        Ok(ProjectFilter::Project(trimmed.to_string()))
    }
}

/// Counts for every status in enum order, zero-filled.
pub fn status_distribution<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<StatusCount> {
    let mut counts = [0usize; TaskStatus::ALL.len()];
    for task in tasks {
        if let Some(slot) = TaskStatus::ALL.iter().position(|status| *status == task.status) {
            counts[slot] += 1;
        }
    }
    TaskStatus::ALL
        .iter()
        .zip(counts)
        .map(|(status, count)| StatusCount {
            status: *status,
            count,
        })
        .collect()
}

/// Counts for every stage in enum order, zero-filled.
pub fn stage_distribution<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<StageCount> {
    let mut counts = [0usize; Stage::ALL.len()];
    for task in tasks {
        if let Some(slot) = Stage::ALL.iter().position(|stage| *stage == task.stage) {
            counts[slot] += 1;
        }
    }
    Stage::ALL
        .iter()
        .zip(counts)
        .map(|(stage, count)| StageCount {
            stage: *stage,
            count,
        })
        .collect()
}

/// Counts per assignee actually present, in first-seen order.
pub fn assignee_distribution<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> Vec<AssigneeCount> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<AssigneeCount> = Vec::new();
    for task in tasks {
        match slots.get(task.assignee.as_str()) {
            Some(&slot) => out[slot].count += 1,
            None => {
                slots.insert(task.assignee.as_str(), out.len());
                out.push(AssigneeCount {
                    assignee: task.assignee.clone(),
                    count: 1,
                });
            }
        }
    }
    out
}

/// Rounded percentage of Done tasks delivered on or before their due date.
/// 0 when nothing is Done.
pub fn on_time_rate<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> u8 {
    let mut done = 0usize;
    let mut on_time = 0usize;
    for task in tasks.into_iter().filter(|task| task.status == TaskStatus::Done) {
        done += 1;
        if is_on_time(task) {
            on_time += 1;
        }
    }
    rounded_pct(on_time, done)
}

pub fn overdue_count<'a>(tasks: impl IntoIterator<Item = &'a Task>, today: &str) -> usize {
    tasks
        .into_iter()
        .filter(|task| is_overdue(task, today))
        .count()
}

pub fn completed_count<'a>(tasks: impl IntoIterator<Item = &'a Task>) -> usize {
    tasks
        .into_iter()
        .filter(|task| task.status == TaskStatus::Done)
        .count()
}

/// Mean effective percent for one project over all tasks, 0 when it has none.
pub fn project_percent(project_id: &str, tasks: &[Task]) -> u8 {
    let (count, sum) = tasks
        .iter()
        .filter(|task| task.project_id == project_id)
        .fold((0usize, 0u64), |(count, sum), task| {
            (count + 1, sum + u64::from(effective_pct(task)))
        });
    if count == 0 {
        return 0;
    }
    (sum as f64 / count as f64).round() as u8
}

/// Progress for every project, in project-collection order.
pub fn project_progress(projects: &[Project], tasks: &[Task]) -> Vec<ProjectProgress> {
    projects
        .iter()
        .map(|project| ProjectProgress {
            project_id: project.id.clone(),
            name: project.name.clone(),
            tasks: tasks
                .iter()
                .filter(|task| task.project_id == project.id)
                .count(),
            percent: project_percent(&project.id, tasks),
        })
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub filter: String,
    pub today: String,
    pub projects_total: usize,
    pub tasks_total: usize,
    pub tasks_completed: usize,
    pub tasks_overdue: usize,
    pub on_time_rate: u8,
    pub statuses: Vec<StatusCount>,
    pub stages: Vec<StageCount>,
    pub assignees: Vec<AssigneeCount>,
    pub project_progress: Vec<ProjectProgress>,
}

pub fn dashboard(
    projects: &[Project],
    tasks: &[Task],
    filter: &ProjectFilter,
    today: &str,
) -> Dashboard {
    let filtered = filter.apply(tasks);
    Dashboard {
        filter: filter.label().to_string(),
        today: today.to_string(),
        projects_total: projects.len(),
        tasks_total: filtered.len(),
        tasks_completed: completed_count(filtered.iter().copied()),
        tasks_overdue: overdue_count(filtered.iter().copied(), today),
        on_time_rate: on_time_rate(filtered.iter().copied()),
        statuses: status_distribution(filtered.iter().copied()),
        stages: stage_distribution(filtered.iter().copied()),
        assignees: assignee_distribution(filtered.iter().copied()),
        project_progress: project_progress(projects, tasks),
    }
}

fn rounded_pct(numerator: usize, denominator: usize) -> u8 {
    if denominator == 0 {
        return 0;
    }
    (numerator as f64 / denominator as f64 * 100.0).round() as u8
}

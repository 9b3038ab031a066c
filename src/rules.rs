//! Derivation rules over single tasks.
//!
//! Everything here is a pure function of its inputs. "Today" is always
//! passed in as a `YYYY-MM-DD` string so the rules never read a clock.

use std::collections::HashMap;

use serde::Serialize;

use crate::model::{Project, Task, TaskStatus};

/// Whether a task's declared upstream dependency has reached Done.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub enum Readiness {
    Ready,
    Wait,
}

impl Readiness {
    pub fn as_str(self) -> &'static str {
        match self {
            Readiness::Ready => "Ready",
            Readiness::Wait => "Wait",
        }
    }
}

impl std::fmt::Display for Readiness {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Id lookup over a task collection.
///
/// Built from a slice; when ids repeat, the later entry wins.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex<'a> {
    by_id: HashMap<&'a str, &'a Task>,
}

impl<'a> TaskIndex<'a> {
    pub fn new(tasks: &'a [Task]) -> Self {
        Self {
            by_id: tasks.iter().map(|task| (task.id.as_str(), task)).collect(),
        }
    }

    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.by_id.get(id).copied()
    }

    pub fn len(&self) -> usize {
        self.by_id.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_id.is_empty()
    }
}

impl<'a> FromIterator<&'a Task> for TaskIndex<'a> {
    fn from_iter<I: IntoIterator<Item = &'a Task>>(iter: I) -> Self {
        Self {
            by_id: iter.into_iter().map(|task| (task.id.as_str(), task)).collect(),
        }
    }
}

pub fn auto_pct_from_status(status: TaskStatus) -> u8 {
    match status {
        TaskStatus::Done => 100,
        TaskStatus::InProgress => 50,
        TaskStatus::Blocked | TaskStatus::OnHold => 25,
        TaskStatus::NotStarted => 0,
    }
}

/// Manual override when present, else the status-derived percent.
pub fn effective_pct(task: &Task) -> u8 {
    match task.manual_pct {
        Some(pct) => pct.min(100),
        None => auto_pct_from_status(task.status),
    }
}

/// Clamp a user-entered percent into `0..=100`.
pub fn clamp_pct(value: i64) -> u8 {
    value.clamp(0, 100) as u8
}

/// `Ready` when no dependency is named or the named task is Done. Ids are
/// matched exactly; an id missing from `index` is `Wait`.
pub fn dependency_ready(depends_on: Option<&str>, index: &TaskIndex<'_>) -> Readiness {
    let depends_on = match depends_on {
        None | Some("") => return Readiness::Ready,
        Some(id) => id,
    };
    match index.get(depends_on) {
        Some(upstream) if upstream.status == TaskStatus::Done => Readiness::Ready,
        _ => Readiness::Wait,
    }
}

pub fn is_overdue(task: &Task, today: &str) -> bool {
    if task.status == TaskStatus::Done {
        return false;
    }
    present(task.due_date.as_deref()).is_some_and(|due| due < today)
}

/// Completed on or before its due date. `<=` is inclusive; a missing end or
/// due date never counts as on time.
pub fn is_on_time(task: &Task) -> bool {
    match (present(task.actual_end.as_deref()), present(task.due_date.as_deref())) {
        (Some(end), Some(due)) => end <= due,
        _ => false,
    }
}

fn present(date: Option<&str>) -> Option<&str> {
    date.filter(|value| !value.trim().is_empty())
}

/// Live name of the task's project, or the creation-time snapshot when the
/// project no longer exists.
pub fn resolve_project_name<'a>(task: &'a Task, projects: &'a [Project]) -> &'a str {
    projects
        .iter()
        .find(|project| project.id == task.project_id)
        .map(|project| project.name.as_str())
        .unwrap_or(task.project_name.as_str())
}

/// Short status label for a task row: `Done`, `Overdue`, or the percent.
pub fn task_badge(task: &Task, today: &str) -> String {
    if task.status == TaskStatus::Done {
        "Done".to_string()
    } else if is_overdue(task, today) {
        "Overdue".to_string()
    } else {
        format!("{}%", effective_pct(task))
    }
}

//! The tracker: owner of the working set and the only writer to it.
//!
//! A `Tracker` is opened over an injected [`Store`]. Reads recompute from the
//! current working set every time; mutations change it and then mirror the
//! whole set to the store. Unknown ids are ignored (the mutation returns
//! `false` and nothing is saved). A failed save is logged and kept in
//! [`Tracker::last_save_error`]; the in-memory change stands.

use serde::Serialize;

use crate::config::Config;
use crate::fields::{ProjectField, TaskField};
use crate::metrics::{self, Dashboard, ProjectFilter};
use crate::model::{format_id, Priority, Project, Stage, Task, TaskStatus, WorkingSet};
use crate::rules::{
    dependency_ready, effective_pct, is_overdue, resolve_project_name, task_badge, Readiness,
    TaskIndex,
};
use crate::seed::seed_working_set;
use crate::store::Store;

/// A task with everything the presentation layer derives for its row.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRow {
    #[serde(flatten)]
    pub task: Task,
    /// Live project name (snapshot when the project is gone)
    pub project: String,
    pub readiness: Readiness,
    pub effective_pct: u8,
    pub overdue: bool,
    pub badge: String,
}

pub struct Tracker<S: Store> {
    store: S,
    config: Config,
    set: WorkingSet,
    seeded: bool,
    last_save_error: Option<String>,
}

impl<S: Store> Tracker<S> {
    /// Hydrate from the store, or start from the seed dataset.
    pub fn open(store: S, config: Config) -> Self {
        let (mut set, seeded) = match store.load() {
            Some(set) => (set, false),
            None => {
                tracing::info!("no saved data, starting from seed dataset");
                (seed_working_set(), true)
            }
        };
        set.normalize_counters();
        Self {
            store,
            config,
            set,
            seeded,
            last_save_error: None,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn working_set(&self) -> &WorkingSet {
        &self.set
    }

    pub fn projects(&self) -> &[Project] {
        &self.set.projects
    }

    pub fn tasks(&self) -> &[Task] {
        &self.set.tasks
    }

    /// True when the store had nothing usable and the seed was loaded.
    pub fn was_seeded(&self) -> bool {
        self.seeded
    }

    pub fn last_save_error(&self) -> Option<&str> {
        self.last_save_error.as_deref()
    }

    pub fn index(&self) -> TaskIndex<'_> {
        TaskIndex::new(&self.set.tasks)
    }

    pub fn filtered_tasks(&self, filter: &ProjectFilter) -> Vec<&Task> {
        filter.apply(&self.set.tasks)
    }

    pub fn dashboard(&self, filter: &ProjectFilter, today: &str) -> Dashboard {
        metrics::dashboard(&self.set.projects, &self.set.tasks, filter, today)
    }

    pub fn task_rows(&self, filter: &ProjectFilter, today: &str) -> Vec<TaskRow> {
        let index = self.index();
        self.filtered_tasks(filter)
            .into_iter()
            .map(|task| self.row(task, &index, today))
            .collect()
    }

    pub fn task_row(&self, id: &str, today: &str) -> Option<TaskRow> {
        let index = self.index();
        self.set
            .task(id)
            .map(|task| self.row(task, &index, today))
    }

    fn row(&self, task: &Task, index: &TaskIndex<'_>, today: &str) -> TaskRow {
        TaskRow {
            project: resolve_project_name(task, &self.set.projects).to_string(),
            readiness: dependency_ready(task.depends_on.as_deref(), index),
            effective_pct: effective_pct(task),
            overdue: is_overdue(task, today),
            badge: task_badge(task, today),
            task: task.clone(),
        }
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Prepend a task with default values and return it. `name` replaces the
    /// default name; the task is saved once, already named.
    pub fn create_task(&mut self, name: Option<String>) -> Task {
        let seq = self.set.next_task_seq;
        let (project_id, project_name) = match self.set.projects.first() {
            Some(project) => (project.id.clone(), project.name.clone()),
            None => (
                self.config.defaults.fallback_project_id.clone(),
                self.config.defaults.fallback_project_name.clone(),
            ),
        };
        let task = Task {
            id: format_id(&self.config.ids.task_prefix, seq, self.config.ids.width),
            project_id,
            project_name,
            stage: Stage::PreProduction,
            name: name.unwrap_or_else(|| self.config.defaults.task_name.clone()),
            depends_on: None,
            assignee: self.config.default_member().to_string(),
            priority: Priority::Medium,
            status: TaskStatus::NotStarted,
            start_date: None,
            due_date: None,
            actual_end: None,
            manual_pct: None,
            notes: None,
        };
        self.set.next_task_seq = seq.saturating_add(1);
        self.set.tasks.insert(0, task.clone());
        tracing::info!(task_id = %task.id, "created task");
        self.persist();
        task
    }

    /// Prepend a project with placeholder values and return it. `name`
    /// replaces the placeholder name.
    pub fn create_project(&mut self, name: Option<String>) -> Project {
        let seq = self.set.next_project_seq;
        let project = Project {
            id: format_id(&self.config.ids.project_prefix, seq, self.config.ids.width),
            name: name.unwrap_or_else(|| self.config.defaults.project_name.clone()),
            client: self.config.defaults.client.clone(),
            producer: self.config.default_member().to_string(),
            start_date: None,
            end_date: None,
        };
        self.set.next_project_seq = seq.saturating_add(1);
        self.set.projects.insert(0, project.clone());
        tracing::info!(project_id = %project.id, "created project");
        self.persist();
        project
    }

    /// Replace one field on the task with `id`. `projectName` is left alone
    /// when `projectId` changes.
    pub fn update_task(&mut self, id: &str, field: TaskField) -> bool {
        let Some(task) = self.set.tasks.iter_mut().find(|task| task.id == id) else {
            tracing::debug!(task_id = id, "update ignored, no such task");
            return false;
        };
        let name = field.name();
        field.apply(task);
        tracing::info!(task_id = id, field = name, "updated task");
        self.persist();
        true
    }

    /// Replace one field on the project with `id`. Renames do not touch the
    /// `projectName` snapshot on tasks, and id edits do not re-point tasks.
    /// An edited id raises the project counter past it.
    pub fn update_project(&mut self, id: &str, field: ProjectField) -> bool {
        let Some(project) = self.set.projects.iter_mut().find(|project| project.id == id) else {
            tracing::debug!(project_id = id, "update ignored, no such project");
            return false;
        };
        let name = field.name();
        field.apply(project);
        self.set.normalize_counters();
        tracing::info!(project_id = id, field = name, "updated project");
        self.persist();
        true
    }

    /// Remove the task. Other tasks' `dependsOn` may now dangle.
    pub fn delete_task(&mut self, id: &str) -> bool {
        let before = self.set.tasks.len();
        self.set.tasks.retain(|task| task.id != id);
        if self.set.tasks.len() == before {
            tracing::debug!(task_id = id, "delete ignored, no such task");
            return false;
        }
        tracing::info!(task_id = id, "deleted task");
        self.persist();
        true
    }

    /// Remove the project. Its tasks stay and keep their `projectId`.
    pub fn delete_project(&mut self, id: &str) -> bool {
        let before = self.set.projects.len();
        self.set.projects.retain(|project| project.id != id);
        if self.set.projects.len() == before {
            tracing::debug!(project_id = id, "delete ignored, no such project");
            return false;
        }
        tracing::info!(project_id = id, "deleted project");
        self.persist();
        true
    }

    fn persist(&mut self) {
        match self.store.save(&self.set) {
            Ok(()) => {
                self.seeded = false;
                self.last_save_error = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "failed to save working set");
                self.last_save_error = Some(err.to_string());
            }
        }
    }
}

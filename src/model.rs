//! Data model for the tracker.
//!
//! Projects group tasks. Tasks refer to their project and to an optional
//! upstream task by plain id; neither reference is enforced, so both may
//! dangle after a delete. The serialized shape (camelCase keys, display
//! strings for enum values) is what the JSON store and export write.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Production phase a task belongs to.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Stage {
    #[serde(rename = "Pre-Production")]
    PreProduction,
    #[serde(rename = "Production")]
    Production,
    #[serde(rename = "Post-Production")]
    PostProduction,
    #[serde(rename = "Delivery")]
    Delivery,
}

impl Stage {
    pub const ALL: [Stage; 4] = [
        Stage::PreProduction,
        Stage::Production,
        Stage::PostProduction,
        Stage::Delivery,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Stage::PreProduction => "Pre-Production",
            Stage::Production => "Production",
            Stage::PostProduction => "Post-Production",
            Stage::Delivery => "Delivery",
        }
    }
}

/// Task state. Drives the default percent-complete.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum TaskStatus {
    #[serde(rename = "Not Started")]
    NotStarted,
    #[serde(rename = "In Progress")]
    InProgress,
    #[serde(rename = "Blocked")]
    Blocked,
    #[serde(rename = "On Hold")]
    OnHold,
    #[serde(rename = "Done")]
    Done,
}

impl TaskStatus {
    pub const ALL: [TaskStatus; 5] = [
        TaskStatus::NotStarted,
        TaskStatus::InProgress,
        TaskStatus::Blocked,
        TaskStatus::OnHold,
        TaskStatus::Done,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TaskStatus::NotStarted => "Not Started",
            TaskStatus::InProgress => "In Progress",
            TaskStatus::Blocked => "Blocked",
            TaskStatus::OnHold => "On Hold",
            TaskStatus::Done => "Done",
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Priority {
    Low,
    Medium,
    High,
    Critical,
}

impl Priority {
    pub const ALL: [Priority; 4] = [
        Priority::Low,
        Priority::Medium,
        Priority::High,
        Priority::Critical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::Low => "Low",
            Priority::Medium => "Medium",
            Priority::High => "High",
            Priority::Critical => "Critical",
        }
    }
}

macro_rules! display_and_parse {
    ($ty:ty, $label:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = Error;

            fn from_str(input: &str) -> Result<Self> {
                let wanted = normalize_label(input);
                <$ty>::ALL
                    .iter()
                    .copied()
                    .find(|value| normalize_label(value.as_str()) == wanted)
                    .ok_or_else(|| {
                        let expected: Vec<&str> =
                            <$ty>::ALL.iter().map(|value| value.as_str()).collect();
                        Error::invalid_value(
                            $label,
                            format!("'{}' (expected one of: {})", input.trim(), expected.join(", ")),
                        )
                    })
            }
        }
    };
}

display_and_parse!(Stage, "stage");
display_and_parse!(TaskStatus, "status");
display_and_parse!(Priority, "priority");

/// Lowercase and drop separators so `In Progress`, `in_progress` and
/// `in-progress` all compare equal.
fn normalize_label(value: &str) -> String {
    value
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, ' ' | '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: String,
    pub name: String,
    pub client: String,
    pub producer: String,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub end_date: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub project_id: String,
    /// Name of the project when the task was created. Not refreshed on
    /// rename; see `rules::resolve_project_name` for the live name.
    pub project_name: String,
    pub stage: Stage,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub depends_on: Option<String>,
    pub assignee: String,
    pub priority: Priority,
    pub status: TaskStatus,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub start_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub due_date: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "blank_as_none"
    )]
    pub actual_end: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        deserialize_with = "lenient_pct"
    )]
    pub manual_pct: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// The persisted `{projects, tasks}` pair plus the id counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct WorkingSet {
    pub projects: Vec<Project>,
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub next_project_seq: u32,
    #[serde(default)]
    pub next_task_seq: u32,
}

impl WorkingSet {
    pub fn new(projects: Vec<Project>, tasks: Vec<Task>) -> Self {
        let mut set = Self {
            projects,
            tasks,
            next_project_seq: 0,
            next_task_seq: 0,
        };
        set.normalize_counters();
        set
    }

    /// Raise both counters past every id already in use.
    ///
    /// Data written before the counters existed deserializes them as 0, and
    /// hand-edited files may carry ids beyond the stored counter.
    pub fn normalize_counters(&mut self) {
        let project_floor = next_seq(
            self.projects.iter().map(|project| project.id.as_str()),
            self.projects.len(),
        );
        let task_floor = next_seq(self.tasks.iter().map(|task| task.id.as_str()), self.tasks.len());
        self.next_project_seq = self.next_project_seq.max(project_floor);
        self.next_task_seq = self.next_task_seq.max(task_floor);
    }

    pub fn project(&self, id: &str) -> Option<&Project> {
        self.projects.iter().find(|project| project.id == id)
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }
}

/// Accept any JSON number for a stored percent, rounding and clamping it
/// into 0..=100 instead of rejecting the whole working set.
fn lenient_pct<'de, D>(deserializer: D) -> std::result::Result<Option<u8>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<f64>::deserialize(deserializer)?;
    Ok(raw
        .filter(|value| value.is_finite())
        .map(|value| value.round().clamp(0.0, 100.0) as u8))
}

/// Read an optional string, treating blank text like a missing value.
/// Cleared date inputs are stored as `""`.
fn blank_as_none<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<String>::deserialize(deserializer)?;
    Ok(raw.filter(|value| !value.trim().is_empty()))
}

fn next_seq<'a>(ids: impl Iterator<Item = &'a str>, len: usize) -> u32 {
    let highest = ids.filter_map(numeric_suffix).max().unwrap_or(0);
    let by_len = u32::try_from(len).unwrap_or(u32::MAX);
    highest.max(by_len).saturating_add(1)
}

/// `T-007` -> 7. Ids without a numeric tail after the last `-` yield `None`.
pub fn numeric_suffix(id: &str) -> Option<u32> {
    let (_, tail) = id.rsplit_once('-')?;
    if tail.is_empty() || !tail.chars().all(|ch| ch.is_ascii_digit()) {
        return None;
    }
    tail.parse().ok()
}

/// Render a sequential id such as `T-001`.
pub fn format_id(prefix: &str, seq: u32, width: usize) -> String {
    format!("{prefix}-{seq:0width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enums_round_trip_display_names() {
        let json = serde_json::to_string(&TaskStatus::InProgress).expect("serialize");
        assert_eq!(json, "\"In Progress\"");
        let stage: Stage = serde_json::from_str("\"Post-Production\"").expect("deserialize");
        assert_eq!(stage, Stage::PostProduction);
    }

    #[test]
    fn parse_accepts_loose_spellings() {
        assert_eq!("in_progress".parse::<TaskStatus>().unwrap(), TaskStatus::InProgress);
        assert_eq!("on-hold".parse::<TaskStatus>().unwrap(), TaskStatus::OnHold);
        assert_eq!("preproduction".parse::<Stage>().unwrap(), Stage::PreProduction);
        assert_eq!("CRITICAL".parse::<Priority>().unwrap(), Priority::Critical);
        assert!("finished".parse::<TaskStatus>().is_err());
    }

    #[test]
    fn task_reads_null_and_missing_optionals() {
        let raw = r#"{
            "id": "T-009", "projectId": "P-001", "projectName": "Alpha",
            "stage": "Delivery", "name": "Master", "assignee": "Audio",
            "priority": "Low", "status": "Done", "dueDate": null
        }"#;
        let task: Task = serde_json::from_str(raw).expect("parse task");
        assert_eq!(task.due_date, None);
        assert_eq!(task.depends_on, None);
        let back = serde_json::to_value(&task).expect("to value");
        assert!(back.get("dueDate").is_none());
        assert_eq!(back["projectId"], "P-001");
    }

    #[test]
    fn stored_fractional_pct_is_rounded() {
        let raw = r#"{
            "id": "T-001", "projectId": "P-001", "projectName": "Alpha",
            "stage": "Production", "name": "Shoot", "assignee": "Ravi",
            "priority": "High", "status": "In Progress", "manualPct": 62.5
        }"#;
        let task: Task = serde_json::from_str(raw).expect("parse task");
        assert_eq!(task.manual_pct, Some(63));
    }

    #[test]
    fn blank_dates_read_as_missing() {
        let raw = r#"{
            "id": "T-002", "projectId": "P-001", "projectName": "Alpha",
            "stage": "Production", "name": "Shoot", "assignee": "Ravi",
            "priority": "High", "status": "Done",
            "startDate": "", "dueDate": "  ", "actualEnd": ""
        }"#;
        let task: Task = serde_json::from_str(raw).expect("parse task");
        assert_eq!(task.start_date, None);
        assert_eq!(task.due_date, None);
        assert_eq!(task.actual_end, None);

        let project: Project = serde_json::from_str(
            r#"{"id":"P-001","name":"Alpha","client":"C","producer":"Karan","startDate":"","endDate":"2025-09-01"}"#,
        )
        .expect("parse project");
        assert_eq!(project.start_date, None);
        assert_eq!(project.end_date.as_deref(), Some("2025-09-01"));
    }

    #[test]
    fn counters_clear_existing_ids() {
        let mut set = WorkingSet::default();
        set.tasks.push(sample_task("T-010"));
        set.tasks.push(sample_task("custom"));
        set.normalize_counters();
        assert_eq!(set.next_task_seq, 11);
        assert_eq!(set.next_project_seq, 1);
    }

    #[test]
    fn format_id_pads() {
        assert_eq!(format_id("T", 7, 3), "T-007");
        assert_eq!(format_id("P", 1234, 3), "P-1234");
        assert_eq!(numeric_suffix("T-042"), Some(42));
        assert_eq!(numeric_suffix("T-"), None);
        assert_eq!(numeric_suffix("nodash"), None);
    }

    fn sample_task(id: &str) -> Task {
        Task {
            id: id.to_string(),
            project_id: "P-001".to_string(),
            project_name: "Alpha".to_string(),
            stage: Stage::Production,
            name: "Shoot".to_string(),
            depends_on: None,
            assignee: "Tushar".to_string(),
            priority: Priority::High,
            status: TaskStatus::NotStarted,
            start_date: None,
            due_date: None,
            actual_end: None,
            manual_pct: None,
            notes: None,
        }
    }
}

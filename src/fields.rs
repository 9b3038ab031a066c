//! Typed single-field updates for tasks and projects.
//!
//! `TaskField` / `ProjectField` carry one new value each; the tracker applies
//! them verbatim. `parse` is the input boundary for the CLI: it maps a field
//! name and raw string into a typed value, checking enum spellings, roster
//! membership and date shape. Empty values clear optional fields.

use chrono::NaiveDate;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::{Priority, Project, Stage, Task, TaskStatus};
use crate::rules::clamp_pct;

pub const TASK_FIELDS: [&str; 13] = [
    "projectId",
    "projectName",
    "stage",
    "name",
    "dependsOn",
    "assignee",
    "priority",
    "status",
    "startDate",
    "dueDate",
    "actualEnd",
    "manualPct",
    "notes",
];

pub const PROJECT_FIELDS: [&str; 6] = ["id", "name", "client", "producer", "startDate", "endDate"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskField {
    ProjectId(String),
    ProjectName(String),
    Stage(Stage),
    Name(String),
    DependsOn(Option<String>),
    Assignee(String),
    Priority(Priority),
    Status(TaskStatus),
    StartDate(Option<String>),
    DueDate(Option<String>),
    ActualEnd(Option<String>),
    /// Raw user value; clamped into 0..=100 when applied.
    ManualPct(Option<i64>),
    Notes(Option<String>),
}

impl TaskField {
    pub fn name(&self) -> &'static str {
        match self {
            TaskField::ProjectId(_) => "projectId",
            TaskField::ProjectName(_) => "projectName",
            TaskField::Stage(_) => "stage",
            TaskField::Name(_) => "name",
            TaskField::DependsOn(_) => "dependsOn",
            TaskField::Assignee(_) => "assignee",
            TaskField::Priority(_) => "priority",
            TaskField::Status(_) => "status",
            TaskField::StartDate(_) => "startDate",
            TaskField::DueDate(_) => "dueDate",
            TaskField::ActualEnd(_) => "actualEnd",
            TaskField::ManualPct(_) => "manualPct",
            TaskField::Notes(_) => "notes",
        }
    }

    /// Replace exactly this field on `task`.
    pub fn apply(self, task: &mut Task) {
        match self {
            TaskField::ProjectId(value) => task.project_id = value,
            TaskField::ProjectName(value) => task.project_name = value,
            TaskField::Stage(value) => task.stage = value,
            TaskField::Name(value) => task.name = value,
            TaskField::DependsOn(value) => task.depends_on = value,
            TaskField::Assignee(value) => task.assignee = value,
            TaskField::Priority(value) => task.priority = value,
            TaskField::Status(value) => task.status = value,
            TaskField::StartDate(value) => task.start_date = value,
            TaskField::DueDate(value) => task.due_date = value,
            TaskField::ActualEnd(value) => task.actual_end = value,
            TaskField::ManualPct(value) => task.manual_pct = value.map(clamp_pct),
            TaskField::Notes(value) => task.notes = value,
        }
    }

    pub fn parse(field: &str, value: &str, config: &Config) -> Result<Self> {
        let key = normalize_field(field);
        let parsed = match key.as_str() {
            "projectid" | "project" => TaskField::ProjectId(required("projectId", value)?),
            "projectname" => TaskField::ProjectName(required("projectName", value)?),
            "stage" => TaskField::Stage(value.parse()?),
            "name" | "title" => TaskField::Name(required("name", value)?),
            "dependson" | "depends" => TaskField::DependsOn(optional(value)),
            "assignee" => TaskField::Assignee(member("assignee", value, config)?),
            "priority" => TaskField::Priority(value.parse()?),
            "status" => TaskField::Status(value.parse()?),
            "startdate" | "start" => TaskField::StartDate(date("startDate", value)?),
            "duedate" | "due" => TaskField::DueDate(date("dueDate", value)?),
            "actualend" | "end" => TaskField::ActualEnd(date("actualEnd", value)?),
            "manualpct" | "pct" | "percent" => TaskField::ManualPct(percent(value)?),
            "notes" | "note" => TaskField::Notes(optional(value)),
            _ => {
                return Err(Error::UnknownField {
                    entity: "task",
                    field: field.trim().to_string(),
                })
            }
        };
        Ok(parsed)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProjectField {
    Id(String),
    Name(String),
    Client(String),
    Producer(String),
    StartDate(Option<String>),
    EndDate(Option<String>),
}

impl ProjectField {
    pub fn name(&self) -> &'static str {
        match self {
            ProjectField::Id(_) => "id",
            ProjectField::Name(_) => "name",
            ProjectField::Client(_) => "client",
            ProjectField::Producer(_) => "producer",
            ProjectField::StartDate(_) => "startDate",
            ProjectField::EndDate(_) => "endDate",
        }
    }

    pub fn apply(self, project: &mut Project) {
        match self {
            ProjectField::Id(value) => project.id = value,
            ProjectField::Name(value) => project.name = value,
            ProjectField::Client(value) => project.client = value,
            ProjectField::Producer(value) => project.producer = value,
            ProjectField::StartDate(value) => project.start_date = value,
            ProjectField::EndDate(value) => project.end_date = value,
        }
    }

    pub fn parse(field: &str, value: &str, config: &Config) -> Result<Self> {
        let key = normalize_field(field);
        let parsed = match key.as_str() {
            "id" => ProjectField::Id(required("id", value)?),
            "name" => ProjectField::Name(required("name", value)?),
            "client" => ProjectField::Client(required("client", value)?),
            "producer" => ProjectField::Producer(member("producer", value, config)?),
            "startdate" | "start" => ProjectField::StartDate(date("startDate", value)?),
            "enddate" | "end" => ProjectField::EndDate(date("endDate", value)?),
            _ => {
                return Err(Error::UnknownField {
                    entity: "project",
                    field: field.trim().to_string(),
                })
            }
        };
        Ok(parsed)
    }
}

fn normalize_field(field: &str) -> String {
    field
        .trim()
        .chars()
        .filter(|ch| !matches!(ch, '_' | '-'))
        .flat_map(char::to_lowercase)
        .collect()
}

/// Trimmed non-empty text for `field`.
pub fn required(field: &str, value: &str) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::invalid_value(field, "cannot be empty"));
    }
    Ok(trimmed.to_string())
}

fn optional(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

fn member(field: &str, value: &str, config: &Config) -> Result<String> {
    let name = required(field, value)?;
    if !config.is_member(&name) {
        return Err(Error::invalid_value(
            field,
            format!(
                "'{name}' is not on the team roster ({})",
                config.team.roster.join(", ")
            ),
        ));
    }
    Ok(name)
}

/// Dates stay strings, but only zero-padded `YYYY-MM-DD` values are let in so
/// that string comparison matches calendar order.
pub fn date(field: &str, value: &str) -> Result<Option<String>> {
    let Some(trimmed) = optional(value) else {
        return Ok(None);
    };
    let parsed = NaiveDate::parse_from_str(&trimmed, "%Y-%m-%d")
        .map_err(|err| Error::invalid_value(field, format!("'{trimmed}' is not YYYY-MM-DD: {err}")))?;
    let canonical = parsed.format("%Y-%m-%d").to_string();
    if canonical != trimmed {
        return Err(Error::invalid_value(
            field,
            format!("'{trimmed}' must be zero-padded as {canonical}"),
        ));
    }
    Ok(Some(canonical))
}

fn percent(value: &str) -> Result<Option<i64>> {
    let Some(trimmed) = optional(value) else {
        return Ok(None);
    };
    let number: f64 = trimmed
        .parse()
        .map_err(|_| Error::invalid_value("manualPct", format!("'{trimmed}' is not a number")))?;
    if !number.is_finite() {
        return Err(Error::invalid_value("manualPct", "must be finite"));
    }
    Ok(Some(number.round() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_field_aliases() {
        let cfg = Config::default();
        assert_eq!(
            TaskField::parse("due_date", "2025-09-01", &cfg).unwrap(),
            TaskField::DueDate(Some("2025-09-01".to_string()))
        );
        assert_eq!(
            TaskField::parse("dependsOn", "", &cfg).unwrap(),
            TaskField::DependsOn(None)
        );
        assert_eq!(
            TaskField::parse("status", "done", &cfg).unwrap(),
            TaskField::Status(TaskStatus::Done)
        );
        assert_eq!(
            ProjectField::parse("producer", "Somya", &cfg).unwrap(),
            ProjectField::Producer("Somya".to_string())
        );
    }

    #[test]
    fn rejects_bad_values() {
        let cfg = Config::default();
        assert!(matches!(
            TaskField::parse("colour", "red", &cfg),
            Err(Error::UnknownField { entity: "task", .. })
        ));
        assert!(matches!(
            TaskField::parse("assignee", "Stranger", &cfg),
            Err(Error::InvalidValue { .. })
        ));
        assert!(TaskField::parse("dueDate", "2025-9-1", &cfg).is_err());
        assert!(TaskField::parse("dueDate", "2025-02-30", &cfg).is_err());
        assert!(TaskField::parse("name", "   ", &cfg).is_err());
        assert!(TaskField::parse("manualPct", "lots", &cfg).is_err());
    }

    #[test]
    fn manual_pct_is_clamped_on_apply() {
        let cfg = Config::default();
        let mut task = crate::seed::seed_tasks().remove(2);
        TaskField::parse("manualPct", "140", &cfg)
            .unwrap()
            .apply(&mut task);
        assert_eq!(task.manual_pct, Some(100));
        TaskField::ManualPct(Some(-3)).apply(&mut task);
        assert_eq!(task.manual_pct, Some(0));
        TaskField::parse("pct", "", &cfg).unwrap().apply(&mut task);
        assert_eq!(task.manual_pct, None);
    }

    #[test]
    fn field_names_are_canonical() {
        let cfg = Config::default();
        for name in TASK_FIELDS {
            let value = match name {
                "stage" => "Production",
                "priority" => "Low",
                "status" => "Done",
                "assignee" => "Ravi",
                "startDate" | "dueDate" | "actualEnd" => "2025-01-02",
                "manualPct" => "5",
                _ => "x",
            };
            let field = TaskField::parse(name, value, &cfg).unwrap();
            assert_eq!(field.name(), name);
        }
        for name in PROJECT_FIELDS {
            let value = match name {
                "producer" => "Karan",
                "startDate" | "endDate" => "2025-01-02",
                _ => "x",
            };
            assert_eq!(ProjectField::parse(name, value, &cfg).unwrap().name(), name);
        }
    }
}

//! Starter dataset used when the store holds nothing usable.
//!
//! Three projects and six tasks. T-001 through T-004 form a dependency chain;
//! T-005 and T-006 stand alone.

use crate::model::{Priority, Project, Stage, Task, TaskStatus, WorkingSet};

const TATA: &str = "Tata MF \u{2014} Sahi Investment Plan";
const DLECTA: &str = "Dlecta \u{2014} Recipe Shorts";
const EQUAL_TWO: &str = "Equal Two \u{2014} Skincare Launch";

pub fn seed_working_set() -> WorkingSet {
    WorkingSet::new(seed_projects(), seed_tasks())
}

pub fn seed_projects() -> Vec<Project> {
    vec![
        project("P-001", TATA, "Tata Mutual Fund", "Karan"),
        project("P-002", DLECTA, "Dlecta", "Somya"),
        project("P-003", EQUAL_TWO, "Equal Two", "Ravi"),
    ]
}

pub fn seed_tasks() -> Vec<Task> {
    vec![
        Task {
            actual_end: Some("2025-08-16".to_string()),
            manual_pct: Some(100),
            notes: Some("Approved by client".to_string()),
            ..task(
                "T-001",
                ("P-001", TATA),
                Stage::PreProduction,
                "Script Finalization",
                None,
                ("Ravi", Priority::High, TaskStatus::Done),
                ("2025-08-15", "2025-08-16"),
            )
        },
        Task {
            notes: Some("2 actors locked".to_string()),
            ..task(
                "T-002",
                ("P-001", TATA),
                Stage::PreProduction,
                "Casting",
                Some("T-001"),
                ("Somya", Priority::Medium, TaskStatus::InProgress),
                ("2025-08-18", "2025-08-26"),
            )
        },
        task(
            "T-003",
            ("P-001", TATA),
            Stage::Production,
            "Shoot Day 1",
            Some("T-002"),
            ("Tushar", Priority::High, TaskStatus::NotStarted),
            ("2025-08-29", "2025-08-29"),
        ),
        task(
            "T-004",
            ("P-001", TATA),
            Stage::PostProduction,
            "Rough Cut",
            Some("T-003"),
            ("Editor 1", Priority::High, TaskStatus::NotStarted),
            ("2025-08-30", "2025-09-01"),
        ),
        Task {
            notes: Some("Rain delay".to_string()),
            ..task(
                "T-005",
                ("P-002", DLECTA),
                Stage::Production,
                "Shoot Day 1",
                None,
                ("Tushar", Priority::High, TaskStatus::Blocked),
                ("2025-08-27", "2025-08-29"),
            )
        },
        Task {
            notes: Some("Awaiting brand assets".to_string()),
            ..task(
                "T-006",
                ("P-003", EQUAL_TWO),
                Stage::PreProduction,
                "Storyboard",
                None,
                ("Avinash", Priority::Medium, TaskStatus::OnHold),
                ("2025-08-30", "2025-09-03"),
            )
        },
    ]
}

fn project(id: &str, name: &str, client: &str, producer: &str) -> Project {
    Project {
        id: id.to_string(),
        name: name.to_string(),
        client: client.to_string(),
        producer: producer.to_string(),
        start_date: None,
        end_date: None,
    }
}

fn task(
    id: &str,
    (project_id, project_name): (&str, &str),
    stage: Stage,
    name: &str,
    depends_on: Option<&str>,
    (assignee, priority, status): (&str, Priority, TaskStatus),
    (start, due): (&str, &str),
) -> Task {
    Task {
        id: id.to_string(),
        project_id: project_id.to_string(),
        project_name: project_name.to_string(),
        stage,
        name: name.to_string(),
        depends_on: depends_on.map(str::to_string),
        assignee: assignee.to_string(),
        priority,
        status,
        start_date: Some(start.to_string()),
        due_date: Some(due.to_string()),
        actual_end: None,
        manual_pct: None,
        notes: None,
    }
}

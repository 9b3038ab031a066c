mod support;

use serde_json::Value;

use support::{find, TestDir};

fn count(items: &Value, key: &str, value: &str) -> u64 {
    find(items, key, value)["count"].as_u64().expect("count")
}

#[test]
fn seed_dashboard_metrics() {
    let dir = TestDir::new();
    let value = dir.json(&["dashboard"]);
    assert_eq!(value["command"], "dashboard");
    let data = &value["data"];

    assert_eq!(data["filter"], "all");
    assert_eq!(data["today"], "2025-08-28");
    assert_eq!(data["projects_total"], 3);
    assert_eq!(data["tasks_total"], 6);
    assert_eq!(data["tasks_completed"], 1);
    assert_eq!(data["tasks_overdue"], 1);
    assert_eq!(data["on_time_rate"], 100);

    let statuses = &data["statuses"];
    assert_eq!(statuses.as_array().unwrap().len(), 5);
    assert_eq!(count(statuses, "status", "Not Started"), 2);
    assert_eq!(count(statuses, "status", "In Progress"), 1);
    assert_eq!(count(statuses, "status", "Blocked"), 1);
    assert_eq!(count(statuses, "status", "On Hold"), 1);
    assert_eq!(count(statuses, "status", "Done"), 1);

    let stages = &data["stages"];
    assert_eq!(count(stages, "stage", "Pre-Production"), 3);
    assert_eq!(count(stages, "stage", "Production"), 2);
    assert_eq!(count(stages, "stage", "Post-Production"), 1);
    assert_eq!(count(stages, "stage", "Delivery"), 0);

    let assignees: Vec<&str> = data["assignees"]
        .as_array()
        .unwrap()
        .iter()
        .map(|entry| entry["assignee"].as_str().unwrap())
        .collect();
    assert_eq!(assignees, ["Ravi", "Somya", "Tushar", "Editor 1", "Avinash"]);
    assert_eq!(count(&data["assignees"], "assignee", "Tushar"), 2);

    let progress = &data["project_progress"];
    assert_eq!(find(progress, "project_id", "P-001")["percent"], 38);
    assert_eq!(find(progress, "project_id", "P-002")["percent"], 25);
    assert_eq!(find(progress, "project_id", "P-003")["percent"], 25);
}

#[test]
fn project_filter_narrows_task_metrics_only() {
    let dir = TestDir::new();
    let data = dir.json(&["dashboard", "--project", "P-001"])["data"].clone();
    assert_eq!(data["filter"], "P-001");
    assert_eq!(data["tasks_total"], 4);
    assert_eq!(data["tasks_overdue"], 1);
    assert_eq!(count(&data["statuses"], "status", "Blocked"), 0);
    assert_eq!(data["project_progress"].as_array().unwrap().len(), 3);
}

#[test]
fn overdue_follows_today() {
    let dir = TestDir::new();
    let early = dir.json(&["dashboard", "--today", "2025-08-20"]);
    assert_eq!(early["data"]["tasks_overdue"], 0);

    let late = dir.json(&["dashboard", "--today", "2025-09-05"]);
    // Everything not Done is past due by then.
    assert_eq!(late["data"]["tasks_overdue"], 5);
}

#[test]
fn on_time_rate_reacts_to_late_completion() {
    let dir = TestDir::new();
    dir.json(&["task", "set", "T-002", "status", "Done"]);
    dir.json(&["task", "set", "T-002", "actualEnd", "2025-08-27"]);

    let data = dir.json(&["dashboard"])["data"].clone();
    assert_eq!(data["tasks_completed"], 2);
    assert_eq!(data["on_time_rate"], 50);
    assert_eq!(data["tasks_overdue"], 0);
}

#[test]
fn empty_filter_yields_zeroes() {
    let dir = TestDir::new();
    let value = dir.json(&["dashboard", "--project", "P-404"]);
    let data = &value["data"];
    assert_eq!(data["tasks_total"], 0);
    assert_eq!(data["on_time_rate"], 0);
    assert_eq!(data["statuses"].as_array().unwrap().len(), 5);
    assert!(data["assignees"].as_array().unwrap().is_empty());
    assert!(value["warnings"][0].as_str().unwrap().contains("P-404"));
}

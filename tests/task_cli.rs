mod support;

use predicates::str::contains;

use support::{find, task_ids, TestDir};

#[test]
fn seeded_list_reports_readiness_and_badges() {
    let dir = TestDir::new();
    let list = dir.json(&["task", "list"]);

    assert_eq!(list["schema_version"], "reeltrack.v1");
    assert_eq!(list["command"], "task list");
    assert_eq!(list["data"]["total"], 6);
    assert_eq!(
        task_ids(&list),
        ["T-001", "T-002", "T-003", "T-004", "T-005", "T-006"]
    );

    let tasks = &list["data"]["tasks"];
    let casting = find(tasks, "id", "T-002");
    assert_eq!(casting["readiness"], "Ready");
    assert_eq!(casting["badge"], "Overdue");
    assert_eq!(casting["effectivePct"], 50);

    let shoot = find(tasks, "id", "T-003");
    assert_eq!(shoot["readiness"], "Wait");
    assert_eq!(shoot["overdue"], false);

    let script = find(tasks, "id", "T-001");
    assert_eq!(script["badge"], "Done");
    assert_eq!(script["manualPct"], 100);
}

#[test]
fn list_filters_by_project() {
    let dir = TestDir::new();
    let list = dir.json(&["task", "list", "--project", "P-002"]);
    assert_eq!(list["data"]["filter"], "P-002");
    assert_eq!(task_ids(&list), ["T-005"]);

    let missing = dir.json(&["task", "list", "--project", "P-404"]);
    assert_eq!(missing["data"]["total"], 0);
    assert!(missing["warnings"][0]
        .as_str()
        .unwrap()
        .contains("no project with id P-404"));
}

#[test]
fn new_task_is_prepended_with_defaults() {
    let dir = TestDir::new();
    let created = dir.json(&["task", "new"]);
    let task = &created["data"];
    assert_eq!(task["id"], "T-007");
    assert_eq!(task["projectId"], "P-001");
    assert_eq!(task["projectName"], "Tata MF \u{2014} Sahi Investment Plan");
    assert_eq!(task["stage"], "Pre-Production");
    assert_eq!(task["name"], "New Task");
    assert_eq!(task["assignee"], "Karan");
    assert_eq!(task["priority"], "Medium");
    assert_eq!(task["status"], "Not Started");
    assert!(task.get("dueDate").is_none());
    assert!(task.get("manualPct").is_none());

    let list = dir.json(&["task", "list"]);
    assert_eq!(task_ids(&list)[0], "T-007");
    assert_eq!(list["data"]["total"], 7);

    let stored = dir.read_store();
    assert_eq!(stored["tasks"][0]["id"], "T-007");
    assert_eq!(stored["nextTaskSeq"], 8);
}

#[test]
fn new_task_accepts_a_name() {
    let dir = TestDir::new();
    let created = dir.json(&["task", "new", "--name", "Colour Grade"]);
    assert_eq!(created["data"]["name"], "Colour Grade");
    assert_eq!(dir.read_store()["tasks"][0]["name"], "Colour Grade");
}

#[test]
fn new_task_rejects_blank_name_without_saving() {
    let dir = TestDir::new();
    dir.json_failure(&["task", "new", "--name", "   "], 2);
    assert!(!dir.store_file().exists());
}

#[test]
fn deleted_ids_are_not_reused() {
    let dir = TestDir::new();
    dir.json(&["task", "new"]);
    let removed = dir.json(&["task", "rm", "T-007"]);
    assert_eq!(removed["data"]["removed"], true);

    let created = dir.json(&["task", "new"]);
    assert_eq!(created["data"]["id"], "T-008");

    dir.json(&["task", "rm", "T-002"]);
    let again = dir.json(&["task", "new"]);
    assert_eq!(again["data"]["id"], "T-009");
}

#[test]
fn set_updates_one_field() {
    let dir = TestDir::new();
    let updated = dir.json(&["task", "set", "T-002", "status", "Done"]);
    assert_eq!(updated["data"]["updated"], true);
    assert_eq!(updated["data"]["field"], "status");
    assert_eq!(updated["data"]["task"]["status"], "Done");
    assert_eq!(updated["data"]["task"]["effectivePct"], 100);
    assert_eq!(updated["data"]["task"]["name"], "Casting");

    // T-003 waited on T-002 and is now ready.
    let show = dir.json(&["task", "show", "T-003"]);
    assert_eq!(show["data"]["readiness"], "Ready");
}

#[test]
fn set_accepts_snake_case_and_clears_optionals() {
    let dir = TestDir::new();
    let updated = dir.json(&["task", "set", "T-003", "due_date", "2025-09-10"]);
    assert_eq!(updated["data"]["field"], "dueDate");
    assert_eq!(updated["data"]["task"]["dueDate"], "2025-09-10");

    let cleared = dir.json(&["task", "set", "T-003", "dependsOn"]);
    assert!(cleared["data"]["task"].get("dependsOn").is_none());
    assert_eq!(cleared["data"]["task"]["readiness"], "Ready");
}

#[test]
fn manual_pct_is_clamped() {
    let dir = TestDir::new();
    let high = dir.json(&["task", "set", "T-004", "manualPct", "140"]);
    assert_eq!(high["data"]["task"]["manualPct"], 100);

    let low = dir.json(&["task", "set", "T-004", "manualPct", "-5"]);
    assert_eq!(low["data"]["task"]["manualPct"], 0);
    assert_eq!(low["data"]["task"]["effectivePct"], 0);

    let cleared = dir.json(&["task", "set", "T-004", "manualPct", ""]);
    assert!(cleared["data"]["task"].get("manualPct").is_none());
}

#[test]
fn unknown_task_id_is_a_warning() {
    let dir = TestDir::new();
    let updated = dir.json(&["task", "set", "T-999", "name", "Ghost"]);
    assert_eq!(updated["status"], "success");
    assert_eq!(updated["data"]["updated"], false);
    assert!(updated["warnings"][0]
        .as_str()
        .unwrap()
        .contains("no task with id T-999"));

    let removed = dir.json(&["task", "rm", "T-999"]);
    assert_eq!(removed["data"]["removed"], false);
    assert!(!dir.store_file().exists());
}

#[test]
fn bad_input_is_rejected_with_user_error() {
    let dir = TestDir::new();

    let unknown = dir.json_failure(&["task", "set", "T-001", "colour", "red"], 2);
    assert_eq!(unknown["status"], "error");
    assert_eq!(unknown["error"]["kind"], "user_error");
    assert_eq!(unknown["error"]["details"]["field"], "colour");
    assert!(unknown["next_steps"][0]
        .as_str()
        .unwrap()
        .contains("dueDate"));

    dir.json_failure(&["task", "set", "T-001", "dueDate", "2025-9-1"], 2);
    dir.json_failure(&["task", "set", "T-001", "status", "Finished"], 2);
    dir.json_failure(&["task", "set", "T-001", "assignee", "Stranger"], 2);
    dir.json_failure(&["task", "set", "T-001", "projectId", "P-404"], 2);
    dir.json_failure(&["task", "show", "T-404"], 2);

    assert!(!dir.store_file().exists());
}

#[test]
fn dependency_warnings() {
    let dir = TestDir::new();
    let dangling = dir.json(&["task", "set", "T-005", "dependsOn", "T-404"]);
    assert_eq!(dangling["data"]["task"]["readiness"], "Wait");
    assert!(dangling["warnings"][0].as_str().unwrap().contains("T-404"));

    let removed = dir.json(&["task", "rm", "T-003"]);
    assert_eq!(removed["data"]["dangling_dependents"][0], "T-004");

    let show = dir.json(&["task", "show", "T-004"]);
    assert_eq!(show["data"]["dependsOn"], "T-003");
    assert_eq!(show["data"]["readiness"], "Wait");
}

#[test]
fn show_renders_human_detail() {
    let dir = TestDir::new();
    dir.cmd()
        .args(["task", "show", "T-002"])
        .assert()
        .success()
        .stdout(contains("Task T-002"))
        .stdout(contains("Depends on: T-001 (Ready)"))
        .stdout(contains("overdue (due 2025-08-26)"))
        .stdout(contains("2 actors locked"));
}

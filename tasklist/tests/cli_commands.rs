//! CLI tests for `tasklist` commands.
//!
//! Spawns the tasklist binary against a scaffolded project and verifies
//! printed paths and exit codes.

use std::process::{Command, Output};

use tasklist::exit_codes;
use tasklist::test_support::{TestProject, answers};

fn tasklist(project: &TestProject, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_tasklist"))
        .arg("--root")
        .arg(project.root())
        .args(args)
        .output()
        .expect("run tasklist")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

#[test]
fn start_prints_next_page_for_in_progress_task() {
    let project = TestProject::new().expect("project");
    project
        .write_answers(&answers(&[("full-name", "John Doe")]))
        .expect("answers");

    let output = tasklist(&project, &["start", "firstTask"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&output), "/enter-date-of-birth\n");
}

#[test]
fn start_on_gated_task_exits_with_cannot_start() {
    let project = TestProject::new().expect("project");
    let output = tasklist(&project, &["start", "thirdTask"]);
    assert_eq!(output.status.code(), Some(exit_codes::CANNOT_START));
    assert_eq!(stdout(&output), "/what-is-a-good-car-price\n");
}

#[test]
fn unknown_task_exits_invalid() {
    let project = TestProject::new().expect("project");
    let output = tasklist(&project, &["next", "fourthTask"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("unknown task 'fourthTask'"));
}

#[test]
fn cya_gate_follows_answers() {
    let project = TestProject::new().expect("project");
    let closed = tasklist(&project, &["cya"]);
    assert_eq!(closed.status.code(), Some(exit_codes::CANNOT_START));

    project
        .write_answers(&answers(&[
            ("full-name", "John Doe"),
            ("date-of-birth", "1990-01-01"),
            ("has-car", "no"),
            ("good-car-price", "100"),
        ]))
        .expect("answers");
    let open = tasklist(&project, &["cya"]);
    assert_eq!(open.status.code(), Some(exit_codes::OK));
    assert_eq!(stdout(&open), "cya: open\n");
}

#[test]
fn status_json_lists_review_entry_first() {
    let project = TestProject::new().expect("project");
    let output = tasklist(&project, &["status", "--format", "json"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).expect("json");
    let object = value.as_object().expect("object");
    let keys: Vec<&str> = object.keys().map(String::as_str).collect();
    assert!(keys.contains(&"cya"));
    assert_eq!(value["cya"]["status"], "cannot-start");
    assert_eq!(value["firstTask"]["status"], "to-do");
    assert_eq!(value["firstTask"]["link"], "/enter-name");
    assert_eq!(value["thirdTask"]["status"], "cannot-start");
}

#[test]
fn sections_exclude_flag_drops_task() {
    let project = TestProject::new().expect("project");
    project
        .write_answers(&answers(&[("has-car", "no")]))
        .expect("answers");
    let output = tasklist(&project, &["sections", "--exclude", "thirdTask"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK));
    assert_eq!(
        stdout(&output),
        "firstTask\t./includes/summaries/firstTask.html\n\
         secondTask\t./includes/summaries/secondTask.html\n"
    );
}

#[test]
fn validate_rejects_cyclic_form() {
    let project = TestProject::new().expect("project");
    std::fs::write(
        project.root().join("form.toml"),
        r#"
[[tasks]]
key = "a"
path = "/"
include_if = { task_status = { task = "b", status = "complete" } }

[[tasks]]
key = "b"
path = "/"
include_if = { task_status = { task = "a", status = "complete" } }
"#,
    )
    .expect("write form");

    let output = tasklist(&project, &["validate"]);
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    assert!(String::from_utf8_lossy(&output.stderr).contains("include_if cycle: a -> b -> a"));
}

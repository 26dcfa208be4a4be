//! Test-only helpers: the example car form, built both in code and from its
//! declarative template, plus answer builders and a scratch project.

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use regex::Regex;
use serde_json::Value;

use crate::core::schema::{Page, Schema, Task};
use crate::core::status::task_status;
use crate::core::types::{Answers, Status};
use crate::core::validation::{FieldRule, FieldRules, FieldSpec};
use crate::form::FormDefinition;
use crate::io::answers_store::write_answers;
use crate::io::init::{InitOptions, init_project};

/// Declarative source of the example car form.
pub const CAR_FORM_TOML: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/form.toml"));

/// Build string answers from `(field, value)` pairs.
pub fn answers(pairs: &[(&str, &str)]) -> Answers {
    pairs
        .iter()
        .map(|(key, value)| (key.to_string(), Value::String(value.to_string())))
        .collect()
}

/// Task with a name page and a date-of-birth page.
pub fn first_task() -> Task {
    Task::new("firstTask", "/")
        .title("First task")
        .summary_path("./includes/summaries/firstTask.html")
        .page(Page::new(
            "enter-name",
            vec![
                FieldSpec::new(
                    "full-name",
                    FieldRule::NonEmptyString {
                        min_length: None,
                        max_length: Some(135),
                        pattern: None,
                    },
                )
                .named("your full name"),
            ],
        ))
        .page(Page::new(
            "enter-date-of-birth",
            vec![FieldSpec::new("date-of-birth", FieldRule::Date).named("your date of birth")],
        ))
}

/// Task whose car pages only apply once `has-car` is `yes`.
pub fn second_task() -> Task {
    let has_car = |answers: &Answers| answers.get("has-car") == Some(&Value::from("yes"));
    let registration = Regex::new("(?i)^[a-z0-9]+$").expect("registration pattern");
    Task::new("secondTask", "/")
        .title("Second task")
        .summary_path("./includes/summaries/secondTask.html")
        .custom_title(move |answers| {
            if has_car(answers) {
                "About your car".to_string()
            } else {
                "Second task".to_string()
            }
        })
        .page(Page::new(
            "do-you-have-a-car",
            vec![FieldSpec::new("has-car", FieldRule::one_of(&["yes", "no"]))],
        ))
        .page(
            Page::new(
                "enter-car-registration",
                vec![FieldSpec::new(
                    "car-registration",
                    FieldRule::NonEmptyString {
                        min_length: None,
                        max_length: Some(10),
                        pattern: Some(registration),
                    },
                )],
            )
            .include_if(has_car),
        )
        .page(
            Page::new(
                "enter-car-colour",
                vec![FieldSpec::new("car-colour", FieldRule::non_empty_string())],
            )
            .include_if(has_car),
        )
}

/// Task that only applies once `second` is complete.
pub fn third_task(second: Arc<Task>) -> Task {
    Task::new("thirdTask", "/")
        .title("Third task (can only start if second task complete)")
        .summary_path("./includes/summaries/thirdTask.html")
        .include_if(move |answers| {
            task_status(answers, Some(&*second), &FieldRules) == Status::Complete
        })
        .page(Page::new(
            "what-is-a-good-car-price",
            vec![FieldSpec::new(
                "good-car-price",
                FieldRule::Currency {
                    min: Some(1.0),
                    max: None,
                },
            )],
        ))
}

/// The three-task car form assembled in code.
pub fn car_schema() -> Schema {
    let second = Arc::new(second_task());
    Schema::new()
        .with_task(first_task())
        .with_task(Arc::clone(&second))
        .with_task(third_task(second))
}

/// The car form parsed from its declarative template.
pub fn car_form() -> FormDefinition {
    toml::from_str(CAR_FORM_TOML).expect("parse car form template")
}

/// Scratch project directory scaffolded by `init_project`.
pub struct TestProject {
    dir: tempfile::TempDir,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir()?;
        init_project(dir.path(), &InitOptions { force: false })?;
        Ok(Self { dir })
    }

    pub fn root(&self) -> &Path {
        self.dir.path()
    }

    /// Overwrite the project's answers file with `answers`.
    pub fn write_answers(&self, answers: &Answers) -> Result<()> {
        write_answers(&self.root().join("answers.json"), answers)
    }
}

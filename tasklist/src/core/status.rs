//! Status engine: four-state task status, the review gate and task titles.

use crate::core::inclusion::included_pages;
use crate::core::schema::{Page, Schema, Task};
use crate::core::types::{Answers, Status};
use crate::core::validation::{PageValidator, valid_page_for};

/// Title used when a task declares neither a custom nor a static title.
pub const UNTITLED: &str = "undefined";

/// True when every page is valid. Vacuously true for no pages.
pub fn is_complete(answers: &Answers, pages: &[&Page], validator: &dyn PageValidator) -> bool {
    pages.iter().all(valid_page_for(validator, answers))
}

/// True when at least one page is valid.
pub fn is_in_progress(answers: &Answers, pages: &[&Page], validator: &dyn PageValidator) -> bool {
    pages.iter().any(valid_page_for(validator, answers))
}

/// True when the task has an include-if and it currently fails.
pub fn cannot_start(answers: &Answers, task: &Task) -> bool {
    !task.applies(answers)
}

/// Derive the status of `task` from `answers`.
///
/// - no task, or a failing include-if: `CannotStart`
/// - every included page valid (including none at all): `Complete`
/// - some included page valid: `InProgress`
/// - otherwise: `ToDo`
pub fn task_status(
    answers: &Answers,
    task: Option<&Task>,
    validator: &dyn PageValidator,
) -> Status {
    let Some(task) = task else {
        return Status::CannotStart;
    };
    if cannot_start(answers, task) {
        return Status::CannotStart;
    }

    let pages = included_pages(answers, task);
    if is_complete(answers, &pages, validator) {
        Status::Complete
    } else if is_in_progress(answers, &pages, validator) {
        Status::InProgress
    } else {
        Status::ToDo
    }
}

/// True when every task is complete or does not apply. Vacuous for no tasks.
pub fn cya_can_start(answers: &Answers, schema: &Schema, validator: &dyn PageValidator) -> bool {
    schema.tasks().all(|task| {
        task_status(answers, Some(task), validator) == Status::Complete
            || cannot_start(answers, task)
    })
}

/// Resolve the display title of `task`: custom title, static title, or
/// [`UNTITLED`].
pub fn task_title(answers: &Answers, task: &Task) -> String {
    if let Some(custom) = &task.custom_title {
        return custom.resolve(answers);
    }
    match task.title.as_deref() {
        Some(title) if !title.is_empty() => title.to_string(),
        _ => UNTITLED.to_string(),
    }
}

//! Navigation resolution: where a user should go next within a task.

use crate::core::inclusion::included_pages;
use crate::core::schema::Task;
use crate::core::status::task_status;
use crate::core::types::{Answers, Status};
use crate::core::validation::PageValidator;

/// Trailing segment of a task's own review page.
pub const CHECK_YOUR_ANSWERS: &str = "check-your-answers";

/// Path of the first included page that is not yet valid.
///
/// Falls back to the task's review page when every included page is valid.
/// Paths are concatenated as-is; no encoding or normalization is applied.
pub fn next_question(answers: &Answers, task: &Task, validator: &dyn PageValidator) -> String {
    let pending = included_pages(answers, task)
        .into_iter()
        .find(|page| !validator.is_valid_page(answers, page));
    match pending {
        Some(page) => {
            let base = page.custom_path.as_deref().unwrap_or(&task.path);
            format!("{base}{}", page.key)
        }
        None => format!("{}{CHECK_YOUR_ANSWERS}", task.path),
    }
}

/// Entry point for a task from the task list.
///
/// Completed tasks link to their review page (`cya_path` when set); anything
/// else resumes at [`next_question`].
pub fn task_start(answers: &Answers, task: &Task, validator: &dyn PageValidator) -> String {
    if task_status(answers, Some(task), validator) == Status::Complete {
        return match &task.cya_path {
            Some(cya_path) => cya_path.clone(),
            None => format!("{}{CHECK_YOUR_ANSWERS}", task.path),
        };
    }
    next_question(answers, task, validator)
}

//! Task-list projection consumed by a renderer.

use crate::core::navigation::task_start;
use crate::core::schema::Schema;
use crate::core::status::{cya_can_start, task_status, task_title};
use crate::core::types::{Answers, CYA_KEY, CYA_LINK, CYA_TITLE, Status, TaskList, TaskListEntry};
use crate::core::validation::PageValidator;

/// Build the status/link/title row for every task plus the review entry.
///
/// The `cya` entry is listed first and is `ToDo` only once every applicable
/// task is complete.
pub fn task_list_status(
    answers: &Answers,
    schema: &Schema,
    validator: &dyn PageValidator,
) -> TaskList {
    let mut list = TaskList::new();
    let cya_status = if cya_can_start(answers, schema, validator) {
        Status::ToDo
    } else {
        Status::CannotStart
    };
    list.insert(
        CYA_KEY,
        TaskListEntry {
            status: cya_status,
            link: CYA_LINK.to_string(),
            title: CYA_TITLE.to_string(),
        },
    );

    for task in schema.tasks() {
        list.insert(
            task.key.clone(),
            TaskListEntry {
                status: task_status(answers, Some(task), validator),
                link: task_start(answers, task, validator),
                title: task_title(answers, task),
            },
        );
    }
    list
}

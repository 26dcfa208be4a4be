//! Inclusion filtering: which pages and tasks apply to an answer set.

use crate::core::schema::{Page, Schema, Task};
use crate::core::types::Answers;

/// Pages of `task` whose include-if is absent or passes, in declared order.
///
/// Order decides navigation precedence: the first invalid page returned here
/// is where a user is sent next.
pub fn included_pages<'a>(answers: &Answers, task: &'a Task) -> Vec<&'a Page> {
    task.pages
        .iter()
        .filter(|page| page.applies(answers))
        .collect()
}

/// Tasks eligible for a consolidated review page.
///
/// A task qualifies when it applies to `answers`, declares a non-empty
/// summary path, and is not listed in `excluded_keys`. The returned schema
/// shares task definitions with `schema`; nothing is modified.
pub fn included_sections<S: AsRef<str>>(
    answers: &Answers,
    schema: &Schema,
    excluded_keys: &[S],
) -> Schema {
    let mut sections = Schema::new();
    for task in schema.shared_tasks() {
        let has_summary = task.summary_path.as_deref().is_some_and(|p| !p.is_empty());
        let excluded = excluded_keys.iter().any(|key| key.as_ref() == task.key);
        if task.applies(answers) && has_summary && !excluded {
            sections.push(task.clone());
        }
    }
    sections
}

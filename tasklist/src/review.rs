//! Consolidated review helpers for `tasklist sections` and `tasklist cya`.

use serde::Serialize;
use tracing::debug;

use crate::core::inclusion::included_sections;
use crate::core::status::{cya_can_start, task_title};
use crate::project::Project;

/// One task shown on the consolidated review page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReviewSection {
    pub key: String,
    pub title: String,
    pub summary_path: String,
}

/// Review-eligible tasks, excluding the configured keys plus `extra_excluded`.
pub fn review_sections(project: &Project, extra_excluded: &[String]) -> Vec<ReviewSection> {
    let mut excluded = project.config.review.excluded_sections.clone();
    excluded.extend(extra_excluded.iter().cloned());

    let sections = included_sections(&project.answers, &project.schema, &excluded);
    debug!(sections = sections.len(), excluded = excluded.len(), "review sections resolved");
    sections
        .tasks()
        .map(|task| ReviewSection {
            key: task.key.clone(),
            title: task_title(&project.answers, task),
            summary_path: task.summary_path.clone().unwrap_or_default(),
        })
        .collect()
}

/// Whether the final review step may be entered.
pub fn cya_open(project: &Project) -> bool {
    cya_can_start(&project.answers, &project.schema, &*project.validator)
}

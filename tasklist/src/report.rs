//! Task-list reporting for `tasklist status` and `tasklist title`.

use anyhow::{Context, Result};
use tracing::debug;

use crate::core::status::task_title;
use crate::core::task_list::task_list_status;
use crate::core::types::TaskList;
use crate::io::config::OutputFormat;
use crate::project::Project;

/// Compute the task-list projection for the project's answers.
pub fn task_list(project: &Project) -> TaskList {
    let list = task_list_status(&project.answers, &project.schema, &*project.validator);
    debug!(entries = list.len(), "task list computed");
    list
}

/// Render a task list as aligned text rows or a JSON object.
pub fn render_task_list(list: &TaskList, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Json => {
            let mut buf = serde_json::to_string_pretty(list).context("serialize task list")?;
            buf.push('\n');
            Ok(buf)
        }
        OutputFormat::Text => {
            let width = list.keys().map(str::len).max().unwrap_or_default();
            let mut buf = String::new();
            for (key, entry) in list.iter() {
                buf.push_str(&format!(
                    "{key:<width$}  {:<12}  {}  -> {}\n",
                    entry.status.as_str(),
                    entry.title,
                    entry.link
                ));
            }
            Ok(buf)
        }
    }
}

/// Resolve the display title of one task.
pub fn title_for(project: &Project, key: &str) -> Result<String> {
    let task = project.task(key)?;
    Ok(task_title(&project.answers, task))
}

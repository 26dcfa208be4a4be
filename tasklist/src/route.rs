//! Route resolution for `tasklist start` and `tasklist next`.

use anyhow::Result;
use tracing::debug;

use crate::core::navigation::{next_question, task_start};
use crate::core::status::task_status;
use crate::core::types::Status;
use crate::project::Project;

/// Which navigation question to answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteKind {
    /// Entry point from the task list (review page once complete).
    Start,
    /// First page still needing an answer.
    Next,
}

/// Resolved path for a task, with the status it was derived under.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Route {
    pub task: String,
    pub status: Status,
    pub path: String,
}

/// Resolve the path for `key`. Unknown task keys are errors.
pub fn resolve_route(project: &Project, key: &str, kind: RouteKind) -> Result<Route> {
    let task = project.task(key)?;
    let validator = &*project.validator;
    let status = task_status(&project.answers, Some(task), validator);
    let path = match kind {
        RouteKind::Start => task_start(&project.answers, task, validator),
        RouteKind::Next => next_question(&project.answers, task, validator),
    };
    debug!(task = key, ?kind, %status, %path, "route resolved");
    Ok(Route {
        task: key.to_string(),
        status,
        path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{TestProject, answers};

    fn load(pairs: &[(&str, &str)]) -> (TestProject, Project) {
        let project = TestProject::new().expect("project");
        project.write_answers(&answers(pairs)).expect("answers");
        let loaded = Project::load(project.root(), None).expect("load");
        (project, loaded)
    }

    #[test]
    fn start_resumes_in_progress_task() {
        let (_project, loaded) = load(&[("full-name", "John Doe")]);
        let route = resolve_route(&loaded, "firstTask", RouteKind::Start).expect("route");
        assert_eq!(
            route,
            Route {
                task: "firstTask".to_string(),
                status: Status::InProgress,
                path: "/enter-date-of-birth".to_string(),
            }
        );
    }

    #[test]
    fn start_and_next_agree_for_complete_task_without_cya_path() {
        let (_project, loaded) =
            load(&[("full-name", "John Doe"), ("date-of-birth", "1990-01-01")]);
        let start = resolve_route(&loaded, "firstTask", RouteKind::Start).expect("start");
        let next = resolve_route(&loaded, "firstTask", RouteKind::Next).expect("next");
        assert_eq!(start.path, "/check-your-answers");
        assert_eq!(start.path, next.path);
        assert_eq!(start.status, Status::Complete);
    }

    #[test]
    fn gated_task_reports_cannot_start() {
        let (_project, loaded) = load(&[]);
        let route = resolve_route(&loaded, "thirdTask", RouteKind::Start).expect("route");
        assert_eq!(route.status, Status::CannotStart);
        assert_eq!(route.path, "/what-is-a-good-car-price");
    }

    #[test]
    fn unknown_task_is_an_error() {
        let (_project, loaded) = load(&[]);
        assert!(resolve_route(&loaded, "missing", RouteKind::Next).is_err());
    }
}

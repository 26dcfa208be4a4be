//! Validation for `tasklist validate`: config, form and answers all load.

use std::path::Path;

use anyhow::{Result, anyhow};
use tracing::info;

use crate::project::Project;

/// Summary of a successful validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidateOutcome {
    pub tasks: usize,
    pub pages: usize,
    pub answers: usize,
    /// Excluded review keys that name no task in the form.
    pub warnings: Vec<String>,
}

/// Load the project and report what it contains.
pub fn validate_project(root: &Path) -> Result<ValidateOutcome> {
    if !root.is_dir() {
        return Err(anyhow!("missing directory {}", root.display()));
    }
    let project = Project::load(root, None)?;

    let warnings = project
        .config
        .review
        .excluded_sections
        .iter()
        .filter(|key| !project.schema.contains(key))
        .map(|key| format!("review.excluded_sections names unknown task '{key}'"))
        .collect();

    let outcome = ValidateOutcome {
        tasks: project.schema.len(),
        pages: project.schema.tasks().map(|task| task.pages.len()).sum(),
        answers: project.answers.len(),
        warnings,
    };
    info!(tasks = outcome.tasks, pages = outcome.pages, "project valid");
    Ok(outcome)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::config::{TasklistConfig, write_config};
    use crate::test_support::TestProject;
    use std::fs;

    #[test]
    fn validate_ok_for_scaffolded_project() {
        let project = TestProject::new().expect("project");
        let outcome = validate_project(project.root()).expect("validate");
        assert_eq!(
            outcome,
            ValidateOutcome {
                tasks: 3,
                pages: 6,
                answers: 0,
                warnings: Vec::new(),
            }
        );
    }

    #[test]
    fn validate_warns_on_unknown_excluded_section() {
        let project = TestProject::new().expect("project");
        let mut cfg = TasklistConfig::default();
        cfg.review.excluded_sections = vec!["ghost".to_string()];
        write_config(&project.root().join("tasklist.toml"), &cfg).expect("config");
        let outcome = validate_project(project.root()).expect("validate");
        assert_eq!(
            outcome.warnings,
            vec!["review.excluded_sections names unknown task 'ghost'".to_string()]
        );
    }

    #[test]
    fn validate_errors_on_missing_form() {
        let project = TestProject::new().expect("project");
        fs::remove_file(project.root().join("form.toml")).expect("remove");
        let err = validate_project(project.root()).expect_err("missing form");
        assert!(format!("{err:#}").contains("read form"));
    }

    #[test]
    fn validate_errors_on_missing_root() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = validate_project(&temp.path().join("nope")).expect_err("missing root");
        assert!(err.to_string().contains("missing directory"));
    }
}

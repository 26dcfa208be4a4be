//! Scaffolding for a new tasklist project.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tracing::info;

use super::answers_store::write_answers;
use super::config::{TasklistConfig, write_config};
use crate::core::types::Answers;

const EXAMPLE_FORM: &str =
    include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/form.toml"));

/// Canonical paths for a project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    pub root: PathBuf,
    pub config_path: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        Self {
            config_path: root.join("tasklist.toml"),
            root,
        }
    }

    /// Resolve a config-relative path against the project root.
    pub fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        }
    }
}

/// Options for `init_project`.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// If true, overwrite existing project files.
    pub force: bool,
}

/// Write `tasklist.toml`, an example form and an empty answers file.
///
/// Existing files are left alone unless `options.force` is set.
pub fn init_project(root: &Path, options: &InitOptions) -> Result<()> {
    let paths = ProjectPaths::new(root);
    fs::create_dir_all(&paths.root)
        .with_context(|| format!("create directory {}", paths.root.display()))?;

    let cfg = TasklistConfig::default();
    if options.force || !paths.config_path.exists() {
        write_config(&paths.config_path, &cfg)?;
    }

    let schema_path = paths.resolve(&cfg.schema_path);
    if options.force || !schema_path.exists() {
        fs::write(&schema_path, EXAMPLE_FORM)
            .with_context(|| format!("write {}", schema_path.display()))?;
    }

    let answers_path = paths.resolve(&cfg.answers_path);
    if options.force || !answers_path.exists() {
        write_answers(&answers_path, &Answers::new())?;
    }

    info!(root = %paths.root.display(), force = options.force, "project initialized");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_writes_all_files() {
        let temp = tempfile::tempdir().expect("tempdir");
        init_project(temp.path(), &InitOptions { force: false }).expect("init");
        assert!(temp.path().join("tasklist.toml").is_file());
        assert!(temp.path().join("form.toml").is_file());
        let answers = fs::read_to_string(temp.path().join("answers.json")).expect("answers");
        assert_eq!(answers, "{}\n");
    }

    #[test]
    fn init_keeps_existing_files_without_force() {
        let temp = tempfile::tempdir().expect("tempdir");
        let answers_path = temp.path().join("answers.json");
        fs::write(&answers_path, "{\"full-name\": \"Jo\"}\n").expect("seed");

        init_project(temp.path(), &InitOptions { force: false }).expect("init");
        let kept = fs::read_to_string(&answers_path).expect("read");
        assert!(kept.contains("full-name"));

        init_project(temp.path(), &InitOptions { force: true }).expect("force init");
        let reset = fs::read_to_string(&answers_path).expect("read");
        assert_eq!(reset, "{}\n");
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let paths = ProjectPaths::new("/project");
        assert_eq!(
            paths.resolve(Path::new("form.toml")),
            PathBuf::from("/project/form.toml")
        );
        assert_eq!(
            paths.resolve(Path::new("/etc/form.toml")),
            PathBuf::from("/etc/form.toml")
        );
    }
}

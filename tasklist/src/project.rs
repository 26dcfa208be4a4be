//! Loading everything a command needs from a project root.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use tracing::debug;

use crate::core::compile::SharedValidator;
use crate::core::schema::{Schema, Task};
use crate::core::types::Answers;
use crate::core::validation::FieldRules;
use crate::io::answers_store::load_answers;
use crate::io::config::{TasklistConfig, load_config};
use crate::io::init::ProjectPaths;
use crate::io::schema_store::load_schema;

/// Config, compiled schema and current answers for one evaluation.
pub struct Project {
    pub paths: ProjectPaths,
    pub config: TasklistConfig,
    pub schema: Schema,
    pub answers: Answers,
    pub validator: SharedValidator,
}

impl Project {
    /// Load config, form and answers under `root`.
    ///
    /// `answers_override` replaces the configured answers file when set.
    pub fn load(root: &Path, answers_override: Option<&Path>) -> Result<Self> {
        let paths = ProjectPaths::new(root);
        let config = load_config(&paths.config_path).with_context(|| "load tasklist.toml")?;
        let validator: SharedValidator = Arc::new(FieldRules);

        let schema_path = paths.resolve(&config.schema_path);
        let schema = load_schema(&schema_path, Arc::clone(&validator))?;

        let answers_path = match answers_override {
            Some(path) => path.to_path_buf(),
            None => paths.resolve(&config.answers_path),
        };
        let answers = load_answers(&answers_path)?;
        debug!(
            tasks = schema.len(),
            answers = answers.len(),
            "project loaded"
        );

        Ok(Self {
            paths,
            config,
            schema,
            answers,
            validator,
        })
    }

    /// Look up a task by key, failing on unknown keys.
    pub fn task(&self, key: &str) -> Result<&Task> {
        self.schema.get(key).ok_or_else(|| {
            let known = self.schema.keys().collect::<Vec<_>>().join(", ");
            anyhow!("unknown task '{key}' (known: {known})")
        })
    }
}

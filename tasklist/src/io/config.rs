//! Project configuration stored in `tasklist.toml`.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Project configuration (TOML).
///
/// Edited by humans; missing fields fall back to defaults. Relative paths are
/// resolved against the project root.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TasklistConfig {
    /// Form definition file (`.toml`, otherwise parsed as JSON).
    pub schema_path: PathBuf,

    /// Answers file holding a single JSON object.
    pub answers_path: PathBuf,

    pub review: ReviewConfig,

    pub output: OutputConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ReviewConfig {
    /// Task keys left off the consolidated review page.
    pub excluded_sections: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct OutputConfig {
    pub format: OutputFormat,
}

/// Rendering of command output.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl Default for TasklistConfig {
    fn default() -> Self {
        Self {
            schema_path: PathBuf::from("form.toml"),
            answers_path: PathBuf::from("answers.json"),
            review: ReviewConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

impl TasklistConfig {
    pub fn validate(&self) -> Result<()> {
        if self.schema_path.as_os_str().is_empty() {
            return Err(anyhow!("schema_path must be non-empty"));
        }
        if self.answers_path.as_os_str().is_empty() {
            return Err(anyhow!("answers_path must be non-empty"));
        }
        if self
            .review
            .excluded_sections
            .iter()
            .any(|key| key.trim().is_empty())
        {
            return Err(anyhow!("review.excluded_sections entries must be non-empty"));
        }
        Ok(())
    }
}

/// Load config from a TOML file.
///
/// If the file is missing, returns `TasklistConfig::default()`.
pub fn load_config(path: &Path) -> Result<TasklistConfig> {
    if !path.exists() {
        debug!(path = %path.display(), "config missing, using defaults");
        let cfg = TasklistConfig::default();
        cfg.validate()?;
        return Ok(cfg);
    }
    let contents = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    let cfg: TasklistConfig =
        toml::from_str(&contents).with_context(|| format!("parse {}", path.display()))?;
    cfg.validate()?;
    debug!(path = %path.display(), schema = %cfg.schema_path.display(), "config loaded");
    Ok(cfg)
}

/// Atomically write config to disk (temp file + rename).
pub fn write_config(path: &Path, cfg: &TasklistConfig) -> Result<()> {
    cfg.validate()?;
    let mut buf = toml::to_string_pretty(cfg).context("serialize config toml")?;
    buf.push('\n');
    write_atomic(path, &buf)
}

fn write_atomic(path: &Path, contents: &str) -> Result<()> {
    let parent = path
        .parent()
        .with_context(|| format!("config path missing parent {}", path.display()))?;
    fs::create_dir_all(parent).with_context(|| format!("create directory {}", parent.display()))?;
    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, contents)
        .with_context(|| format!("write temp config {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| format!("replace config {}", path.display()))?;
    Ok(())
}

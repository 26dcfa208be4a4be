//! Answers file load/save.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use serde_json::Value;
use tracing::debug;

use crate::core::types::Answers;

/// Load answers from a JSON object file.
///
/// A missing file means nothing has been answered yet.
pub fn load_answers(path: &Path) -> Result<Answers> {
    if !path.exists() {
        debug!(path = %path.display(), "answers missing, using empty answers");
        return Ok(Answers::new());
    }
    let contents =
        fs::read_to_string(path).with_context(|| format!("read answers {}", path.display()))?;
    let value: Value = serde_json::from_str(&contents)
        .with_context(|| format!("parse answers {}", path.display()))?;
    let Value::Object(map) = value else {
        return Err(anyhow!(
            "answers {} must contain a JSON object",
            path.display()
        ));
    };
    debug!(path = %path.display(), fields = map.len(), "answers loaded");
    Ok(map.into_iter().collect())
}

/// Write answers as pretty JSON with a trailing newline.
pub fn write_answers(path: &Path, answers: &Answers) -> Result<()> {
    let mut buf = serde_json::to_string_pretty(answers).context("serialize answers")?;
    buf.push('\n');
    fs::write(path, buf).with_context(|| format!("write answers {}", path.display()))
}

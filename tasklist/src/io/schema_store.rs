//! Form definition loading with JSON Schema + invariant validation.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use jsonschema::validator_for;
use serde_json::Value;
use tracing::debug;

use crate::core::compile::{SharedValidator, compile_form};
use crate::core::invariants::validate_invariants;
use crate::core::schema::Schema;
use crate::form::FormDefinition;

/// JSON Schema every form definition must conform to.
pub const FORM_SCHEMA: &str = include_str!(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/../schemas/form/v1.schema.json"
));

/// On-disk encoding of a form definition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFormat {
    Toml,
    Json,
}

impl FormFormat {
    /// `.toml` files are TOML; anything else is read as JSON.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => FormFormat::Toml,
            _ => FormFormat::Json,
        }
    }
}

/// Load and validate a form definition (schema + invariants).
pub fn load_form(path: &Path) -> Result<FormDefinition> {
    let contents =
        fs::read_to_string(path).with_context(|| format!("read form {}", path.display()))?;
    let form = parse_form(&contents, FormFormat::from_path(path))
        .with_context(|| format!("load form {}", path.display()))?;
    debug!(path = %path.display(), tasks = form.tasks.len(), "form loaded");
    Ok(form)
}

/// Parse and validate a form definition from its textual source.
pub fn parse_form(contents: &str, format: FormFormat) -> Result<FormDefinition> {
    let value: Value = match format {
        FormFormat::Toml => toml::from_str(contents).context("parse form toml")?,
        FormFormat::Json => serde_json::from_str(contents).context("parse form json")?,
    };
    validate_schema(&value)?;
    let form: FormDefinition = serde_json::from_value(value).context("deserialize form")?;
    let errors = validate_invariants(&form);
    if !errors.is_empty() {
        return Err(anyhow!("form invariants failed: {}", errors.join("; ")));
    }
    Ok(form)
}

/// Load a form definition and compile it into a runnable schema.
pub fn load_schema(path: &Path, validator: SharedValidator) -> Result<Schema> {
    let form = load_form(path)?;
    compile_form(&form, validator).with_context(|| format!("compile form {}", path.display()))
}

fn validate_schema(form: &Value) -> Result<()> {
    let schema_value: Value = serde_json::from_str(FORM_SCHEMA).context("parse form schema")?;
    let compiled =
        validator_for(&schema_value).map_err(|err| anyhow!("invalid schema: {}", err))?;
    if !compiled.is_valid(form) {
        let messages = compiled
            .iter_errors(form)
            .map(|err| err.to_string())
            .collect::<Vec<_>>();
        return Err(anyhow!(
            "form schema validation failed: {}",
            messages.join("; ")
        ));
    }
    Ok(())
}

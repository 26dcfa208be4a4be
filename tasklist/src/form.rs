//! Declarative form definition as stored on disk.
//!
//! This is the serde view of a form schema. It is checked by
//! [`crate::core::invariants`] and turned into a runnable
//! [`crate::core::schema::Schema`] by [`crate::core::compile`].

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::core::types::Status;

#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FormDefinition {
    #[serde(default)]
    pub tasks: Vec<TaskDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TaskDef {
    pub key: String,
    pub path: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// Conditional titles; the first matching rule wins.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub custom_title: Vec<TitleRule>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cya_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_if: Option<Condition>,
    #[serde(default)]
    pub pages: Vec<PageDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct TitleRule {
    pub when: Condition,
    pub title: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct PageDef {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub custom_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub include_if: Option<Condition>,
    #[serde(default)]
    pub fields: Vec<FieldDef>,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct FieldDef {
    pub key: String,
    #[serde(rename = "type")]
    pub kind: FieldKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_length: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pattern: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency_max: Option<f64>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub valid_values: Vec<String>,
}

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum FieldKind {
    NonEmptyString,
    OptionalString,
    Number,
    Currency,
    Enum,
    Date,
}

/// Declarative include-if / title condition.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "snake_case")]
pub enum Condition {
    /// Field answer equals `value` (strings compare after trimming).
    Equals { field: String, value: Value },
    NotEquals { field: String, value: Value },
    /// Field holds a non-blank answer.
    Answered { field: String },
    /// Another task currently has `status`.
    TaskStatus { task: String, status: Status },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

impl Condition {
    /// Task keys referenced by `task_status` conditions, in encounter order.
    pub fn task_refs(&self) -> Vec<&str> {
        let mut refs = Vec::new();
        self.collect_task_refs(&mut refs);
        refs
    }

    fn collect_task_refs<'a>(&'a self, refs: &mut Vec<&'a str>) {
        match self {
            Condition::TaskStatus { task, .. } => refs.push(task.as_str()),
            Condition::All(items) | Condition::Any(items) => {
                for item in items {
                    item.collect_task_refs(refs);
                }
            }
            Condition::Not(inner) => inner.collect_task_refs(refs),
            Condition::Equals { .. }
            | Condition::NotEquals { .. }
            | Condition::Answered { .. } => {}
        }
    }
}

impl TaskDef {
    /// Every task key this task's conditions depend on.
    pub fn dependencies(&self) -> Vec<&str> {
        let mut deps = Vec::new();
        let conditions = self
            .include_if
            .iter()
            .chain(self.custom_title.iter().map(|rule| &rule.when))
            .chain(self.pages.iter().filter_map(|page| page.include_if.as_ref()));
        for condition in conditions {
            for dep in condition.task_refs() {
                if !deps.contains(&dep) {
                    deps.push(dep);
                }
            }
        }
        deps
    }
}

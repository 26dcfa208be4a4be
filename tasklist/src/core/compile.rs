//! Compile a declarative form definition into a runnable schema.
//!
//! Tasks are compiled in dependency order so a `task_status` condition can
//! capture the already-compiled task it refers to. Cycles and unknown
//! references are rejected up front by [`validate_invariants`].

use std::collections::HashMap;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow, bail};
use regex::Regex;
use serde_json::Value;

use crate::core::invariants::{dependency_order, validate_invariants};
use crate::core::schema::{Page, Predicate, Schema, Task, TitleFn};
use crate::core::status::{UNTITLED, task_status};
use crate::core::types::Answers;
use crate::core::validation::{FieldRule, FieldSpec, PageValidator};
use crate::form::{Condition, FieldDef, FieldKind, FormDefinition, PageDef, TaskDef};

/// Validator shared by every compiled `task_status` condition.
pub type SharedValidator = Arc<dyn PageValidator + Send + Sync>;

/// Check invariants and build a [`Schema`] whose task conditions evaluate
/// with `validator`.
pub fn compile_form(form: &FormDefinition, validator: SharedValidator) -> Result<Schema> {
    let errors = validate_invariants(form);
    if !errors.is_empty() {
        bail!("form invariants failed: {}", errors.join("; "));
    }
    let order = dependency_order(form)
        .map_err(|cycle| anyhow!("include_if cycle: {}", cycle.join(" -> ")))?;

    let mut compiled: HashMap<&str, Arc<Task>> = HashMap::new();
    for def in order {
        let task = compile_task(def, &compiled, &validator)
            .with_context(|| format!("compile task '{}'", def.key))?;
        compiled.insert(def.key.as_str(), Arc::new(task));
    }

    let mut schema = Schema::new();
    for def in &form.tasks {
        let task = compiled
            .get(def.key.as_str())
            .ok_or_else(|| anyhow!("task '{}' was not compiled", def.key))?;
        schema.push(Arc::clone(task));
    }
    Ok(schema)
}

fn compile_task(
    def: &TaskDef,
    compiled: &HashMap<&str, Arc<Task>>,
    validator: &SharedValidator,
) -> Result<Task> {
    let mut task = Task::new(def.key.clone(), def.path.clone());
    task.title = def.title.clone();
    task.summary_path = def.summary_path.clone();
    task.cya_path = def.cya_path.clone();
    task.include_if = def
        .include_if
        .as_ref()
        .map(|condition| compile_condition(condition, compiled, validator))
        .transpose()?;

    if !def.custom_title.is_empty() {
        let mut rules = Vec::with_capacity(def.custom_title.len());
        for rule in &def.custom_title {
            rules.push((
                compile_condition(&rule.when, compiled, validator)?,
                rule.title.clone(),
            ));
        }
        let fallback = def
            .title
            .clone()
            .filter(|title| !title.is_empty())
            .unwrap_or_else(|| UNTITLED.to_string());
        task.custom_title = Some(TitleFn::new(move |answers| {
            rules
                .iter()
                .find(|(when, _)| when.evaluate(answers))
                .map_or_else(|| fallback.clone(), |(_, title)| title.clone())
        }));
    }

    for page in &def.pages {
        task.pages.push(
            compile_page(page, compiled, validator)
                .with_context(|| format!("compile page '{}'", page.key))?,
        );
    }
    Ok(task)
}

fn compile_page(
    def: &PageDef,
    compiled: &HashMap<&str, Arc<Task>>,
    validator: &SharedValidator,
) -> Result<Page> {
    let fields = def
        .fields
        .iter()
        .map(compile_field)
        .collect::<Result<Vec<_>>>()?;
    let mut page = Page::new(def.key.clone(), fields);
    page.title = def.title.clone();
    page.custom_path = def.custom_path.clone();
    page.include_if = def
        .include_if
        .as_ref()
        .map(|condition| compile_condition(condition, compiled, validator))
        .transpose()?;
    Ok(page)
}

fn compile_field(def: &FieldDef) -> Result<FieldSpec> {
    let pattern = def
        .pattern
        .as_deref()
        .map(Regex::new)
        .transpose()
        .with_context(|| format!("field '{}': invalid pattern", def.key))?;
    let rule = match def.kind {
        FieldKind::NonEmptyString => FieldRule::NonEmptyString {
            min_length: def.min_length,
            max_length: def.max_length,
            pattern,
        },
        FieldKind::OptionalString => FieldRule::OptionalString {
            max_length: def.max_length,
            pattern,
        },
        FieldKind::Number => FieldRule::Number {
            min: def.min,
            max: def.max,
        },
        FieldKind::Currency => FieldRule::Currency {
            min: def.currency_min.or(def.min),
            max: def.currency_max.or(def.max),
        },
        FieldKind::Enum => FieldRule::Enum {
            valid_values: def.valid_values.clone(),
        },
        FieldKind::Date => FieldRule::Date,
    };
    let mut spec = FieldSpec::new(def.key.clone(), rule);
    if let Some(name) = &def.name {
        spec = spec.named(name.clone());
    }
    Ok(spec)
}

/// Turn a declarative condition into a predicate closure.
pub fn compile_condition(
    condition: &Condition,
    compiled: &HashMap<&str, Arc<Task>>,
    validator: &SharedValidator,
) -> Result<Predicate> {
    let predicate = match condition {
        Condition::Equals { field, value } => {
            let (field, value) = (field.clone(), value.clone());
            Predicate::new(move |answers| answer_equals(answers, &field, &value))
        }
        Condition::NotEquals { field, value } => {
            let (field, value) = (field.clone(), value.clone());
            Predicate::new(move |answers| !answer_equals(answers, &field, &value))
        }
        Condition::Answered { field } => {
            let field = field.clone();
            Predicate::new(move |answers| {
                answers
                    .get(&field)
                    .and_then(answer_text)
                    .is_some_and(|text| !text.trim().is_empty())
            })
        }
        Condition::TaskStatus { task, status } => {
            let dependency = compiled
                .get(task.as_str())
                .cloned()
                .ok_or_else(|| anyhow!("condition references uncompiled task '{task}'"))?;
            let validator = Arc::clone(validator);
            let expected = *status;
            Predicate::new(move |answers| {
                task_status(answers, Some(&*dependency), &*validator) == expected
            })
        }
        Condition::All(items) => {
            let items = compile_all(items, compiled, validator)?;
            Predicate::new(move |answers| items.iter().all(|item| item.evaluate(answers)))
        }
        Condition::Any(items) => {
            let items = compile_all(items, compiled, validator)?;
            Predicate::new(move |answers| items.iter().any(|item| item.evaluate(answers)))
        }
        Condition::Not(inner) => {
            let inner = compile_condition(inner, compiled, validator)?;
            Predicate::new(move |answers| !inner.evaluate(answers))
        }
    };
    Ok(predicate)
}

fn compile_all(
    items: &[Condition],
    compiled: &HashMap<&str, Arc<Task>>,
    validator: &SharedValidator,
) -> Result<Vec<Predicate>> {
    items
        .iter()
        .map(|item| compile_condition(item, compiled, validator))
        .collect()
}

/// Compare an answer with an expected value. Strings compare trimmed; a
/// `null` expectation matches an absent or null answer.
fn answer_equals(answers: &Answers, field: &str, expected: &Value) -> bool {
    let actual = answers.get(field);
    if expected.is_null() {
        return actual.is_none_or(Value::is_null);
    }
    match (actual.and_then(answer_text), answer_text(expected)) {
        (Some(actual), Some(expected)) => actual.trim() == expected.trim(),
        _ => false,
    }
}

fn answer_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::types::Status;
    use crate::core::validation::FieldRules;
    use crate::test_support::{answers, car_form};

    fn compile(form: &FormDefinition) -> Result<Schema> {
        compile_form(form, Arc::new(FieldRules))
    }

    #[test]
    fn compiles_car_form_in_declared_order() {
        let schema = compile(&car_form()).expect("compile");
        assert_eq!(
            schema.keys().collect::<Vec<_>>(),
            vec!["firstTask", "secondTask", "thirdTask"]
        );
        let second = schema.get("secondTask").expect("second task");
        assert_eq!(second.pages.len(), 3);
        assert_eq!(second.pages[1].key, "enter-car-registration");
    }

    #[test]
    fn compiled_task_status_condition_tracks_dependency() {
        let schema = compile(&car_form()).expect("compile");
        let third = schema.get("thirdTask");
        assert_eq!(
            task_status(&answers(&[]), third, &FieldRules),
            Status::CannotStart
        );
        assert_eq!(
            task_status(&answers(&[("has-car", "no")]), third, &FieldRules),
            Status::ToDo
        );
    }

    #[test]
    fn compiled_custom_title_falls_back_to_static_title() {
        let schema = compile(&car_form()).expect("compile");
        let second = schema.get("secondTask").expect("second task");
        let custom = second.custom_title.as_ref().expect("custom title");
        assert_eq!(custom.resolve(&answers(&[("has-car", "yes")])), "About your car");
        assert_eq!(custom.resolve(&answers(&[])), "Second task");
    }

    #[test]
    fn compile_rejects_cycles() {
        let form: FormDefinition = toml::from_str(
            r#"
            [[tasks]]
            key = "a"
            path = "/"
            include_if = { task_status = { task = "a", status = "complete" } }
            "#,
        )
        .expect("parse");
        let err = compile(&form).expect_err("cycle");
        assert!(err.to_string().contains("include_if cycle: a -> a"));
    }

    #[test]
    fn equality_conditions_compare_text_forms() {
        let compiled = HashMap::new();
        let validator: SharedValidator = Arc::new(FieldRules);
        let numeric = compile_condition(
            &Condition::Equals {
                field: "n".to_string(),
                value: serde_json::json!(3),
            },
            &compiled,
            &validator,
        )
        .expect("compile");
        assert!(numeric.evaluate(&answers(&[("n", " 3 ")])));
        assert!(!numeric.evaluate(&answers(&[])));

        let absent = compile_condition(
            &Condition::Equals {
                field: "n".to_string(),
                value: Value::Null,
            },
            &compiled,
            &validator,
        )
        .expect("compile");
        assert!(absent.evaluate(&answers(&[])));
        assert!(!absent.evaluate(&answers(&[("n", "x")])));
    }

    #[test]
    fn combinators_and_answered() {
        let compiled = HashMap::new();
        let validator: SharedValidator = Arc::new(FieldRules);
        #[derive(serde::Deserialize)]
        struct Wrapper {
            c: Condition,
        }
        let Wrapper { c: condition } = toml::from_str(
            r#"c = { any = [ { answered = { field = "a" } }, { not = { not_equals = { field = "b", value = "x" } } } ] }"#,
        )
        .expect("parse");
        let predicate = compile_condition(&condition, &compiled, &validator).expect("compile");
        assert!(!predicate.evaluate(&answers(&[("a", "  ")])));
        assert!(predicate.evaluate(&answers(&[("a", "1")])));
        assert!(predicate.evaluate(&answers(&[("b", "x")])));
    }
}

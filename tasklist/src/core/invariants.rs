//! Semantic invariants not expressible via JSON Schema.

use std::collections::{HashMap, HashSet};

use regex::Regex;

use crate::core::types::CYA_KEY;
use crate::form::{FieldKind, FormDefinition, TaskDef};

/// Check semantic invariants of a form definition:
/// - Task keys are non-empty, unique, and not the reserved review key
/// - Page keys are non-empty and unique within their task
/// - Field keys are unique within their page
/// - Enum fields list at least one value; patterns compile
/// - `task_status` conditions name existing tasks and form no cycles
pub fn validate_invariants(form: &FormDefinition) -> Vec<String> {
    let mut errors = Vec::new();
    let mut seen = HashSet::new();
    let known: HashSet<&str> = form.tasks.iter().map(|task| task.key.as_str()).collect();

    for task in &form.tasks {
        if task.key.trim().is_empty() {
            errors.push("task key must be non-empty".to_string());
        } else if task.key == CYA_KEY {
            errors.push(format!("task key '{CYA_KEY}' is reserved"));
        }
        if !seen.insert(task.key.as_str()) {
            errors.push(format!("duplicate task key '{}'", task.key));
        }
        validate_task(task, &known, &mut errors);
    }

    if let Err(cycle) = dependency_order(form) {
        errors.push(format!("include_if cycle: {}", cycle.join(" -> ")));
    }
    errors
}

fn validate_task(task: &TaskDef, known: &HashSet<&str>, errors: &mut Vec<String>) {
    for dep in task.dependencies() {
        if !known.contains(dep) {
            errors.push(format!("{}: references unknown task '{}'", task.key, dep));
        }
    }

    let mut pages = HashSet::new();
    for page in &task.pages {
        let path = format!("{}/{}", task.key, page.key);
        if page.key.trim().is_empty() {
            errors.push(format!("{}: page key must be non-empty", task.key));
        }
        if !pages.insert(page.key.as_str()) {
            errors.push(format!("{}: duplicate page key '{}'", task.key, page.key));
        }

        let mut fields = HashSet::new();
        for field in &page.fields {
            if !fields.insert(field.key.as_str()) {
                errors.push(format!("{}: duplicate field key '{}'", path, field.key));
            }
            if field.kind == FieldKind::Enum && field.valid_values.is_empty() {
                errors.push(format!("{}/{}: enum field needs valid_values", path, field.key));
            }
            if let Some(err) = field.pattern.as_deref().and_then(|p| Regex::new(p).err()) {
                errors.push(format!("{}/{}: invalid pattern: {}", path, field.key, err));
            }
        }
    }
}

/// Order tasks so every task comes after the tasks its conditions reference.
///
/// Ties keep declared order. References to unknown tasks are ignored here.
/// On a cycle, returns the task keys along it, first key repeated at the end.
pub fn dependency_order(form: &FormDefinition) -> Result<Vec<&TaskDef>, Vec<String>> {
    let by_key: HashMap<&str, &TaskDef> = form
        .tasks
        .iter()
        .map(|task| (task.key.as_str(), task))
        .collect();
    let mut marks: HashMap<&str, Mark> = HashMap::new();
    let mut order = Vec::new();
    let mut stack = Vec::new();

    for task in &form.tasks {
        visit(task, &by_key, &mut marks, &mut stack, &mut order)?;
    }
    Ok(order)
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Visiting,
    Done,
}

fn visit<'a>(
    task: &'a TaskDef,
    by_key: &HashMap<&str, &'a TaskDef>,
    marks: &mut HashMap<&'a str, Mark>,
    stack: &mut Vec<&'a str>,
    order: &mut Vec<&'a TaskDef>,
) -> Result<(), Vec<String>> {
    match marks.get(task.key.as_str()) {
        Some(Mark::Done) => return Ok(()),
        Some(Mark::Visiting) => {
            let start = stack
                .iter()
                .position(|key| *key == task.key)
                .unwrap_or_default();
            let mut cycle: Vec<String> = stack[start..].iter().map(|key| key.to_string()).collect();
            cycle.push(task.key.clone());
            return Err(cycle);
        }
        None => {}
    }

    marks.insert(task.key.as_str(), Mark::Visiting);
    stack.push(task.key.as_str());
    for dep in task.dependencies() {
        if let Some(&dep_task) = by_key.get(dep) {
            visit(dep_task, by_key, marks, stack, order)?;
        }
    }
    stack.pop();
    marks.insert(task.key.as_str(), Mark::Done);
    order.push(task);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(source: &str) -> FormDefinition {
        toml::from_str(source).expect("parse form")
    }

    #[test]
    fn accepts_valid_form() {
        let def = form(
            r#"
            [[tasks]]
            key = "a"
            path = "/"
            [[tasks.pages]]
            key = "p"
            [[tasks.pages.fields]]
            key = "f"
            type = "enum"
            valid_values = ["yes", "no"]
            "#,
        );
        assert!(validate_invariants(&def).is_empty());
    }

    #[test]
    fn reports_key_and_field_errors() {
        let def = form(
            r#"
            [[tasks]]
            key = "cya"
            path = "/"

            [[tasks]]
            key = "dup"
            path = "/"
            [[tasks.pages]]
            key = "p"
            [[tasks.pages.fields]]
            key = "f"
            type = "enum"
            [[tasks.pages.fields]]
            key = "f"
            type = "nonEmptyString"
            pattern = "("
            [[tasks.pages]]
            key = "p"

            [[tasks]]
            key = "dup"
            path = "/"
            "#,
        );
        let errors = validate_invariants(&def);
        assert!(errors.iter().any(|err| err.contains("'cya' is reserved")));
        assert!(errors.iter().any(|err| err == "duplicate task key 'dup'"));
        assert!(errors.iter().any(|err| err == "dup: duplicate page key 'p'"));
        assert!(errors.iter().any(|err| err == "dup/p: duplicate field key 'f'"));
        assert!(errors.iter().any(|err| err.contains("enum field needs valid_values")));
        assert!(errors.iter().any(|err| err.contains("invalid pattern")));
    }

    #[test]
    fn reports_unknown_task_reference() {
        let def = form(
            r#"
            [[tasks]]
            key = "a"
            path = "/"
            include_if = { task_status = { task = "ghost", status = "complete" } }
            "#,
        );
        assert_eq!(
            validate_invariants(&def),
            vec!["a: references unknown task 'ghost'".to_string()]
        );
    }

    #[test]
    fn reports_include_if_cycle() {
        let def = form(
            r#"
            [[tasks]]
            key = "a"
            path = "/"
            include_if = { task_status = { task = "b", status = "complete" } }

            [[tasks]]
            key = "b"
            path = "/"
            [[tasks.pages]]
            key = "p"
            include_if = { task_status = { task = "a", status = "complete" } }
            "#,
        );
        assert_eq!(
            validate_invariants(&def),
            vec!["include_if cycle: a -> b -> a".to_string()]
        );
    }

    #[test]
    fn self_reference_is_a_cycle() {
        let def = form(
            r#"
            [[tasks]]
            key = "a"
            path = "/"
            include_if = { task_status = { task = "a", status = "to-do" } }
            "#,
        );
        assert_eq!(dependency_order(&def).err(), Some(vec!["a".to_string(), "a".to_string()]));
    }

    #[test]
    fn dependency_order_puts_referenced_tasks_first() {
        let def = form(
            r#"
            [[tasks]]
            key = "third"
            path = "/"
            include_if = { task_status = { task = "second", status = "complete" } }

            [[tasks]]
            key = "first"
            path = "/"

            [[tasks]]
            key = "second"
            path = "/"
            "#,
        );
        let order: Vec<&str> = dependency_order(&def)
            .expect("order")
            .into_iter()
            .map(|task| task.key.as_str())
            .collect();
        assert_eq!(order, vec!["second", "third", "first"]);
    }
}

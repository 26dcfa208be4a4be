//! In-memory form schema: tasks, pages and their inclusion predicates.
//!
//! A schema is built once and shared read-only by every evaluation. Predicates
//! and title functions are reference-counted closures so tasks can be cloned
//! cheaply and handed across threads.

use std::fmt;
use std::sync::Arc;

use crate::core::types::Answers;
use crate::core::validation::FieldSpec;

/// Shared include-if predicate over the current answers.
#[derive(Clone)]
pub struct Predicate(Arc<dyn Fn(&Answers) -> bool + Send + Sync>);

impl Predicate {
    pub fn new(f: impl Fn(&Answers) -> bool + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn evaluate(&self, answers: &Answers) -> bool {
        (self.0)(answers)
    }
}

impl fmt::Debug for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Predicate(..)")
    }
}

/// Shared title function over the current answers.
#[derive(Clone)]
pub struct TitleFn(Arc<dyn Fn(&Answers) -> String + Send + Sync>);

impl TitleFn {
    pub fn new(f: impl Fn(&Answers) -> String + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn resolve(&self, answers: &Answers) -> String {
        (self.0)(answers)
    }
}

impl fmt::Debug for TitleFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TitleFn(..)")
    }
}

/// A single form step.
///
/// `key` is fixed at construction and doubles as the routing segment; `title`
/// is an optional heading for authors and is never used to build paths.
#[derive(Debug, Clone)]
pub struct Page {
    pub key: String,
    pub fields: Vec<FieldSpec>,
    pub include_if: Option<Predicate>,
    pub custom_path: Option<String>,
    pub title: Option<String>,
}

impl Page {
    pub fn new(key: impl Into<String>, fields: Vec<FieldSpec>) -> Self {
        Self {
            key: key.into(),
            fields,
            include_if: None,
            custom_path: None,
            title: None,
        }
    }

    pub fn include_if(mut self, f: impl Fn(&Answers) -> bool + Send + Sync + 'static) -> Self {
        self.include_if = Some(Predicate::new(f));
        self
    }

    pub fn custom_path(mut self, path: impl Into<String>) -> Self {
        self.custom_path = Some(path.into());
        self
    }

    /// True when the page has no predicate or its predicate passes.
    pub fn applies(&self, answers: &Answers) -> bool {
        self.include_if
            .as_ref()
            .is_none_or(|predicate| predicate.evaluate(answers))
    }
}

/// A named group of pages forming one section of the form.
#[derive(Debug, Clone)]
pub struct Task {
    pub key: String,
    pub path: String,
    pub pages: Vec<Page>,
    pub title: Option<String>,
    pub custom_title: Option<TitleFn>,
    pub summary_path: Option<String>,
    pub cya_path: Option<String>,
    pub include_if: Option<Predicate>,
}

impl Task {
    pub fn new(key: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
            pages: Vec::new(),
            title: None,
            custom_title: None,
            summary_path: None,
            cya_path: None,
            include_if: None,
        }
    }

    pub fn page(mut self, page: Page) -> Self {
        self.pages.push(page);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn custom_title(mut self, f: impl Fn(&Answers) -> String + Send + Sync + 'static) -> Self {
        self.custom_title = Some(TitleFn::new(f));
        self
    }

    pub fn summary_path(mut self, path: impl Into<String>) -> Self {
        self.summary_path = Some(path.into());
        self
    }

    pub fn cya_path(mut self, path: impl Into<String>) -> Self {
        self.cya_path = Some(path.into());
        self
    }

    pub fn include_if(mut self, f: impl Fn(&Answers) -> bool + Send + Sync + 'static) -> Self {
        self.include_if = Some(Predicate::new(f));
        self
    }

    /// True when the task has no predicate or its predicate passes.
    pub fn applies(&self, answers: &Answers) -> bool {
        self.include_if
            .as_ref()
            .is_none_or(|predicate| predicate.evaluate(answers))
    }
}

/// Ordered collection of tasks keyed by their stable key.
///
/// Tasks are held behind `Arc` so filtered views share them with the source.
#[derive(Debug, Clone, Default)]
pub struct Schema {
    tasks: Vec<Arc<Task>>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a task, or replace the task already stored under the same key.
    pub fn push(&mut self, task: impl Into<Arc<Task>>) {
        let task = task.into();
        match self.tasks.iter_mut().find(|existing| existing.key == task.key) {
            Some(slot) => *slot = task,
            None => self.tasks.push(task),
        }
    }

    pub fn with_task(mut self, task: impl Into<Arc<Task>>) -> Self {
        self.push(task);
        self
    }

    pub fn get(&self, key: &str) -> Option<&Task> {
        self.get_shared(key).map(Arc::as_ref)
    }

    pub fn get_shared(&self, key: &str) -> Option<&Arc<Task>> {
        self.tasks.iter().find(|task| task.key == key)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get_shared(key).is_some()
    }

    pub fn tasks(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter().map(Arc::as_ref)
    }

    pub fn shared_tasks(&self) -> impl Iterator<Item = &Arc<Task>> {
        self.tasks.iter()
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tasks.iter().map(|task| task.key.as_str())
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }
}

impl FromIterator<Task> for Schema {
    fn from_iter<I: IntoIterator<Item = Task>>(iter: I) -> Self {
        let mut schema = Schema::new();
        for task in iter {
            schema.push(task);
        }
        schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn schema_preserves_declared_order_and_replaces_by_key() {
        let schema = Schema::new()
            .with_task(Task::new("b", "/"))
            .with_task(Task::new("a", "/"))
            .with_task(Task::new("b", "/other/"));
        assert_eq!(schema.keys().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(schema.get("b").map(|task| task.path.as_str()), Some("/other/"));
    }

    #[test]
    fn applies_without_predicate() {
        let page = Page::new("p", Vec::new());
        assert!(page.applies(&Answers::new()));
    }

    #[test]
    fn applies_evaluates_predicate() {
        let task = Task::new("t", "/").include_if(|answers| answers.get("x") == Some(&json!("y")));
        let mut answers = Answers::new();
        assert!(!task.applies(&answers));
        answers.insert("x".to_string(), json!("y"));
        assert!(task.applies(&answers));
    }
}

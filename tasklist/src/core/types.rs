//! Shared deterministic types for the status and navigation engine.
//!
//! These types define stable contracts between core components and the
//! rendering layer. They hold no I/O state and serialize deterministically.

use std::collections::BTreeMap;
use std::fmt;

use serde::ser::SerializeMap;
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// Submitted answers keyed by field key.
///
/// Values stay dynamically typed (string, number, bool, null); the validation
/// collaborator decides what each field accepts.
pub type Answers = BTreeMap<String, Value>;

/// Key of the synthetic task-list entry for the final review step.
pub const CYA_KEY: &str = "cya";
/// Link of the synthetic review entry.
pub const CYA_LINK: &str = "check-your-answers";
/// Title of the synthetic review entry.
pub const CYA_TITLE: &str = "Check your answers";

/// Derived completion state of a task. Always recomputed, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Status {
    CannotStart,
    ToDo,
    InProgress,
    Complete,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::CannotStart => "cannot-start",
            Status::ToDo => "to-do",
            Status::InProgress => "in-progress",
            Status::Complete => "complete",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One row of the task-list projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskListEntry {
    pub status: Status,
    pub link: String,
    pub title: String,
}

/// Ordered task-list projection consumed by a renderer.
///
/// The review entry comes first, followed by tasks in schema order. Serializes
/// as a JSON object preserving that key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskList {
    entries: Vec<(String, TaskListEntry)>,
}

impl TaskList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace the entry for `key`, keeping first-insertion order.
    pub fn insert(&mut self, key: impl Into<String>, entry: TaskListEntry) {
        let key = key.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == key) {
            Some((_, slot)) => *slot = entry,
            None => self.entries.push((key, entry)),
        }
    }

    pub fn get(&self, key: &str) -> Option<&TaskListEntry> {
        self.entries
            .iter()
            .find(|(existing, _)| existing == key)
            .map(|(_, entry)| entry)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &TaskListEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl Serialize for TaskList {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, entry) in &self.entries {
            map.serialize_entry(key, entry)?;
        }
        map.end()
    }
}

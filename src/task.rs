//! Task records as seen by the dependency engine.
//!
//! Tasks are owned by an external store; the engine only reads snapshots of
//! them. Ids referenced by dependency edges may be stale, so lookups go
//! through [`TaskIndex`] and return `Option`.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Placeholder label for a task id that is not present in the snapshot.
pub const UNKNOWN_TASK_LABEL: &str = "Unknown Task";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
}

impl Task {
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: None,
            completed: false,
            project_id: None,
            tags: Vec::new(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_project(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    pub fn with_tags<I, S>(mut self, tags: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.tags = tags.into_iter().map(Into::into).collect();
        self
    }

    pub fn completed(mut self) -> Self {
        self.completed = true;
        self
    }

    /// Description text, treating blank descriptions as absent.
    pub fn description_text(&self) -> Option<&str> {
        let description = self.description.as_deref()?;
        if description.trim().is_empty() {
            None
        } else {
            Some(description)
        }
    }
}

/// Id lookup over a borrowed task snapshot.
#[derive(Debug, Clone, Default)]
pub struct TaskIndex<'a> {
    by_id: HashMap<&'a str, &'a Task>,
}

impl<'a> TaskIndex<'a> {
    /// Index a snapshot. On duplicate ids the first record wins.
    pub fn new(tasks: &'a [Task]) -> Self {
        let mut by_id = HashMap::with_capacity(tasks.len());
        for task in tasks {
            by_id.entry(task.id.as_str()).or_insert(task);
        }
        Self { by_id }
    }

    pub fn get(&self, id: &str) -> Option<&'a Task> {
        self.by_id.get(id).copied()
    }

    /// `Some(completed)` for known tasks, `None` for ids missing from the snapshot.
    pub fn is_completed(&self, id: &str) -> Option<bool> {
        self.get(id).map(|task| task.completed)
    }

    /// Title of the task, or [`UNKNOWN_TASK_LABEL`] when the id is stale.
    pub fn title_or_unknown(&self, id: &str) -> &'a str {
        self.get(id)
            .map(|task| task.title.as_str())
            .unwrap_or(UNKNOWN_TASK_LABEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn index_returns_none_for_missing_ids() {
        let tasks = vec![Task::new("a", "Alpha")];
        let index = TaskIndex::new(&tasks);
        assert_eq!(index.get("a").map(|t| t.title.as_str()), Some("Alpha"));
        assert!(index.get("zzz").is_none());
        assert_eq!(index.is_completed("zzz"), None);
        assert_eq!(index.title_or_unknown("zzz"), UNKNOWN_TASK_LABEL);
    }

    #[test]
    fn first_duplicate_wins() {
        let tasks = vec![Task::new("a", "First"), Task::new("a", "Second").completed()];
        let index = TaskIndex::new(&tasks);
        assert_eq!(index.title_or_unknown("a"), "First");
        assert_eq!(index.is_completed("a"), Some(false));
    }

    #[test]
    fn blank_description_is_absent() {
        let task = Task::new("a", "Alpha").with_description("   ");
        assert!(task.description_text().is_none());
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let raw = r#"{"id":"1","title":"Design API","projectId":"p1"}"#;
        let task: Task = serde_json::from_str(raw).expect("task");
        assert_eq!(task.project_id.as_deref(), Some("p1"));
        assert!(!task.completed);
        assert!(task.tags.is_empty());
        assert!(task.description.is_none());
    }
}

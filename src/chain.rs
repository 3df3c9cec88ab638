//! Blocking chains and completion gating.

use serde::{Deserialize, Serialize};

use crate::dependency::{Dependency, EdgeIndex};
use crate::task::{Task, TaskIndex};

const UNKNOWN_BLOCKER_REASON: &str = "Blocked by unknown dependency";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct DependencyChain {
    pub task_id: String,
    /// Incomplete prerequisites reached through a direct blocking edge.
    pub blocked_by: Vec<String>,
    /// Incomplete dependents this task is holding up through a blocking edge.
    pub blocks: Vec<String>,
    /// Edges on the longest depends-on path from this task, all types counted.
    pub chain_length: usize,
    pub is_blocked: bool,
}

/// Compute the chain view for one task.
///
/// Ids missing from `tasks` are not known to be completed, so they still
/// count as blocking. Unknown `task_id` yields an empty, unblocked chain.
pub fn get_dependency_chain(task_id: &str, edges: &[Dependency], tasks: &[Task]) -> DependencyChain {
    let index = EdgeIndex::new(edges);
    let lookup = TaskIndex::new(tasks);
    chain_from_index(task_id, &index, &lookup)
}

fn chain_from_index(
    task_id: &str,
    index: &EdgeIndex<'_>,
    lookup: &TaskIndex<'_>,
) -> DependencyChain {
    let blocked_by = open_ids(
        index
            .dependencies_of(task_id)
            .iter()
            .filter(|edge| edge.kind.is_blocking())
            .map(|edge| edge.depends_on_task_id.as_str()),
        lookup,
    );
    let blocks = open_ids(
        index
            .dependents_of(task_id)
            .iter()
            .filter(|edge| edge.kind.is_blocking())
            .map(|edge| edge.task_id.as_str()),
        lookup,
    );

    DependencyChain {
        task_id: task_id.to_string(),
        is_blocked: !blocked_by.is_empty(),
        blocked_by,
        blocks,
        chain_length: index.longest_path(task_id),
    }
}

/// Whether any direct blocking prerequisite of `task_id` is not known to be
/// completed. Same answer as `chain_from_index(..).is_blocked` without the
/// longest-path walk.
pub(crate) fn has_open_blocker(
    task_id: &str,
    index: &EdgeIndex<'_>,
    lookup: &TaskIndex<'_>,
) -> bool {
    index
        .dependencies_of(task_id)
        .iter()
        .filter(|edge| edge.kind.is_blocking())
        .any(|edge| lookup.is_completed(&edge.depends_on_task_id) != Some(true))
}

/// Ids not known to be completed, first occurrence only.
fn open_ids<'a>(ids: impl Iterator<Item = &'a str>, lookup: &TaskIndex<'_>) -> Vec<String> {
    let mut open: Vec<String> = Vec::new();
    for id in ids {
        match lookup.is_completed(id) {
            Some(true) => continue,
            Some(false) => {}
            None => tracing::debug!(task_id = id, "dependency references unknown task"),
        }
        if !open.iter().any(|existing| existing == id) {
            open.push(id.to_string());
        }
    }
    open
}

/// Whether the task's completion is not gated by any open blocking edge.
pub fn can_complete_task(task_id: &str, edges: &[Dependency], tasks: &[Task]) -> bool {
    !get_dependency_chain(task_id, edges, tasks).is_blocked
}

/// One display line per open blocker, in `blocked_by` order.
pub fn get_blocking_reasons(task_id: &str, edges: &[Dependency], tasks: &[Task]) -> Vec<String> {
    let lookup = TaskIndex::new(tasks);
    get_dependency_chain(task_id, edges, tasks)
        .blocked_by
        .iter()
        .map(|id| match lookup.get(id) {
            Some(task) => format!("Blocked by \"{}\"", task.title),
            None => UNKNOWN_BLOCKER_REASON.to_string(),
        })
        .collect()
}

/// Incomplete tasks whose completion is not gated, in input order.
pub fn ready_tasks<'a>(tasks: &'a [Task], edges: &[Dependency]) -> Vec<&'a Task> {
    let index = EdgeIndex::new(edges);
    let lookup = TaskIndex::new(tasks);
    tasks
        .iter()
        .filter(|task| !task.completed)
        .filter(|task| !has_open_blocker(&task.id, &index, &lookup))
        .collect()
}

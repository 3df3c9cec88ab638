//! Dependency edges: construction, validation and partitioning.
//!
//! An edge reads "`task_id` depends on `depends_on_task_id`". Construction
//! and validation are separate steps; callers validate against their current
//! edge set before inserting the constructed record into their own store.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use ulid::Ulid;

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum DependencyType {
    #[default]
    Blocks,
    Requires,
    Suggests,
}

impl DependencyType {
    pub const ALL: [DependencyType; 3] = [
        DependencyType::Blocks,
        DependencyType::Requires,
        DependencyType::Suggests,
    ];

    /// `blocks` and `requires` gate completion; `suggests` is advisory.
    pub fn is_blocking(self) -> bool {
        matches!(self, DependencyType::Blocks | DependencyType::Requires)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            DependencyType::Blocks => "blocks",
            DependencyType::Requires => "requires",
            DependencyType::Suggests => "suggests",
        }
    }
}

impl fmt::Display for DependencyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for DependencyType {
    type Err = crate::error::Error;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        let trimmed = value.trim();
        DependencyType::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| {
                crate::error::Error::InvalidArgument(format!(
                    "unknown dependency type '{trimmed}' (expected blocks, requires or suggests)"
                ))
            })
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Dependency {
    pub id: String,
    pub task_id: String,
    pub depends_on_task_id: String,
    #[serde(rename = "type", default)]
    pub kind: DependencyType,
    pub created_at: DateTime<Utc>,
}

/// Source of fresh dependency ids.
pub trait IdGenerator {
    fn next_id(&self) -> String;
}

/// Default generator: one ULID per call.
#[derive(Debug, Clone, Copy, Default)]
pub struct UlidGenerator;

impl IdGenerator for UlidGenerator {
    fn next_id(&self) -> String {
        Ulid::new().to_string()
    }
}

/// Deterministic `<prefix>-1`, `<prefix>-2`, ... ids.
#[derive(Debug)]
pub struct SequentialIds {
    prefix: String,
    next: AtomicU64,
}

impl SequentialIds {
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: AtomicU64::new(1),
        }
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&self) -> String {
        let n = self.next.fetch_add(1, Ordering::Relaxed);
        format!("{}-{n}", self.prefix)
    }
}

/// Build a new edge with a ULID id and the current time.
///
/// Does not check for self-reference or cycles; see [`validate_dependency`].
pub fn create_dependency(
    task_id: impl Into<String>,
    depends_on_task_id: impl Into<String>,
    kind: DependencyType,
) -> Dependency {
    create_dependency_with(&UlidGenerator, Utc::now(), task_id, depends_on_task_id, kind)
}

pub fn create_dependency_with(
    ids: &dyn IdGenerator,
    created_at: DateTime<Utc>,
    task_id: impl Into<String>,
    depends_on_task_id: impl Into<String>,
    kind: DependencyType,
) -> Dependency {
    Dependency {
        id: ids.next_id(),
        task_id: task_id.into(),
        depends_on_task_id: depends_on_task_id.into(),
        kind,
        created_at,
    }
}

/// Why a proposed edge was refused. `Display` is the user-facing reason.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum Rejection {
    #[error("Task cannot depend on itself")]
    SelfDependency,

    #[error("This would create a circular dependency")]
    CircularDependency,
}

impl Rejection {
    pub fn rule(self) -> &'static str {
        match self {
            Rejection::SelfDependency => "self_dependency",
            Rejection::CircularDependency => "circular_dependency",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Validation {
    pub is_valid: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Validation {
    pub fn valid() -> Self {
        Self {
            is_valid: true,
            reason: None,
        }
    }

    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            is_valid: false,
            reason: Some(rejection.to_string()),
        }
    }
}

impl From<Result<(), Rejection>> for Validation {
    fn from(result: Result<(), Rejection>) -> Self {
        match result {
            Ok(()) => Validation::valid(),
            Err(rejection) => Validation::rejected(rejection),
        }
    }
}

/// Check whether `task_id` may depend on `depends_on_task_id` given the
/// edges that already exist.
pub fn validate_dependency(
    task_id: &str,
    depends_on_task_id: &str,
    existing: &[Dependency],
) -> Validation {
    check_dependency(task_id, depends_on_task_id, existing).into()
}

/// [`validate_dependency`] in `Result` form, for callers that propagate with `?`.
pub fn check_dependency(
    task_id: &str,
    depends_on_task_id: &str,
    existing: &[Dependency],
) -> Result<(), Rejection> {
    if task_id == depends_on_task_id {
        tracing::debug!(task_id, "rejected self-dependency");
        return Err(Rejection::SelfDependency);
    }

    let index = EdgeIndex::new(existing);
    if index.reaches(depends_on_task_id, task_id) {
        tracing::debug!(task_id, depends_on_task_id, "rejected circular dependency");
        return Err(Rejection::CircularDependency);
    }

    Ok(())
}

/// Edges of a task grouped by type.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TaskDependencies {
    pub blocks: Vec<Dependency>,
    pub requires: Vec<Dependency>,
    pub suggests: Vec<Dependency>,
}

impl TaskDependencies {
    pub fn len(&self) -> usize {
        self.blocks.len() + self.requires.len() + self.suggests.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Outgoing edges of `task_id` (the things it depends on), by type.
pub fn get_task_dependencies(task_id: &str, edges: &[Dependency]) -> TaskDependencies {
    let mut grouped = TaskDependencies::default();
    for edge in edges.iter().filter(|edge| edge.task_id == task_id) {
        let bucket = match edge.kind {
            DependencyType::Blocks => &mut grouped.blocks,
            DependencyType::Requires => &mut grouped.requires,
            DependencyType::Suggests => &mut grouped.suggests,
        };
        bucket.push(edge.clone());
    }
    grouped
}

/// Adjacency view over a borrowed edge slice, in both directions.
///
/// Neighbour lists keep the order edges appear in the input.
#[derive(Debug, Default)]
pub(crate) struct EdgeIndex<'a> {
    outgoing: HashMap<&'a str, Vec<&'a Dependency>>,
    incoming: HashMap<&'a str, Vec<&'a Dependency>>,
}

impl<'a> EdgeIndex<'a> {
    pub(crate) fn new(edges: &'a [Dependency]) -> Self {
        let mut index = EdgeIndex::default();
        for edge in edges {
            index
                .outgoing
                .entry(edge.task_id.as_str())
                .or_default()
                .push(edge);
            index
                .incoming
                .entry(edge.depends_on_task_id.as_str())
                .or_default()
                .push(edge);
        }
        index
    }

    /// Edges where `task_id` is the dependent.
    pub(crate) fn dependencies_of(&self, task_id: &str) -> &[&'a Dependency] {
        self.outgoing.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Edges where `task_id` is the prerequisite.
    pub(crate) fn dependents_of(&self, task_id: &str) -> &[&'a Dependency] {
        self.incoming.get(task_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Whether `target` is reachable from `start` by following depends-on edges.
    pub(crate) fn reaches(&self, start: &str, target: &str) -> bool {
        let mut visited: HashSet<&str> = HashSet::new();
        let mut stack: Vec<&str> = vec![start];
        while let Some(current) = stack.pop() {
            if current == target {
                return true;
            }
            if !visited.insert(current) {
                continue;
            }
            for edge in self.dependencies_of(current) {
                let next = edge.depends_on_task_id.as_str();
                if !visited.contains(next) {
                    stack.push(next);
                }
            }
        }
        false
    }

    /// Number of edges on the longest depends-on path starting at `task_id`.
    ///
    /// A node's depth is kept once all its edges are explored, so shared
    /// prerequisites are walked once per call. An edge back onto the current
    /// path counts once and stops there.
    pub(crate) fn longest_path(&self, task_id: &str) -> usize {
        struct Frame<'b> {
            id: &'b str,
            next: usize,
            depth: usize,
        }

        let mut on_path: HashSet<&str> = HashSet::new();
        let mut finished: HashMap<&str, usize> = HashMap::new();
        on_path.insert(task_id);
        let mut stack = vec![Frame {
            id: task_id,
            next: 0,
            depth: 0,
        }];
        let mut longest = 0;

        while let Some(frame) = stack.last_mut() {
            let edges = self.dependencies_of(frame.id);
            if let Some(edge) = edges.get(frame.next) {
                frame.next += 1;
                let child = edge.depends_on_task_id.as_str();
                if on_path.contains(child) {
                    frame.depth = frame.depth.max(1);
                    continue;
                }
                if let Some(&depth) = finished.get(child) {
                    frame.depth = frame.depth.max(depth + 1);
                    continue;
                }
                on_path.insert(child);
                stack.push(Frame {
                    id: child,
                    next: 0,
                    depth: 0,
                });
                continue;
            }

            let id = frame.id;
            let depth = frame.depth;
            stack.pop();
            on_path.remove(id);
            finished.insert(id, depth);
            match stack.last_mut() {
                Some(parent) => parent.depth = parent.depth.max(depth + 1),
                None => longest = depth,
            }
        }

        longest
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn edge(id: &str, task_id: &str, depends_on: &str, kind: DependencyType) -> Dependency {
        Dependency {
            id: id.to_string(),
            task_id: task_id.to_string(),
            depends_on_task_id: depends_on.to_string(),
            kind,
            created_at: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
        }
    }

    #[test]
    fn create_uses_injected_ids_and_time() {
        let ids = SequentialIds::new("dep");
        let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let first = create_dependency_with(&ids, at, "b", "a", DependencyType::Blocks);
        let second = create_dependency_with(&ids, at, "c", "b", DependencyType::Requires);
        assert_eq!(first.id, "dep-1");
        assert_eq!(second.id, "dep-2");
        assert_eq!(first.created_at, at);
        assert_eq!(second.kind, DependencyType::Requires);
    }

    #[test]
    fn create_does_not_validate() {
        let dep = create_dependency("a", "a", DependencyType::default());
        assert_eq!(dep.task_id, dep.depends_on_task_id);
        assert_eq!(dep.kind, DependencyType::Blocks);
        assert!(!dep.id.is_empty());
    }

    #[test]
    fn ulid_ids_are_unique() {
        let a = create_dependency("b", "a", DependencyType::Blocks);
        let b = create_dependency("b", "a", DependencyType::Blocks);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn self_dependency_rejected() {
        let result = validate_dependency("x", "x", &[]);
        assert!(!result.is_valid);
        assert_eq!(result.reason.as_deref(), Some("Task cannot depend on itself"));
    }

    #[test]
    fn transitive_cycle_rejected() {
        let existing = vec![
            edge("e1", "B", "A", DependencyType::Blocks),
            edge("e2", "C", "B", DependencyType::Blocks),
        ];
        let result = validate_dependency("A", "C", &existing);
        assert!(!result.is_valid);
        assert_eq!(
            result.reason.as_deref(),
            Some("This would create a circular dependency")
        );
        assert_eq!(
            check_dependency("A", "C", &existing),
            Err(Rejection::CircularDependency)
        );
    }

    #[test]
    fn cycle_search_follows_suggests_edges() {
        let existing = vec![edge("e1", "B", "A", DependencyType::Suggests)];
        assert!(!validate_dependency("A", "B", &existing).is_valid);
    }

    #[test]
    fn valid_edge_accepted() {
        let existing = vec![
            edge("e1", "B", "A", DependencyType::Blocks),
            edge("e2", "C", "B", DependencyType::Blocks),
        ];
        assert_eq!(validate_dependency("C", "A", &existing), Validation::valid());
        assert!(validate_dependency("D", "C", &existing).is_valid);
    }

    #[test]
    fn validation_terminates_on_already_cyclic_input() {
        let existing = vec![
            edge("e1", "A", "B", DependencyType::Blocks),
            edge("e2", "B", "A", DependencyType::Blocks),
        ];
        assert!(validate_dependency("X", "A", &existing).is_valid);
    }

    #[test]
    fn partition_by_type() {
        let edges = vec![
            edge("e1", "t", "a", DependencyType::Blocks),
            edge("e2", "t", "b", DependencyType::Requires),
            edge("e3", "t", "c", DependencyType::Suggests),
            edge("e4", "other", "t", DependencyType::Blocks),
        ];
        let grouped = get_task_dependencies("t", &edges);
        assert_eq!(grouped.blocks.len(), 1);
        assert_eq!(grouped.requires[0].depends_on_task_id, "b");
        assert_eq!(grouped.suggests[0].id, "e3");
        assert_eq!(grouped.len(), 3);
        assert!(get_task_dependencies("missing", &edges).is_empty());
    }

    #[test]
    fn longest_path_counts_edges() {
        let edges = vec![
            edge("e1", "3", "2", DependencyType::Blocks),
            edge("e2", "2", "1", DependencyType::Blocks),
            edge("e3", "3", "1", DependencyType::Blocks),
        ];
        let index = EdgeIndex::new(&edges);
        assert_eq!(index.longest_path("3"), 2);
        assert_eq!(index.longest_path("1"), 0);
        assert_eq!(index.longest_path("unknown"), 0);
    }

    #[test]
    fn longest_path_is_bounded_on_cycles() {
        let edges = vec![
            edge("e1", "A", "B", DependencyType::Blocks),
            edge("e2", "B", "A", DependencyType::Blocks),
        ];
        let index = EdgeIndex::new(&edges);
        assert_eq!(index.longest_path("A"), 2);
    }

    #[test]
    fn sibling_branches_do_not_share_visited_state() {
        // Diamond: top -> left -> bottom, top -> right -> bottom -> base.
        let edges = vec![
            edge("e1", "top", "left", DependencyType::Blocks),
            edge("e2", "top", "right", DependencyType::Blocks),
            edge("e3", "left", "bottom", DependencyType::Blocks),
            edge("e4", "right", "bottom", DependencyType::Blocks),
            edge("e5", "bottom", "base", DependencyType::Blocks),
        ];
        let index = EdgeIndex::new(&edges);
        assert_eq!(index.longest_path("top"), 3);
    }

    #[test]
    fn stacked_diamonds_are_walked_once() {
        // n{i} -> a{i}, b{i} -> n{i+1}: 2^40 distinct paths, 80 edges deep.
        let diamonds = 40;
        let mut edges = Vec::new();
        for i in 0..diamonds {
            let (top, bottom) = (format!("n{i}"), format!("n{}", i + 1));
            for side in ["a", "b"] {
                let mid = format!("{side}{i}");
                edges.push(edge(&format!("{top}-{mid}"), &top, &mid, DependencyType::Blocks));
                edges.push(edge(&format!("{mid}-{bottom}"), &mid, &bottom, DependencyType::Blocks));
            }
        }
        let index = EdgeIndex::new(&edges);
        assert_eq!(index.longest_path("n0"), 2 * diamonds);
        assert_eq!(index.longest_path("a0"), 2 * diamonds - 1);
        assert_eq!(index.longest_path(&format!("n{diamonds}")), 0);
    }

    #[test]
    fn back_edge_counts_once_after_shared_node_finishes() {
        // top reaches mid twice; mid -> top closes a cycle.
        let edges = vec![
            edge("e1", "top", "mid", DependencyType::Blocks),
            edge("e2", "top", "side", DependencyType::Blocks),
            edge("e3", "side", "mid", DependencyType::Blocks),
            edge("e4", "mid", "top", DependencyType::Blocks),
        ];
        let index = EdgeIndex::new(&edges);
        assert_eq!(index.longest_path("top"), 3);
    }

    #[test]
    fn type_parses_case_insensitively() {
        assert_eq!("Requires".parse::<DependencyType>().ok(), Some(DependencyType::Requires));
        assert!("maybe".parse::<DependencyType>().is_err());
    }

    #[test]
    fn serializes_type_field() {
        let dep = edge("e1", "b", "a", DependencyType::Suggests);
        let json = serde_json::to_value(&dep).expect("json");
        assert_eq!(json["type"], "suggests");
        assert_eq!(json["dependsOnTaskId"], "a");
        assert_eq!(json["taskId"], "b");
    }
}

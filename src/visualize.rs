//! Node/edge export for graph rendering.

use serde::{Deserialize, Serialize};

use crate::chain::has_open_blocker;
use crate::dependency::{Dependency, DependencyType, EdgeIndex};
use crate::task::{Task, TaskIndex};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisualNode {
    pub id: String,
    pub label: String,
    pub completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<String>,
    pub is_blocked: bool,
}

/// Edge from prerequisite (`source`) to dependent (`target`).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct VisualEdge {
    pub id: String,
    pub source: String,
    pub target: String,
    #[serde(rename = "type")]
    pub kind: DependencyType,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Visualization {
    pub nodes: Vec<VisualNode>,
    pub edges: Vec<VisualEdge>,
}

/// One node per task and one edge per dependency, every edge type included.
pub fn get_dependency_visualization(tasks: &[Task], edges: &[Dependency]) -> Visualization {
    let index = EdgeIndex::new(edges);
    let lookup = TaskIndex::new(tasks);

    let nodes = tasks
        .iter()
        .map(|task| VisualNode {
            id: task.id.clone(),
            label: task.title.clone(),
            completed: task.completed,
            project_id: task.project_id.clone(),
            is_blocked: has_open_blocker(&task.id, &index, &lookup),
        })
        .collect();

    let edges = edges
        .iter()
        .map(|edge| VisualEdge {
            id: edge.id.clone(),
            source: edge.depends_on_task_id.clone(),
            target: edge.task_id.clone(),
            kind: edge.kind,
        })
        .collect();

    Visualization { nodes, edges }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dependency::{create_dependency_with, SequentialIds};
    use chrono::Utc;

    #[test]
    fn edges_point_from_prerequisite_to_dependent() {
        let ids = SequentialIds::new("dep");
        let now = Utc::now();
        let tasks = vec![
            Task::new("1", "Design API").with_project("api"),
            Task::new("2", "Implement API").with_project("api"),
            Task::new("3", "Write docs"),
        ];
        let edges = vec![
            create_dependency_with(&ids, now, "2", "1", DependencyType::Blocks),
            create_dependency_with(&ids, now, "3", "2", DependencyType::Suggests),
        ];

        let view = get_dependency_visualization(&tasks, &edges);
        assert_eq!(view.nodes.len(), 3);
        assert_eq!(view.edges.len(), 2);

        assert_eq!(view.edges[0].source, "1");
        assert_eq!(view.edges[0].target, "2");
        assert_eq!(view.edges[1].kind, DependencyType::Suggests);

        assert!(!view.nodes[0].is_blocked);
        assert!(view.nodes[1].is_blocked);
        assert!(!view.nodes[2].is_blocked);
        assert_eq!(view.nodes[1].label, "Implement API");
        assert_eq!(view.nodes[1].project_id.as_deref(), Some("api"));
    }

    #[test]
    fn edges_to_unknown_tasks_are_still_exported() {
        let ids = SequentialIds::new("dep");
        let edges = vec![create_dependency_with(
            &ids,
            Utc::now(),
            "ghost",
            "phantom",
            DependencyType::Requires,
        )];
        let view = get_dependency_visualization(&[], &edges);
        assert!(view.nodes.is_empty());
        assert_eq!(view.edges[0].source, "phantom");
    }
}

//! taskdeps - Task Dependency Graph Library
//!
//! A stateless engine over a snapshot of tasks and dependency edges. Every
//! operation takes the current task and edge slices and returns a fresh
//! view; nothing is cached and nothing is persisted by the engine.
//!
//! # Core Concepts
//!
//! - **Dependency**: directed edge "task depends on prerequisite", typed as
//!   `blocks`, `requires` (both gate completion) or `suggests` (advisory)
//! - **Validation**: self-dependencies and cycles are refused before an edge
//!   is inserted
//! - **Chain**: direct blockers, held-up dependents, and longest path depth
//! - **Suggestions**: within-project keyword similarity, scored 0-100
//!
//! # Module Organization
//!
//! - `task`: Task records and id lookup
//! - `dependency`: Edge construction, validation and partitioning
//! - `chain`: Blocking chains, completion gating, blocking reasons
//! - `suggest`: Similarity-based dependency suggestions
//! - `visualize`: Node/edge export for rendering
//! - `snapshot`: JSON snapshot file used by the CLI
//! - `config`: Configuration loading from `.taskdeps.toml`
//! - `error`: Error types and result aliases
//! - `output`: Human and JSON output for CLI commands
//! - `cli`: Command-line interface using clap

pub mod chain;
pub mod cli;
pub mod config;
pub mod dependency;
pub mod error;
pub mod output;
pub mod snapshot;
pub mod suggest;
pub mod task;
pub mod visualize;

pub use chain::{
    can_complete_task, get_blocking_reasons, get_dependency_chain, ready_tasks, DependencyChain,
};
pub use dependency::{
    check_dependency, create_dependency, create_dependency_with, get_task_dependencies,
    validate_dependency, Dependency, DependencyType, IdGenerator, Rejection, SequentialIds,
    TaskDependencies, UlidGenerator, Validation,
};
pub use error::{Error, Result};
pub use suggest::{
    generate_dependency_suggestions, generate_dependency_suggestions_with, DependencySuggestion,
};
pub use task::{Task, TaskIndex};
pub use visualize::{get_dependency_visualization, VisualEdge, VisualNode, Visualization};

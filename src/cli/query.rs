//! Read-only taskdeps commands: deps, chain, can-complete, ready, graph.

use serde::Serialize;

use crate::chain::{can_complete_task, get_blocking_reasons, get_dependency_chain, ready_tasks};
use crate::dependency::{get_task_dependencies, Dependency};
use crate::error::Result;
use crate::output::{emit, Report};
use crate::snapshot::Snapshot;
use crate::task::TaskIndex;
use crate::visualize::get_dependency_visualization;

use super::Context;

pub fn run_deps(ctx: &Context, task_id: &str) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    let grouped = get_task_dependencies(task_id, &snapshot.dependencies);

    let mut report = Report::new(format!("Dependencies of {}", label(&snapshot, task_id)));
    report.fact("blocks", grouped.blocks.len());
    report.fact("requires", grouped.requires.len());
    report.fact("suggests", grouped.suggests.len());
    let lookup = TaskIndex::new(&snapshot.tasks);
    for edge in grouped
        .blocks
        .iter()
        .chain(&grouped.requires)
        .chain(&grouped.suggests)
    {
        report.item(describe_edge(edge, &lookup));
    }
    note_unknown(&mut report, &snapshot, task_id);

    emit(ctx.output, "deps", &grouped, &report)
}

pub fn run_chain(ctx: &Context, task_id: &str) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    let chain = get_dependency_chain(task_id, &snapshot.dependencies, &snapshot.tasks);

    let mut report = Report::new(format!("Chain for {}", label(&snapshot, task_id)));
    report.fact("blocked", yes_no(chain.is_blocked));
    report.fact("chain length", chain.chain_length);
    if !chain.blocked_by.is_empty() {
        report.fact("blocked by", chain.blocked_by.join(", "));
    }
    if !chain.blocks.is_empty() {
        report.fact("blocks", chain.blocks.join(", "));
    }
    note_unknown(&mut report, &snapshot, task_id);

    emit(ctx.output, "chain", &chain, &report)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CompletionGate {
    task_id: String,
    can_complete: bool,
    reasons: Vec<String>,
}

pub fn run_can_complete(ctx: &Context, task_id: &str) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    let gate = CompletionGate {
        task_id: task_id.to_string(),
        can_complete: can_complete_task(task_id, &snapshot.dependencies, &snapshot.tasks),
        reasons: get_blocking_reasons(task_id, &snapshot.dependencies, &snapshot.tasks),
    };

    let verdict = if gate.can_complete {
        "can be completed"
    } else {
        "is blocked"
    };
    let mut report = Report::new(format!("{} {verdict}", label(&snapshot, task_id)));
    for reason in &gate.reasons {
        report.item(reason.as_str());
    }
    note_unknown(&mut report, &snapshot, task_id);

    emit(ctx.output, "can-complete", &gate, &report)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ReadyTask {
    id: String,
    title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_id: Option<String>,
}

pub fn run_ready(ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    let ready: Vec<ReadyTask> = ready_tasks(&snapshot.tasks, &snapshot.dependencies)
        .into_iter()
        .map(|task| ReadyTask {
            id: task.id.clone(),
            title: task.title.clone(),
            project_id: task.project_id.clone(),
        })
        .collect();

    let mut report = Report::new(format!("{} ready task(s)", ready.len()));
    for task in &ready {
        report.item(format!("{} {}", task.id, task.title));
    }

    emit(ctx.output, "ready", &ready, &report)
}

pub fn run_graph(ctx: &Context) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    let view = get_dependency_visualization(&snapshot.tasks, &snapshot.dependencies);

    let mut report = Report::new("Dependency graph");
    report.fact("nodes", view.nodes.len());
    report.fact("edges", view.edges.len());
    report.fact("blocked", view.nodes.iter().filter(|node| node.is_blocked).count());
    for edge in &view.edges {
        report.item(format!("{} -> {} ({})", edge.source, edge.target, edge.kind));
    }

    emit(ctx.output, "graph", &view, &report)
}

fn describe_edge(edge: &Dependency, lookup: &TaskIndex<'_>) -> String {
    format!(
        "{} {} \"{}\" [{}]",
        edge.kind,
        edge.depends_on_task_id,
        lookup.title_or_unknown(&edge.depends_on_task_id),
        edge.id
    )
}

pub(super) fn label(snapshot: &Snapshot, task_id: &str) -> String {
    match snapshot.task(task_id) {
        Some(task) => format!("{task_id} \"{}\"", task.title),
        None => task_id.to_string(),
    }
}

pub(super) fn note_unknown(report: &mut Report, snapshot: &Snapshot, task_id: &str) {
    if snapshot.task(task_id).is_none() {
        report.note(format!("task {task_id} is not in the snapshot"));
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "yes"
    } else {
        "no"
    }
}

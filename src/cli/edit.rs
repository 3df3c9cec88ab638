//! Commands that check or change the snapshot's edge set: validate, link, unlink.

use crate::dependency::{check_dependency, DependencyType, Validation};
use crate::error::Result;
use crate::output::{emit, Report};

use super::query::{label, note_unknown};
use super::Context;

/// Prints the validation result; a rejection is returned as an error.
pub fn run_validate(ctx: &Context, task_id: &str, depends_on: &str) -> Result<()> {
    let snapshot = ctx.load_snapshot()?;
    check_dependency(task_id, depends_on, &snapshot.dependencies)?;

    let mut report = Report::new(format!(
        "{} may depend on {}",
        label(&snapshot, task_id),
        label(&snapshot, depends_on)
    ));
    note_unknown(&mut report, &snapshot, task_id);
    note_unknown(&mut report, &snapshot, depends_on);

    emit(ctx.output, "validate", &Validation::valid(), &report)
}

pub fn run_link(ctx: &Context, task_id: &str, depends_on: &str, kind: &str) -> Result<()> {
    let kind: DependencyType = kind.parse()?;
    let mut snapshot = ctx.load_snapshot()?;
    let dependency = snapshot.link(task_id, depends_on, kind)?.clone();
    snapshot.save(&ctx.snapshot_path)?;
    tracing::debug!(id = %dependency.id, task_id, depends_on, %kind, "added dependency");

    let mut report = Report::new(format!("Added dependency {}", dependency.id));
    report.fact("task", label(&snapshot, task_id));
    report.fact("depends on", label(&snapshot, depends_on));
    report.fact("type", kind);
    note_unknown(&mut report, &snapshot, task_id);
    note_unknown(&mut report, &snapshot, depends_on);

    emit(ctx.output, "link", &dependency, &report)
}

pub fn run_unlink(ctx: &Context, dependency_id: &str) -> Result<()> {
    let mut snapshot = ctx.load_snapshot()?;
    let removed = snapshot.unlink(dependency_id)?;
    snapshot.save(&ctx.snapshot_path)?;

    let mut report = Report::new(format!("Removed dependency {}", removed.id));
    report.fact("task", label(&snapshot, &removed.task_id));
    report.fact("depended on", label(&snapshot, &removed.depends_on_task_id));

    emit(ctx.output, "unlink", &removed, &report)
}

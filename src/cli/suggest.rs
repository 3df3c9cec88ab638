//! taskdeps suggest command.

use crate::error::{Error, Result};
use crate::output::{emit, Report};
use crate::suggest::generate_dependency_suggestions_with;
use crate::task::TaskIndex;

use super::Context;

pub fn run(ctx: &Context, limit: Option<usize>) -> Result<()> {
    if limit == Some(0) {
        return Err(Error::InvalidArgument("--limit must be >= 1".to_string()));
    }
    let snapshot = ctx.load_snapshot()?;
    let mut config = ctx.config.suggestions.clone();
    if limit.is_some() {
        config.limit = limit;
    }

    let suggestions =
        generate_dependency_suggestions_with(&config, &snapshot.tasks, &snapshot.dependencies);

    let lookup = TaskIndex::new(&snapshot.tasks);
    let mut report = Report::new(format!("{} suggestion(s)", suggestions.len()));
    if config.min_confidence > 0 {
        report.fact("min confidence", config.min_confidence);
    }
    for suggestion in &suggestions {
        report.item(format!(
            "{:>3}% {} \"{}\" depends on {} \"{}\"",
            suggestion.confidence,
            suggestion.task_id,
            lookup.title_or_unknown(&suggestion.task_id),
            suggestion.suggested_dependency_id,
            lookup.title_or_unknown(&suggestion.suggested_dependency_id),
        ));
    }

    emit(ctx.output, "suggest", &suggestions, &report)
}

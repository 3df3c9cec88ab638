//! Terminal and JSON rendering for taskdeps commands.
//!
//! Each command produces a serializable payload and a [`Report`]. With
//! `--json` the payload is wrapped in a versioned envelope on stdout;
//! otherwise the report is printed unless `--quiet` is set.

use std::fmt;

use serde::Serialize;

use crate::error::{Error, JsonError, Result};

pub const SCHEMA_VERSION: &str = "taskdeps.v1";

#[derive(Debug, Clone, Copy)]
pub struct OutputOptions {
    pub json: bool,
    pub quiet: bool,
}

/// Human-readable result of one command.
///
/// Renders as a headline, indented `key: value` facts, one `- ` line per
/// listed item (blockers, edges, suggestions), then `note:` lines for tasks
/// the snapshot does not know about.
#[derive(Debug, Clone, Default)]
pub struct Report {
    headline: String,
    facts: Vec<(&'static str, String)>,
    items: Vec<String>,
    notes: Vec<String>,
}

impl Report {
    pub fn new(headline: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            ..Self::default()
        }
    }

    pub fn fact(&mut self, key: &'static str, value: impl fmt::Display) {
        self.facts.push((key, value.to_string()));
    }

    pub fn item(&mut self, line: impl Into<String>) {
        self.items.push(line.into());
    }

    pub fn note(&mut self, note: impl Into<String>) {
        self.notes.push(note.into());
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.headline)?;
        for (key, value) in &self.facts {
            write!(f, "\n  {key}: {value}")?;
        }
        for item in &self.items {
            write!(f, "\n  - {item}")?;
        }
        for note in &self.notes {
            write!(f, "\nnote: {note}")?;
        }
        Ok(())
    }
}

#[derive(Serialize)]
struct Envelope<'a, T: Serialize> {
    schema_version: &'static str,
    command: &'a str,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<&'a T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<JsonError>,
}

pub fn emit<T: Serialize>(
    options: OutputOptions,
    command: &str,
    data: &T,
    report: &Report,
) -> Result<()> {
    if options.json {
        let envelope = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "success",
            data: Some(data),
            error: None,
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
    } else if !options.quiet {
        println!("{report}");
    }
    Ok(())
}

/// JSON errors go to stdout like any other envelope; human errors to stderr.
pub fn emit_error(command: &str, err: &Error, json: bool) -> Result<()> {
    if json {
        let envelope: Envelope<'_, ()> = Envelope {
            schema_version: SCHEMA_VERSION,
            command,
            status: "error",
            data: None,
            error: Some(JsonError::from(err)),
        };
        println!("{}", serde_json::to_string_pretty(&envelope)?);
        return Ok(());
    }

    eprintln!("error: {err}");
    if let Some(hint) = err.hint() {
        eprintln!("hint: {hint}");
    }
    Ok(())
}

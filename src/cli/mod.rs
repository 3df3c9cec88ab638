//! Command-line interface for taskdeps
//!
//! This module defines the CLI structure using clap derive macros.
//! Subcommand bodies live in `query`, `edit` and `suggest`.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::output::OutputOptions;
use crate::snapshot::Snapshot;

mod edit;
mod query;
mod suggest;

/// taskdeps - task dependency graph engine
///
/// Inspect blocking chains, validate new dependencies and rank dependency
/// suggestions over a JSON snapshot of tasks and edges.
#[derive(Parser, Debug)]
#[command(name = "taskdeps")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Snapshot file with `tasks` and `dependencies` (defaults to config)
    #[arg(long, global = true, env = "TASKDEPS_SNAPSHOT")]
    pub snapshot: Option<PathBuf>,

    /// Config file (defaults to ./.taskdeps.toml when present)
    #[arg(long, global = true, env = "TASKDEPS_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Commands,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// List a task's dependencies grouped by type
    Deps {
        /// Task ID
        task: String,
    },

    /// Show what blocks a task and what it blocks
    Chain {
        /// Task ID
        task: String,
    },

    /// Check whether a task can be completed
    CanComplete {
        /// Task ID
        task: String,
    },

    /// List open tasks that are not blocked
    Ready,

    /// Rank suggested dependencies by similarity
    Suggest {
        /// Maximum number of suggestions (overrides config)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// Export graph nodes and edges
    Graph,

    /// Check whether a dependency may be added
    Validate {
        /// Dependent task ID
        task: String,

        /// Prerequisite task ID
        depends_on: String,
    },

    /// Validate and add a dependency to the snapshot
    Link {
        /// Dependent task ID
        task: String,

        /// Prerequisite task ID
        depends_on: String,

        /// Dependency type: blocks, requires, suggests
        #[arg(long = "type", default_value = "blocks")]
        kind: String,
    },

    /// Remove a dependency from the snapshot by ID
    Unlink {
        /// Dependency ID
        id: String,
    },
}

/// Resolved config, snapshot location and output mode for one invocation.
pub(crate) struct Context {
    pub config: Config,
    pub snapshot_path: PathBuf,
    pub output: OutputOptions,
}

impl Context {
    fn resolve(
        snapshot: Option<PathBuf>,
        config: Option<PathBuf>,
        json: bool,
        quiet: bool,
    ) -> Result<Self> {
        let config = match config {
            Some(path) => Config::load(&path)?,
            None => Config::load_from_dir(Path::new(".")),
        };
        let snapshot_path = snapshot.unwrap_or_else(|| config.snapshot.path.clone());
        Ok(Self {
            config,
            snapshot_path,
            output: OutputOptions { json, quiet },
        })
    }

    pub fn load_snapshot(&self) -> Result<Snapshot> {
        Snapshot::load(&self.snapshot_path)
    }
}

impl Cli {
    pub fn run(self) -> Result<()> {
        let ctx = Context::resolve(self.snapshot, self.config, self.json, self.quiet)?;
        match self.command {
            Commands::Deps { task } => query::run_deps(&ctx, &task),
            Commands::Chain { task } => query::run_chain(&ctx, &task),
            Commands::CanComplete { task } => query::run_can_complete(&ctx, &task),
            Commands::Ready => query::run_ready(&ctx),
            Commands::Graph => query::run_graph(&ctx),
            Commands::Suggest { limit } => suggest::run(&ctx, limit),
            Commands::Validate { task, depends_on } => edit::run_validate(&ctx, &task, &depends_on),
            Commands::Link {
                task,
                depends_on,
                kind,
            } => edit::run_link(&ctx, &task, &depends_on, &kind),
            Commands::Unlink { id } => edit::run_unlink(&ctx, &id),
        }
    }
}

/// Subcommand name for labelling error envelopes, taken from raw arguments
/// (without the program name) so it works even when clap parsing fails.
pub fn command_name(args: impl IntoIterator<Item = String>) -> String {
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--snapshot" | "--config" => {
                args.next();
            }
            flag if flag.starts_with('-') => {}
            _ => return arg,
        }
    }
    "taskdeps".to_string()
}

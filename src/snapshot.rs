//! JSON snapshot of tasks and dependency edges.
//!
//! The CLI uses this file as its caller-side store. The graph engine never
//! reads or writes it; it only sees the slices loaded from here.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::dependency::{check_dependency, create_dependency, Dependency, DependencyType};
use crate::error::{Error, Result};
use crate::task::Task;

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Snapshot {
    #[serde(default)]
    pub tasks: Vec<Task>,
    #[serde(default)]
    pub dependencies: Vec<Dependency>,
}

impl Snapshot {
    pub fn new(tasks: Vec<Task>, dependencies: Vec<Dependency>) -> Self {
        Self {
            tasks,
            dependencies,
        }
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::SnapshotNotFound(path.to_path_buf()));
        }
        let content = fs::read_to_string(path)?;
        let snapshot: Snapshot = serde_json::from_str(&content)?;
        tracing::debug!(
            path = %path.display(),
            tasks = snapshot.tasks.len(),
            dependencies = snapshot.dependencies.len(),
            "loaded snapshot"
        );
        Ok(snapshot)
    }

    /// Write the snapshot via a temp file and rename.
    ///
    /// On failure the temp file is removed and the target is left as it was.
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let temp_path = path.with_extension(format!(
            "{}.tmp.{}",
            path.extension().and_then(|e| e.to_str()).unwrap_or(""),
            std::process::id()
        ));
        let mut data = serde_json::to_vec_pretty(self)?;
        data.push(b'\n');

        if let Err(err) = replace_with(&temp_path, path, &data) {
            let _ = fs::remove_file(&temp_path);
            return Err(Error::OperationFailed(format!(
                "could not write snapshot {}: {err}",
                path.display()
            )));
        }
        tracing::debug!(
            path = %path.display(),
            dependencies = self.dependencies.len(),
            "saved snapshot"
        );
        Ok(())
    }

    pub fn task(&self, id: &str) -> Option<&Task> {
        self.tasks.iter().find(|task| task.id == id)
    }

    /// Validate, construct and insert a new edge.
    pub fn link(
        &mut self,
        task_id: &str,
        depends_on_task_id: &str,
        kind: DependencyType,
    ) -> Result<&Dependency> {
        check_dependency(task_id, depends_on_task_id, &self.dependencies)?;
        let dependency = create_dependency(task_id, depends_on_task_id, kind);
        self.dependencies.push(dependency);
        let index = self.dependencies.len() - 1;
        Ok(&self.dependencies[index])
    }

    /// Remove an edge by id.
    pub fn unlink(&mut self, dependency_id: &str) -> Result<Dependency> {
        let position = self
            .dependencies
            .iter()
            .position(|edge| edge.id == dependency_id)
            .ok_or_else(|| Error::DependencyNotFound(dependency_id.to_string()))?;
        Ok(self.dependencies.remove(position))
    }
}

fn replace_with(temp_path: &Path, path: &Path, data: &[u8]) -> std::io::Result<()> {
    let mut temp_file = File::create(temp_path)?;
    temp_file.write_all(data)?;
    temp_file.sync_all()?;
    drop(temp_file);
    fs::rename(temp_path, path)
}

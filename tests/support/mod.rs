use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{json, Value};
use tempfile::TempDir;

/// Temporary working directory holding a `tasks.json` snapshot.
pub struct TestBoard {
    dir: TempDir,
}

impl TestBoard {
    pub fn with_snapshot(snapshot: &Value) -> std::io::Result<Self> {
        let dir = tempfile::tempdir()?;
        let board = Self { dir };
        board.write_file("tasks.json", &serde_json::to_string_pretty(snapshot)?)?;
        Ok(board)
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    pub fn snapshot_path(&self) -> PathBuf {
        self.dir.path().join("tasks.json")
    }

    pub fn write_file(&self, rel_path: &str, contents: &str) -> std::io::Result<PathBuf> {
        let path = self.dir.path().join(rel_path);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, contents)?;
        Ok(path)
    }

    pub fn read_snapshot(&self) -> Result<Value, Box<dyn std::error::Error>> {
        let contents = fs::read_to_string(self.snapshot_path())?;
        Ok(serde_json::from_str(&contents)?)
    }
}

/// Three-step API plan: 2 depends on 1, 3 depends on 2.
pub fn api_plan() -> Value {
    json!({
        "tasks": [
            {"id": "1", "title": "Design API", "completed": false, "projectId": "api"},
            {"id": "2", "title": "Implement API", "completed": false, "projectId": "api"},
            {"id": "3", "title": "Test API", "completed": false, "projectId": "api"}
        ],
        "dependencies": [
            {"id": "d1", "taskId": "2", "dependsOnTaskId": "1", "type": "blocks",
             "createdAt": "2024-03-01T10:00:00Z"},
            {"id": "d2", "taskId": "3", "dependsOnTaskId": "2", "type": "blocks",
             "createdAt": "2024-03-01T10:05:00Z"}
        ]
    })
}

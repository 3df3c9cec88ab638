//! Error types for taskdeps
//!
//! Exit codes:
//! - 0: Success
//! - 2: User error (bad args, invalid config, missing snapshot)
//! - 3: Rejected by policy (self-dependency, circular dependency)
//! - 4: Operation failed (I/O, JSON, TOML, snapshot writes)

use std::path::PathBuf;
use thiserror::Error;

use crate::dependency::Rejection;

/// Exit codes for the taskdeps CLI
pub mod exit_codes {
    pub const SUCCESS: i32 = 0;
    pub const USER_ERROR: i32 = 2;
    pub const POLICY_BLOCKED: i32 = 3;
    pub const OPERATION_FAILED: i32 = 4;
}

/// Main error type for taskdeps operations
///
/// The graph engine itself never returns these; they come from the
/// snapshot, config and CLI layers around it.
#[derive(Error, Debug)]
pub enum Error {
    // User errors (exit code 2)
    #[error("Snapshot not found: {0}")]
    SnapshotNotFound(PathBuf),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Dependency not found: {0}")]
    DependencyNotFound(String),

    // Policy blocks (exit code 3)
    #[error("Dependency rejected: {0}")]
    DependencyRejected(#[from] Rejection),

    // Operation failures (exit code 4)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    #[error("Operation failed: {0}")]
    OperationFailed(String),
}

impl Error {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            // User errors
            Error::SnapshotNotFound(_)
            | Error::InvalidConfig(_)
            | Error::InvalidArgument(_)
            | Error::DependencyNotFound(_) => exit_codes::USER_ERROR,

            // Policy blocks
            Error::DependencyRejected(_) => exit_codes::POLICY_BLOCKED,

            // Operation failures
            Error::Io(_)
            | Error::Json(_)
            | Error::TomlParse(_)
            | Error::TomlSerialize(_)
            | Error::OperationFailed(_) => exit_codes::OPERATION_FAILED,
        }
    }

    /// Stable category name for JSON output, one per exit code.
    pub fn kind(&self) -> &'static str {
        match self.exit_code() {
            exit_codes::USER_ERROR => "user_error",
            exit_codes::POLICY_BLOCKED => "policy_blocked",
            _ => "operation_failed",
        }
    }

    /// Command worth running next, shown under the error message.
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Error::SnapshotNotFound(_) => Some("pass --snapshot <path> or set TASKDEPS_SNAPSHOT"),
            Error::InvalidConfig(_) => Some("fix .taskdeps.toml then retry"),
            Error::DependencyNotFound(_) => Some("taskdeps deps <task>"),
            Error::DependencyRejected(_) => Some("taskdeps chain <task>"),
            _ => None,
        }
    }

    /// Structured details for JSON output, when the variant carries any.
    pub fn details(&self) -> Option<serde_json::Value> {
        match self {
            Error::SnapshotNotFound(path) => Some(serde_json::json!({
                "path": path.to_string_lossy(),
            })),
            Error::InvalidConfig(message)
            | Error::InvalidArgument(message)
            | Error::OperationFailed(message) => Some(serde_json::json!({
                "message": message,
            })),
            Error::DependencyNotFound(id) => Some(serde_json::json!({
                "dependency_id": id,
            })),
            Error::DependencyRejected(rejection) => Some(serde_json::json!({
                "reason": rejection.to_string(),
                "rule": rejection.rule(),
            })),
            _ => None,
        }
    }
}

/// Result type alias for taskdeps operations
pub type Result<T> = std::result::Result<T, Error>;

/// `error` body of the JSON envelope.
#[derive(Debug, serde::Serialize)]
pub struct JsonError {
    pub message: String,
    pub code: i32,
    pub kind: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hint: Option<&'static str>,
}

impl From<&Error> for JsonError {
    fn from(err: &Error) -> Self {
        JsonError {
            message: err.to_string(),
            code: err.exit_code(),
            kind: err.kind(),
            details: err.details(),
            hint: err.hint(),
        }
    }
}

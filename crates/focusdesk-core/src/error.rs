//! Core error types for focusdesk-core.
//!
//! Synchronous rejections (`InvalidSettings`, `InvalidInput`,
//! `NoWorkspaceSelected`, `Unauthenticated`) are raised before any local
//! mutation takes place. `Sync` is raised after an optimistic local mutation
//! has already applied; the local state is retained.

use thiserror::Error;

use crate::remote::RemoteError;

/// Core error type for focusdesk-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Rejected settings update. No field of the previous settings changes.
    #[error("invalid timer settings: {reason}")]
    InvalidSettings { reason: String },

    /// Malformed caller input (empty title, unparsable field).
    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    /// Task creation attempted while signed in with no current workspace.
    #[error("no workspace selected")]
    NoWorkspaceSelected,

    /// Workspace mutation attempted without identity, or against a
    /// workspace owned by someone else.
    #[error("not signed in")]
    Unauthenticated,

    /// Remote persistence failed. The optimistic local mutation, if any,
    /// is never rolled back.
    #[error("sync failed: {0}")]
    Sync(#[from] RemoteError),

    #[error("task not found: {0}")]
    TaskNotFound(String),

    #[error("workspace not found: {0}")]
    WorkspaceNotFound(String),

    /// SQLite storage errors
    #[error("storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// Configuration load/save/parse errors
    #[error("config error: {0}")]
    Config(String),

    /// IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

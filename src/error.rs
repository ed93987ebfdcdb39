//! Error types for Dispatchr
//!
//! Centralized error handling using thiserror.

use thiserror::Error;

/// All error types that can occur in Dispatchr
#[derive(Debug, Error)]
pub enum DispatchError {
    /// An executor invocation failed; aborts the whole run
    #[error("Task failed: {0}")]
    TaskFailed(String),

    /// Plan file is malformed or unusable
    #[error("Plan error: {0}")]
    Plan(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for Dispatchr operations
pub type Result<T> = std::result::Result<T, DispatchError>;

//! Tool-specific error types.

use thiserror::Error;

use crate::domains::rework::ApiError;

/// Errors that can occur during tool registration and invocation.
#[derive(Debug, Error)]
pub enum ToolError {
    /// A tool with the same name is already registered.
    #[error("Tool already registered: {0}")]
    DuplicateTool(String),

    /// The requested tool was not found.
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    /// The invocation arguments do not satisfy the tool's input schema.
    #[error("Invalid arguments: {path}: {constraint}")]
    Validation { path: String, constraint: String },

    /// The tool's handler failed; carries the original cause.
    #[error("Tool execution failed: {0}")]
    Handler(#[from] ApiError),

    /// An internal error occurred.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl ToolError {
    /// Create a validation error for a field path.
    pub fn validation(path: impl Into<String>, constraint: impl Into<String>) -> Self {
        Self::Validation {
            path: path.into(),
            constraint: constraint.into(),
        }
    }

    /// Create a new "internal" error.
    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }

    /// Whether this error is a protocol-level rejection (bad request) rather
    /// than a handler failure.
    pub fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::DuplicateTool(_) | Self::UnknownTool(_) | Self::Validation { .. }
        )
    }
}

// SPDX-License-Identifier: MIT

//! Application error types surfaced to the rendering layer.

use serde::Serialize;

/// A single failed form-field check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// Application error type. Every remote-call failure is caught at the
/// call site and carried here as a value; nothing propagates as a panic
/// into the rendering layer.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Network failure: {0}")]
    Network(String),

    #[error("Request rejected: {0}")]
    Rejected(String),

    #[error("Validation failed")]
    Validation(Vec<FieldError>),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Authentication failed: {0}")]
    Auth(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// The remote collaborator declined an otherwise well-formed request
    /// (e.g. liking one's own recipe). Expected, non-fatal.
    pub fn is_rejection(&self) -> bool {
        matches!(self, AppError::Rejected(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    /// Per-field failures for form rendering; empty for non-validation
    /// errors.
    pub fn field_errors(&self) -> &[FieldError] {
        match self {
            AppError::Validation(fields) => fields,
            _ => &[],
        }
    }

    /// Message suitable for a user-facing notification.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Network(_) => "Network error. Please try again.".to_string(),
            AppError::Rejected(msg) => msg.clone(),
            AppError::Validation(fields) => fields
                .first()
                .map(|f| f.message.clone())
                .unwrap_or_else(|| "Please fix the highlighted fields.".to_string()),
            AppError::NotFound(_) => "Not found.".to_string(),
            AppError::Auth(msg) => msg.clone(),
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal error");
                "Something went wrong.".to_string()
            }
        }
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, AppError>;

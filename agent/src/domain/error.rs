//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error`. Infrastructure failures are
//! carried through `ActionError::Execution` untouched so the dispatch layer
//! never reinterprets them.

use thiserror::Error;

// ── Action errors ─────────────────────────────────────────────────────────────

/// Errors surfaced by resolving or running an action.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error("unknown action '{0}'")]
    UnknownAction(String),

    #[error("invalid arguments for '{action}': {reason}")]
    InvalidArguments {
        action: &'static str,
        reason: String,
    },

    #[error("task '{0}' not found")]
    TaskNotFound(String),

    #[error("task '{id}' failed: {message}")]
    TaskFailed { id: String, message: String },

    #[error(transparent)]
    Execution(#[from] anyhow::Error),
}

impl ActionError {
    /// Shorthand for an `InvalidArguments` error.
    #[must_use]
    pub fn invalid(action: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidArguments {
            action,
            reason: reason.into(),
        }
    }
}

// ── Settings errors ───────────────────────────────────────────────────────────

/// Errors raised while wiring collaborators from settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("unsupported blobstore provider '{0}' (supported: local)")]
    UnsupportedBlobstore(String),

    #[error("blobstore option '{0}' is required")]
    MissingBlobstoreOption(&'static str),
}

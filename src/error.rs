//! Error taxonomy for backend calls and page workflows.
//!
//! DESIGN
//! ======
//! Two layers. [`BackendError`] describes what went wrong on the wire;
//! [`Error`] describes what the page should tell the user. The split keeps
//! "the backend refused" (`Rejected`) apart from "the backend accepted but
//! nothing changed" (`NoRowsAffected`, `DeleteNotApplied`), which almost
//! always points at a row-level policy misconfiguration.
//!
//! Every error is terminal for the action that raised it. `retryable()` is
//! informational; nothing in this crate retries on its own.

#[cfg(test)]
#[path = "error_test.rs"]
mod tests;

use crate::models::{EventId, EventStatus};

/// Stable machine-readable code for an error, used in logs and CLI output.
pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

// =============================================================================
// TRANSPORT
// =============================================================================

/// Failures reported by a [`crate::backend::Backend`] implementation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Request(String),

    /// The backend answered with a non-success status.
    #[error("backend returned {status}: {message}")]
    Status { status: u16, message: String },

    /// The response body did not match the expected shape.
    #[error("response decode failed: {0}")]
    Decode(String),
}

impl ErrorCode for BackendError {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Request(_) => "E_REQUEST",
            Self::Status { .. } => "E_STATUS",
            Self::Decode(_) => "E_DECODE",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Request(_) | Self::Status { status: 429 | 500..=599, .. })
    }
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Request(err.to_string())
        }
    }
}

impl From<serde_json::Error> for BackendError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

// =============================================================================
// APPLICATION
// =============================================================================

/// Errors surfaced to pages and the CLI.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Error {
    /// No signed-in user where one is required.
    #[error("you must be signed in")]
    Unauthenticated,

    /// Signed in, but the profile role does not allow this page.
    #[error("access denied: admin role required")]
    Forbidden,

    /// The requested record does not exist or is not visible.
    #[error("event not found")]
    NotFound,

    /// Transport failure; nothing is known about the backend state.
    #[error("network error: {0}")]
    Network(String),

    /// The backend answered with something we could not read.
    #[error("unexpected response: {0}")]
    Decode(String),

    /// The backend refused the request outright.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },

    /// The backend accepted a write that matched zero rows.
    #[error("the request was accepted but no rows were changed; check row-level policies")]
    NoRowsAffected,

    /// A delete reported success but the record is still readable.
    #[error("event {id} still exists after delete; check the delete policy")]
    DeleteNotApplied { id: EventId },

    /// Moderation tried to move an event along an edge that does not exist.
    #[error("cannot move an event from {from} to {to}")]
    InvalidTransition { from: EventStatus, to: EventStatus },

    /// The poster upload failed; no record was written.
    #[error("image upload failed: {0}")]
    Upload(String),

    /// Form input failed local validation; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Client configuration is missing or malformed.
    #[error("configuration error: {0}")]
    Config(String),
}

impl ErrorCode for Error {
    fn error_code(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "E_UNAUTHENTICATED",
            Self::Forbidden => "E_FORBIDDEN",
            Self::NotFound => "E_NOT_FOUND",
            Self::Network(_) => "E_NETWORK",
            Self::Decode(_) => "E_DECODE",
            Self::Rejected { .. } => "E_REJECTED",
            Self::NoRowsAffected => "E_NO_ROWS_AFFECTED",
            Self::DeleteNotApplied { .. } => "E_DELETE_NOT_APPLIED",
            Self::InvalidTransition { .. } => "E_INVALID_TRANSITION",
            Self::Upload(_) => "E_UPLOAD",
            Self::Validation(_) => "E_VALIDATION",
            Self::Config(_) => "E_CONFIG",
        }
    }

    fn retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }
}

impl Error {
    /// True for the two "accepted but not applied" variants that indicate a
    /// policy problem rather than a transient failure.
    #[must_use]
    pub fn is_policy_violation(&self) -> bool {
        matches!(self, Self::NoRowsAffected | Self::DeleteNotApplied { .. })
    }
}

impl From<BackendError> for Error {
    fn from(err: BackendError) -> Self {
        match err {
            BackendError::Request(msg) => Self::Network(msg),
            BackendError::Decode(msg) => Self::Decode(msg),
            BackendError::Status { status: 401, .. } => Self::Unauthenticated,
            BackendError::Status { status, message } => Self::Rejected { status, message },
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}

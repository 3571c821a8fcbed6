//! Error types for the board engine

use thiserror::Error;

/// Result type for board operations
pub type Result<T> = std::result::Result<T, BoardError>;

/// Errors that can occur in board operations.
///
/// Display strings double as the `error` field of the wire payload, so the
/// ones the client matches on verbatim keep their original casing.
#[derive(Debug, Error)]
pub enum BoardError {
    /// Caller is not authenticated
    #[error("Not authenticated")]
    Unauthenticated,

    /// Caller's access level is below the required threshold
    #[error("Access denied")]
    AccessDenied,

    /// Rejected update-status input (non-positive bug id or status code)
    #[error("Invalid bug ID or status")]
    InvalidStatusUpdate,

    /// Rejected bug id on a non-status operation
    #[error("Invalid bug ID")]
    InvalidBugId,

    /// Rejected assignee id (negative)
    #[error("Invalid assignee ID")]
    InvalidAssignee,

    /// Referenced bug does not exist
    #[error("Bug not found")]
    BugNotFound { id: i64 },

    /// Status code is not in the recognized enumeration
    #[error("Invalid status value: {code}")]
    InvalidStatus { code: i64 },

    /// Referenced user does not exist
    #[error("User not found")]
    UserNotFound { id: i64 },

    /// Referenced project does not exist
    #[error("Project not found")]
    ProjectNotFound { id: i64 },

    /// Fault inside a `TicketStore` implementation
    #[error("storage error: {message}")]
    Store { message: String },

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl BoardError {
    /// Create a storage error
    pub fn store(message: impl Into<String>) -> Self {
        Self::Store {
            message: message.into(),
        }
    }

    /// True for errors caused by the request itself rather than server state
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidStatusUpdate | Self::InvalidBugId | Self::InvalidAssignee
        )
    }
}

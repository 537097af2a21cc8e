//! Typed errors for the gift-exchange library.

use thiserror::Error;

/// Result alias for library operations.
pub type Result<T> = std::result::Result<T, SantaError>;

/// Errors surfaced by the session and the components it orchestrates.
#[derive(Debug, Error)]
pub enum SantaError {
    /// Fewer than three names; the user must add more and retry.
    #[error("need at least 3 participants, got {count}")]
    InsufficientParticipants { count: usize },

    /// The same name appears twice in a roster.
    #[error("duplicate participant name: {name}")]
    DuplicateName { name: String },

    /// Persistence failure.
    #[error("storage error: {0}")]
    Store(#[from] StoreError),

    /// Misuse of the access state machine.
    #[error("access error: {0}")]
    Access(#[from] AccessError),

    /// An operation needed a loaded event and there is none.
    #[error("no active event")]
    NoActiveEvent,

    /// An operation needed an authenticated participant and there is none.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Magic link uid/token pair did not resolve.
    #[error("invalid access token")]
    InvalidToken,

    /// Gift suggestion provider failed.
    #[error("suggestion error: {0}")]
    Suggestion(String),
}

/// Errors from the event store and its backends.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No event exists under this identifier.
    #[error("event not found: {id}")]
    NotFound { id: String },

    /// The remote backend could not be reached or answered with a failure.
    #[error("remote storage unreachable: {0}")]
    Unreachable(String),

    /// Local storage could not be read or written.
    #[error("local storage error: {0}")]
    Local(#[from] std::io::Error),

    /// A stored record is not a valid event.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StoreError {
    /// Whether a caller may reasonably retry the same operation later.
    pub fn is_retryable(&self) -> bool {
        matches!(self, StoreError::Unreachable(_))
    }
}

/// Caller errors of the per-participant access state machine.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AccessError {
    /// Setup submitted for a participant who already has a password.
    #[error("participant has already claimed their account")]
    AlreadyClaimed,

    /// Login submitted for a participant with no password yet.
    #[error("participant has not set a password yet")]
    NotClaimed,

    /// Blank password submitted.
    #[error("password must not be empty")]
    EmptyPassword,

    /// No participant with this id in the event.
    #[error("unknown participant: {id}")]
    UnknownParticipant { id: String },

    /// The participant's assignee is missing from the event.
    #[error("participant {id} has no assignee in this event")]
    MissingAssignee { id: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreachable_is_retryable() {
        assert!(StoreError::Unreachable("timeout".into()).is_retryable());
        assert!(!StoreError::NotFound { id: "x".into() }.is_retryable());
    }

    #[test]
    fn test_store_error_converts_into_santa_error() {
        let err: SantaError = StoreError::NotFound { id: "abc".into() }.into();
        assert!(matches!(err, SantaError::Store(StoreError::NotFound { .. })));
        assert_eq!(err.to_string(), "storage error: event not found: abc");
    }
}

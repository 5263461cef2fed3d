//! Caller-surfaced error values.
//!
//! Only validation failures reach callers; storage trouble, malformed blobs,
//! expired sessions, and misbehaving listeners are all recovered internally
//! (logged, degraded to empty state) so the mock backend never crashes the
//! host application.

use thiserror::Error;

/// Result type for backend operations.
pub type BackendResult<T> = Result<T, BackendError>;

/// Errors the mock backend surfaces to its callers.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// Sign-up with an email that already has an account.
    #[error("email already registered: {0}")]
    EmailAlreadyRegistered(String),

    /// Sign-in with an unknown email or a wrong password.
    #[error("invalid login credentials")]
    InvalidCredentials,

    /// An operation that requires a current session was called signed out.
    #[error("not authenticated")]
    NotAuthenticated,

    /// Insert with a record id already present in the table.
    #[error("record {id} already exists in table {table}")]
    DuplicateRecord {
        /// Table name.
        table: String,
        /// Colliding record id.
        id: String,
    },

    /// Update of a record id not present in the table.
    #[error("record {id} not found in table {table}")]
    RecordNotFound {
        /// Table name.
        table: String,
        /// Missing record id.
        id: String,
    },
}

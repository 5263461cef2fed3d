//! Error types for storage primitives.

use thiserror::Error;

/// Result type for storage operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by storage backends and wrappers.
///
/// These never cross the [`crate::StorageAdapter`] boundary -- the adapter
/// recovers every failure into a null read or a dropped write.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Errors coming from the underlying platform store.
    #[error("backend error: {0}")]
    Backend(String),

    /// Cryptographic failures in the cipher wrapper (AEAD, key init).
    #[error("crypto error: {0}")]
    Crypto(String),

    /// Text encoding/decoding failures around encrypted payloads.
    #[error("encoding error: {0}")]
    Encoding(String),
}

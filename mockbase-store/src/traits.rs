//! Platform interface for key/value persistence.

use async_trait::async_trait;

use crate::error::StoreResult;

/// String key/value store supplied by the host platform.
///
/// Implementations wrap whatever the platform offers -- a browser local
/// storage bridge, a mobile keychain, a file, or plain memory. Every call is
/// an await point; backends are free to be genuinely asynchronous.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Reads the value stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the read fails.
    async fn get(&self, key: &str) -> StoreResult<Option<String>>;

    /// Writes `value` under `key`, replacing any prior value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    async fn set(&self, key: &str, value: &str) -> StoreResult<()>;

    /// Deletes the value stored under `key`. Absent keys are not an error.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    async fn remove(&self, key: &str) -> StoreResult<()>;
}

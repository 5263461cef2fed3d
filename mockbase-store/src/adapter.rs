//! Tier-routing storage adapter.

use std::sync::Arc;

use crate::cipher::CipherStore;
use crate::traits::KeyValueStore;

/// Keys containing any of these substrings are routed to the secure tier.
const SECURE_KEY_MARKERS: [&str; 3] = ["auth", "token", "session"];

/// Storage facade the engine persists through.
///
/// Routes each key to the secure or plain tier and recovers every backend
/// failure locally: a failed read returns `None`, a failed write or delete is
/// a logged no-op. The engine must never crash the host application because
/// storage is unavailable; the cost is that callers get no signal when a
/// write is dropped. That data-loss window is accepted, not hidden -- it is
/// the documented durability contract of this adapter.
pub struct StorageAdapter {
    secure: Arc<dyn KeyValueStore>,
    plain: Arc<dyn KeyValueStore>,
}

impl std::fmt::Debug for StorageAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageAdapter").finish()
    }
}

impl StorageAdapter {
    /// Creates an adapter from explicit tier backends.
    #[must_use]
    pub fn new(plain: Arc<dyn KeyValueStore>, secure: Arc<dyn KeyValueStore>) -> Self {
        Self { secure, plain }
    }

    /// Selects tier backends once at startup from platform capabilities.
    ///
    /// A platform keystore wins when the host provides one. Otherwise the
    /// plain backend is wrapped in a [`CipherStore`] keyed from `passphrase`,
    /// so auth-sensitive values are still sealed at rest.
    #[must_use]
    pub fn select(
        plain: Arc<dyn KeyValueStore>,
        keystore: Option<Arc<dyn KeyValueStore>>,
        passphrase: &str,
    ) -> Self {
        let secure = keystore.unwrap_or_else(|| {
            log::debug!("no platform keystore; using cipher wrapper for secure tier");
            Arc::new(CipherStore::new(Arc::clone(&plain), passphrase))
        });
        Self { secure, plain }
    }

    /// Whether `key` belongs to the secure tier.
    #[must_use]
    pub fn is_secure_key(key: &str) -> bool {
        SECURE_KEY_MARKERS.iter().any(|marker| key.contains(marker))
    }

    fn tier(&self, key: &str) -> &dyn KeyValueStore {
        if Self::is_secure_key(key) {
            self.secure.as_ref()
        } else {
            self.plain.as_ref()
        }
    }

    /// Reads `key`, returning `None` on absence or on any backend failure.
    pub async fn get(&self, key: &str) -> Option<String> {
        match self.tier(key).get(key).await {
            Ok(value) => value,
            Err(err) => {
                log::warn!("storage get failed for {key}: {err}");
                None
            }
        }
    }

    /// Writes `key`; a backend failure is logged and dropped.
    pub async fn set(&self, key: &str, value: &str) {
        if let Err(err) = self.tier(key).set(key, value).await {
            log::warn!("storage set failed for {key}: {err}");
        }
    }

    /// Deletes `key`; a backend failure is logged and dropped.
    pub async fn remove(&self, key: &str) {
        if let Err(err) = self.tier(key).remove(key).await {
            log::warn!("storage remove failed for {key}: {err}");
        }
    }
}

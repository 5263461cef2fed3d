//! Shared harness for engine integration tests.
//!
//! Keeps the two memory-store tiers alive across engine instances so a test
//! can simulate a process restart: drop the backend, build a new one over the
//! same stores, and whatever was persisted is still there.

use std::sync::Arc;

use mockbase_core::{MemoryStore, MockBackend, StorageAdapter};

pub struct Harness {
    pub plain: Arc<MemoryStore>,
    pub secure: Arc<MemoryStore>,
}

impl Default for Harness {
    fn default() -> Self {
        Self::new()
    }
}

impl Harness {
    pub fn new() -> Self {
        Self {
            plain: Arc::new(MemoryStore::new()),
            secure: Arc::new(MemoryStore::new()),
        }
    }

    /// Builds a fresh engine over the shared stores. Calling this twice is a
    /// simulated restart.
    pub fn backend(&self) -> MockBackend {
        MockBackend::new(Arc::new(StorageAdapter::new(
            self.plain.clone(),
            self.secure.clone(),
        )))
    }
}

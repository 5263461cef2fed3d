//! Client-side mock of a remote auth and database backend.
//!
//! The engine lets an application run fully offline -- development, tests,
//! demos -- against believable auth and record-storage semantics. It owns a
//! session lifecycle (sign-up, sign-in, sign-out, restore-on-startup), a set
//! of named tables of keyed records, and an auth-state broadcaster, all
//! persisted as whole-snapshot JSON blobs through a
//! [`StorageAdapter`](mockbase_store::StorageAdapter).
//!
//! One [`MockBackend`] instance stands in for the remote service for the
//! lifetime of the application session. Nothing here is a security boundary:
//! tokens are opaque strings with no cryptographic strength, and "encryption"
//! is whatever the platform's secure-storage tier provides.

pub mod backend;
pub mod config;
pub mod error;
pub mod events;
pub mod identity;
pub mod logger;
pub mod persistence;
pub mod token;
pub mod types;

pub use backend::MockBackend;
pub use config::MockBackendConfig;
pub use error::{BackendError, BackendResult};
pub use events::{AuthBroadcaster, AuthChangeEvent, AuthSubscription};
pub use logger::{set_logger, LogLevel, Logger};
pub use types::{AuthResponse, Metadata, Record, Session, Tables, User, UserRecord};

pub use mockbase_store::{KeyValueStore, MemoryStore, StorageAdapter};

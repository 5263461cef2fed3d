//! Key/value storage primitives for the mockbase offline backend.
//!
//! This crate provides the persistence seam between the mock backend engine
//! and the host platform. The engine only ever talks to a [`StorageAdapter`],
//! which routes each key to one of two tiers:
//!
//! * **Secure tier** -- keys holding auth-sensitive material. Backed either by
//!   a platform keystore (supplied by the host as a [`KeyValueStore`]) or, on
//!   platforms without one, by a [`CipherStore`] that encrypts values with
//!   AES-256-GCM before handing them to the plain backend.
//! * **Plain tier** -- everything else, stored verbatim.
//!
//! Base64 text encoding is resolved at compile time:
//!
//! * With the default `native-b64` feature, encoding delegates to the
//!   [`base64`] crate.
//! * Without it, the hand-rolled codec in [`codec`] is used instead. The
//!   fallback also backstops lenient decoding of malformed input on every
//!   build.
//!
//! Consumer code uses only [`StorageAdapter`] and the [`KeyValueStore`] trait;
//! the adapter never surfaces backend I/O errors to its callers.

pub mod adapter;
pub mod cipher;
pub mod codec;
pub mod error;
mod memory;
pub mod traits;

pub use adapter::StorageAdapter;
pub use cipher::CipherStore;
pub use error::{StoreError, StoreResult};
pub use memory::MemoryStore;
pub use traits::KeyValueStore;

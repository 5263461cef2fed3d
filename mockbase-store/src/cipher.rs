//! AES-256-GCM encrypting wrapper around a plain key/value store.
//!
//! Platforms with an OS keystore hand the adapter a secure [`KeyValueStore`]
//! directly. Platforms without one wrap their plain backend in a
//! [`CipherStore`] instead: values are sealed with AES-256-GCM under a key
//! derived from a device passphrase, and stored as base64 text
//! (`nonce || ciphertext || tag`). The wrapper is transparent to callers --
//! keys pass through unencrypted, values never do.

use std::sync::Arc;

use aes_gcm::aead::Aead;
use aes_gcm::{Aes256Gcm, KeyInit, Nonce};
use async_trait::async_trait;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::codec;
use crate::error::{StoreError, StoreResult};
use crate::traits::KeyValueStore;

/// Nonce size for AES-256-GCM (12 bytes).
const NONCE_SIZE: usize = 12;
/// AES-256 key size (32 bytes).
const KEY_SIZE: usize = 32;
/// GCM tag size (16 bytes).
const TAG_SIZE: usize = 16;

/// Derived key material, zeroed on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct CipherKey([u8; KEY_SIZE]);

/// Derive a 32-byte key from a passphrase using SHA-256.
fn derive_key(passphrase: &str) -> [u8; KEY_SIZE] {
    let mut hasher = Sha256::new();
    hasher.update(passphrase.as_bytes());
    let digest = hasher.finalize();
    let mut key = [0u8; KEY_SIZE];
    key.copy_from_slice(&digest);
    key
}

/// Application-level encrypted store.
pub struct CipherStore {
    inner: Arc<dyn KeyValueStore>,
    key: CipherKey,
}

impl std::fmt::Debug for CipherStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CipherStore").finish()
    }
}

impl CipherStore {
    /// Wraps `inner`, sealing values under a key derived from `passphrase`.
    #[must_use]
    pub fn new(inner: Arc<dyn KeyValueStore>, passphrase: &str) -> Self {
        Self {
            inner,
            key: CipherKey(derive_key(passphrase)),
        }
    }

    /// Encrypts `plaintext` and returns base64 `nonce || ciphertext || tag`.
    fn seal(&self, plaintext: &str) -> StoreResult<String> {
        let cipher = Aes256Gcm::new_from_slice(&self.key.0)
            .map_err(|err| StoreError::Crypto(format!("key init failed: {err}")))?;

        let mut nonce_bytes = [0u8; NONCE_SIZE];
        OsRng.fill_bytes(&mut nonce_bytes);
        let ciphertext = cipher
            .encrypt(Nonce::from_slice(&nonce_bytes), plaintext.as_bytes())
            .map_err(|err| StoreError::Crypto(format!("encryption failed: {err}")))?;

        let mut combined = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        combined.extend_from_slice(&nonce_bytes);
        combined.extend_from_slice(&ciphertext);
        Ok(codec::encode(&combined))
    }

    /// Decrypts base64 `nonce || ciphertext || tag` back into the plaintext.
    fn open(&self, encoded: &str) -> StoreResult<String> {
        let combined = codec::decode(encoded);
        if combined.len() < NONCE_SIZE + TAG_SIZE {
            return Err(StoreError::Encoding("ciphertext too short".to_string()));
        }

        let cipher = Aes256Gcm::new_from_slice(&self.key.0)
            .map_err(|err| StoreError::Crypto(format!("key init failed: {err}")))?;
        let (nonce_bytes, ciphertext) = combined.split_at(NONCE_SIZE);
        let plaintext = cipher
            .decrypt(Nonce::from_slice(nonce_bytes), ciphertext)
            .map_err(|err| StoreError::Crypto(format!("decryption failed: {err}")))?;

        String::from_utf8(plaintext)
            .map_err(|err| StoreError::Encoding(format!("utf-8 decode failed: {err}")))
    }
}

#[async_trait]
impl KeyValueStore for CipherStore {
    async fn get(&self, key: &str) -> StoreResult<Option<String>> {
        match self.inner.get(key).await? {
            Some(sealed) => Ok(Some(self.open(&sealed)?)),
            None => Ok(None),
        }
    }

    async fn set(&self, key: &str, value: &str) -> StoreResult<()> {
        let sealed = self.seal(value)?;
        self.inner.set(key, &sealed).await
    }

    async fn remove(&self, key: &str) -> StoreResult<()> {
        self.inner.remove(key).await
    }
}

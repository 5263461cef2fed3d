//! Whole-snapshot persistence of the engine state.
//!
//! Every mutating operation on users or tables must be followed by the
//! matching persist call; the entire structure is serialized and the storage
//! key overwritten. There is no write-ahead log and no delta persistence -- a
//! crash mid-persist can lose that one write, but never leaves a
//! partially-applied blob, because each key holds one complete JSON document.
//! Load failures of any kind degrade to empty state for that key; the engine
//! then acts like a fresh install rather than crash the host.

use std::collections::BTreeMap;
use std::sync::Arc;

use mockbase_store::StorageAdapter;

use crate::token::is_session_valid;
use crate::types::{Session, Tables, UserRecord};

/// Storage key holding the serialized current session, or absent.
pub const SESSION_STORAGE_KEY: &str = "supabase.auth.token";
/// Storage key holding the serialized users table.
pub const USERS_STORAGE_KEY: &str = "mock.supabase.users";
/// Storage key holding the serialized table store.
pub const DATABASE_STORAGE_KEY: &str = "mock.supabase.database";

/// In-memory users table: email -> credential row.
pub type Users = BTreeMap<String, UserRecord>;

/// State reconstituted from storage at startup.
#[derive(Debug, Default)]
pub(crate) struct LoadedState {
    pub session: Option<Session>,
    pub users: Users,
    pub tables: Tables,
}

/// Reads and writes the persisted engine state.
#[derive(Debug)]
pub(crate) struct PersistenceManager {
    storage: Arc<StorageAdapter>,
}

impl PersistenceManager {
    pub fn new(storage: Arc<StorageAdapter>) -> Self {
        Self { storage }
    }

    /// Reconstitutes the full engine state. Runs once per engine instance
    /// (the caller guards re-entry); every step is failure-isolated so a bad
    /// blob in one key cannot block the others.
    pub async fn load(&self) -> LoadedState {
        LoadedState {
            session: self.load_session().await,
            users: self.load_users().await,
            tables: self.load_tables().await,
        }
    }

    /// Loads the stored session, clearing it from storage when expired.
    ///
    /// A session persisted as valid must never silently linger past its
    /// expiry into the next cold start.
    async fn load_session(&self) -> Option<Session> {
        let raw = self.storage.get(SESSION_STORAGE_KEY).await?;
        match serde_json::from_str::<Session>(&raw) {
            Ok(session) if is_session_valid(Some(&session)) => Some(session),
            Ok(_) => {
                log::debug!("stored session expired; clearing");
                self.storage.remove(SESSION_STORAGE_KEY).await;
                None
            }
            Err(err) => {
                log::error!("malformed stored session discarded: {err}");
                None
            }
        }
    }

    async fn load_users(&self) -> Users {
        let Some(raw) = self.storage.get(USERS_STORAGE_KEY).await else {
            return Users::new();
        };
        match serde_json::from_str::<Vec<(String, UserRecord)>>(&raw) {
            Ok(pairs) => pairs.into_iter().collect(),
            Err(err) => {
                log::error!("malformed users table discarded: {err}");
                Users::new()
            }
        }
    }

    async fn load_tables(&self) -> Tables {
        let Some(raw) = self.storage.get(DATABASE_STORAGE_KEY).await else {
            return Tables::new();
        };
        match serde_json::from_str::<Tables>(&raw) {
            Ok(tables) => tables,
            Err(err) => {
                log::error!("malformed table store discarded: {err}");
                Tables::new()
            }
        }
    }

    /// Overwrites the users key with the full current table.
    pub async fn persist_users(&self, users: &Users) {
        let pairs: Vec<(&String, &UserRecord)> = users.iter().collect();
        match serde_json::to_string(&pairs) {
            Ok(blob) => self.storage.set(USERS_STORAGE_KEY, &blob).await,
            Err(err) => log::error!("users serialization failed: {err}"),
        }
    }

    /// Overwrites the database key with the full table store.
    pub async fn persist_database(&self, tables: &Tables) {
        match serde_json::to_string(tables) {
            Ok(blob) => self.storage.set(DATABASE_STORAGE_KEY, &blob).await,
            Err(err) => log::error!("table store serialization failed: {err}"),
        }
    }

    /// Overwrites the session key.
    pub async fn persist_session(&self, session: &Session) {
        match serde_json::to_string(session) {
            Ok(blob) => self.storage.set(SESSION_STORAGE_KEY, &blob).await,
            Err(err) => log::error!("session serialization failed: {err}"),
        }
    }

    /// Deletes the session key.
    pub async fn clear_session(&self) {
        self.storage.remove(SESSION_STORAGE_KEY).await;
    }
}

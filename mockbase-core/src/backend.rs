//! The mock backend service.
//!
//! One [`MockBackend`] instance owns the full engine state -- current
//! session, users table, table store -- behind a single mutex, so every
//! operation reads, mutates, and persists one consistent snapshot. State is
//! reconstituted from storage exactly once, on first use; a valid persisted
//! session re-enters the signed-in state without any sign-in call.

use std::sync::Arc;

use tokio::sync::{Mutex, OnceCell};

use mockbase_store::StorageAdapter;

use crate::config::MockBackendConfig;
use crate::error::{BackendError, BackendResult};
use crate::events::{AuthBroadcaster, AuthChangeEvent, AuthSubscription};
use crate::identity::{create_mock_session, create_mock_user};
use crate::persistence::{PersistenceManager, Users};
use crate::token::generate_token;
use crate::types::{AuthResponse, Metadata, Record, Session, Tables, User, UserRecord};

#[derive(Debug, Default)]
struct EngineState {
    session: Option<Session>,
    users: Users,
    tables: Tables,
}

/// Client-side stand-in for the remote auth and database service.
pub struct MockBackend {
    config: MockBackendConfig,
    persistence: PersistenceManager,
    state: Mutex<EngineState>,
    loaded: OnceCell<()>,
    broadcaster: AuthBroadcaster,
}

impl std::fmt::Debug for MockBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockBackend").finish()
    }
}

impl MockBackend {
    /// Creates an engine over `storage` with default configuration.
    #[must_use]
    pub fn new(storage: Arc<StorageAdapter>) -> Self {
        Self::with_config(storage, MockBackendConfig::default())
    }

    /// Creates an engine over `storage` with explicit configuration.
    #[must_use]
    pub fn with_config(storage: Arc<StorageAdapter>, config: MockBackendConfig) -> Self {
        Self {
            config,
            persistence: PersistenceManager::new(storage),
            state: Mutex::new(EngineState::default()),
            loaded: OnceCell::new(),
            broadcaster: AuthBroadcaster::new(),
        }
    }

    /// Loads persisted state on first call; later calls are no-ops and
    /// concurrent first calls await the same load.
    async fn ensure_loaded(&self) {
        self.loaded
            .get_or_init(|| async {
                let loaded = self.persistence.load().await;
                let mut state = self.state.lock().await;
                state.session = loaded.session;
                state.users = loaded.users;
                state.tables = loaded.tables;
            })
            .await;
    }

    /// Registers a new account and signs it in.
    ///
    /// # Errors
    ///
    /// [`BackendError::EmailAlreadyRegistered`] when an account with `email`
    /// exists.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &str,
        metadata: Option<Metadata>,
    ) -> BackendResult<AuthResponse> {
        self.ensure_loaded().await;
        let session = {
            let mut state = self.state.lock().await;
            if state.users.contains_key(email) {
                return Err(BackendError::EmailAlreadyRegistered(email.to_string()));
            }

            let user = create_mock_user(email, metadata, &self.config);
            state.users.insert(
                email.to_string(),
                UserRecord {
                    email: email.to_string(),
                    password: password.to_string(),
                    user: user.clone(),
                },
            );
            let session = create_mock_session(user, &self.config);
            state.session = Some(session.clone());

            self.persistence.persist_users(&state.users).await;
            self.persistence.persist_session(&session).await;
            session
        };

        self.broadcaster
            .notify(AuthChangeEvent::SignedIn, Some(&session));
        Ok(AuthResponse {
            user: session.user.clone(),
            session,
        })
    }

    /// Signs an existing account in, replacing any current session.
    ///
    /// # Errors
    ///
    /// [`BackendError::InvalidCredentials`] on an unknown email or a wrong
    /// password; which of the two is not disclosed.
    pub async fn sign_in(&self, email: &str, password: &str) -> BackendResult<AuthResponse> {
        self.ensure_loaded().await;
        let session = {
            let mut state = self.state.lock().await;
            let record = state
                .users
                .get(email)
                .ok_or(BackendError::InvalidCredentials)?;
            if record.password != password {
                return Err(BackendError::InvalidCredentials);
            }

            let session = create_mock_session(record.user.clone(), &self.config);
            state.session = Some(session.clone());
            self.persistence.persist_session(&session).await;
            session
        };

        self.broadcaster
            .notify(AuthChangeEvent::SignedIn, Some(&session));
        Ok(AuthResponse {
            user: session.user.clone(),
            session,
        })
    }

    /// Invalidates the current session. Signed-out callers get `Ok` too.
    ///
    /// # Errors
    ///
    /// Currently infallible; the `Result` mirrors the service interface.
    pub async fn sign_out(&self) -> BackendResult<()> {
        self.ensure_loaded().await;
        let had_session = {
            let mut state = self.state.lock().await;
            if state.session.take().is_some() {
                self.persistence.clear_session().await;
                true
            } else {
                false
            }
        };
        if had_session {
            self.broadcaster.notify(AuthChangeEvent::SignedOut, None);
        }
        Ok(())
    }

    /// Issues a fresh token pair and expiry for the current session.
    ///
    /// # Errors
    ///
    /// [`BackendError::NotAuthenticated`] when signed out.
    pub async fn refresh_session(&self) -> BackendResult<Session> {
        self.ensure_loaded().await;
        let session = {
            let mut state = self.state.lock().await;
            let session = state
                .session
                .as_mut()
                .ok_or(BackendError::NotAuthenticated)?;
            session.access_token = generate_token(&self.config.access_token_prefix);
            session.refresh_token = generate_token(&self.config.refresh_token_prefix);
            session.expires_in = self.config.session_ttl_seconds;
            session.expires_at =
                Some(chrono::Utc::now().timestamp() + self.config.session_ttl_seconds);
            let session = session.clone();
            self.persistence.persist_session(&session).await;
            session
        };

        self.broadcaster
            .notify(AuthChangeEvent::TokenRefreshed, Some(&session));
        Ok(session)
    }

    /// Patches the signed-in user's metadata, caller's fields winning.
    ///
    /// The live user record and the current session's embedded snapshot are
    /// both updated; snapshots inside previously issued sessions are not.
    ///
    /// # Errors
    ///
    /// [`BackendError::NotAuthenticated`] when signed out.
    pub async fn update_user(&self, metadata: Metadata) -> BackendResult<User> {
        self.ensure_loaded().await;
        let (user, session) = {
            let mut state = self.state.lock().await;
            let email = state
                .session
                .as_ref()
                .map(|session| session.user.email.clone())
                .ok_or(BackendError::NotAuthenticated)?;
            let record = state
                .users
                .get_mut(&email)
                .ok_or(BackendError::NotAuthenticated)?;
            for (key, value) in metadata {
                record.user.user_metadata.insert(key, value);
            }
            let user = record.user.clone();

            let session = state
                .session
                .as_mut()
                .ok_or(BackendError::NotAuthenticated)?;
            session.user = user.clone();
            let session = session.clone();

            self.persistence.persist_users(&state.users).await;
            self.persistence.persist_session(&session).await;
            (user, session)
        };

        self.broadcaster
            .notify(AuthChangeEvent::UserUpdated, Some(&session));
        Ok(user)
    }

    /// Returns the current session, if any.
    pub async fn current_session(&self) -> Option<Session> {
        self.ensure_loaded().await;
        self.state.lock().await.session.clone()
    }

    /// Returns the signed-in user, if any.
    pub async fn current_user(&self) -> Option<User> {
        self.ensure_loaded().await;
        self.state
            .lock()
            .await
            .session
            .as_ref()
            .map(|session| session.user.clone())
    }

    /// Registers an auth-state listener; the handle unsubscribes it.
    pub fn on_auth_state_change<F>(&self, listener: F) -> AuthSubscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        self.broadcaster.subscribe(listener)
    }

    /// Inserts a new record, creating the table on first write.
    ///
    /// # Errors
    ///
    /// [`BackendError::DuplicateRecord`] when `id` is already present.
    pub async fn insert_record(
        &self,
        table: &str,
        id: &str,
        record: Record,
    ) -> BackendResult<Record> {
        self.ensure_loaded().await;
        let mut state = self.state.lock().await;
        let rows = state.tables.entry(table.to_string()).or_default();
        if rows.contains_key(id) {
            return Err(BackendError::DuplicateRecord {
                table: table.to_string(),
                id: id.to_string(),
            });
        }
        rows.insert(id.to_string(), record.clone());
        self.persistence.persist_database(&state.tables).await;
        Ok(record)
    }

    /// Replaces an existing record.
    ///
    /// # Errors
    ///
    /// [`BackendError::RecordNotFound`] when `id` is absent.
    pub async fn update_record(
        &self,
        table: &str,
        id: &str,
        record: Record,
    ) -> BackendResult<Record> {
        self.ensure_loaded().await;
        let mut state = self.state.lock().await;
        let slot = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.get_mut(id))
            .ok_or_else(|| BackendError::RecordNotFound {
                table: table.to_string(),
                id: id.to_string(),
            })?;
        *slot = record.clone();
        self.persistence.persist_database(&state.tables).await;
        Ok(record)
    }

    /// Inserts or replaces a record; repeating the call is idempotent.
    pub async fn upsert_record(&self, table: &str, id: &str, record: Record) -> Record {
        self.ensure_loaded().await;
        let mut state = self.state.lock().await;
        state
            .tables
            .entry(table.to_string())
            .or_default()
            .insert(id.to_string(), record.clone());
        self.persistence.persist_database(&state.tables).await;
        record
    }

    /// Returns the record under `table`/`id`, if present.
    pub async fn get_record(&self, table: &str, id: &str) -> Option<Record> {
        self.ensure_loaded().await;
        self.state
            .lock()
            .await
            .tables
            .get(table)
            .and_then(|rows| rows.get(id))
            .cloned()
    }

    /// Returns all records of `table`; an unknown table is empty, not an
    /// error.
    pub async fn list_records(&self, table: &str) -> Vec<Record> {
        self.ensure_loaded().await;
        self.state
            .lock()
            .await
            .tables
            .get(table)
            .map(|rows| rows.values().cloned().collect())
            .unwrap_or_default()
    }

    /// Deletes the record under `table`/`id`. Deleting an absent record is a
    /// no-op.
    pub async fn delete_record(&self, table: &str, id: &str) {
        self.ensure_loaded().await;
        let mut state = self.state.lock().await;
        let removed = state
            .tables
            .get_mut(table)
            .and_then(|rows| rows.remove(id))
            .is_some();
        if removed {
            self.persistence.persist_database(&state.tables).await;
        }
    }
}

//! Auth-state change broadcasting.

use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, Weak};

use crate::types::Session;

/// Auth lifecycle events delivered to subscribers.
///
/// The wire names (`SIGNED_IN`, ...) are an external contract with UI
/// subscribers and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum AuthChangeEvent {
    /// A session was issued by sign-up or sign-in.
    SignedIn,
    /// The current session was invalidated.
    SignedOut,
    /// The current session received a fresh token pair.
    TokenRefreshed,
    /// The signed-in user's profile metadata changed.
    UserUpdated,
}

type Listener = Arc<dyn Fn(AuthChangeEvent, Option<&Session>) + Send + Sync>;
type Registry = Mutex<Vec<(u64, Listener)>>;

/// Ordered registry of auth-state listeners.
///
/// Listeners are invoked in registration order. A panicking listener is
/// caught and logged so it cannot block delivery to the rest. There is no
/// uniqueness constraint -- the same closure may be registered twice and will
/// then be invoked twice.
pub struct AuthBroadcaster {
    listeners: Arc<Registry>,
    next_id: AtomicU64,
}

impl std::fmt::Debug for AuthBroadcaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthBroadcaster").finish()
    }
}

impl Default for AuthBroadcaster {
    fn default() -> Self {
        Self::new()
    }
}

/// Handle returned by [`AuthBroadcaster::subscribe`].
///
/// Call [`unsubscribe`](Self::unsubscribe) to stop delivery. Dropping the
/// handle without unsubscribing leaves the listener registered for the
/// lifetime of the broadcaster -- the accepted leak model for this surface.
#[derive(Debug)]
pub struct AuthSubscription {
    id: u64,
    registry: Weak<Registry>,
}

impl AuthSubscription {
    /// Removes the listener this handle was returned for.
    pub fn unsubscribe(self) {
        if let Some(registry) = self.registry.upgrade() {
            if let Ok(mut listeners) = registry.lock() {
                listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}

impl AuthBroadcaster {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Arc::new(Mutex::new(Vec::new())),
            next_id: AtomicU64::new(0),
        }
    }

    /// Registers `listener` and returns its unsubscribe handle.
    pub fn subscribe<F>(&self, listener: F) -> AuthSubscription
    where
        F: Fn(AuthChangeEvent, Option<&Session>) + Send + Sync + 'static,
    {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        if let Ok(mut listeners) = self.listeners.lock() {
            listeners.push((id, Arc::new(listener)));
        }
        AuthSubscription {
            id,
            registry: Arc::downgrade(&self.listeners),
        }
    }

    /// Delivers `event` to every registered listener.
    ///
    /// The listener list is snapshotted before delivery, so listeners may
    /// subscribe or unsubscribe re-entrantly without deadlocking.
    pub fn notify(&self, event: AuthChangeEvent, session: Option<&Session>) {
        let snapshot: Vec<Listener> = match self.listeners.lock() {
            Ok(listeners) => listeners
                .iter()
                .map(|(_, listener)| Arc::clone(listener))
                .collect(),
            Err(_) => return,
        };
        for listener in snapshot {
            if catch_unwind(AssertUnwindSafe(|| listener(event, session))).is_err() {
                log::error!("auth listener panicked during {event}; continuing");
            }
        }
    }
}

// src/state.rs

use std::sync::{
    Arc, Mutex,
    atomic::{AtomicU64, Ordering},
};

use axum::extract::FromRef;

use crate::{analytics::Dashboard, backend::Backend, config::Config, session::SessionManager};

#[derive(Clone)]
pub struct AppState {
    pub backend: Arc<dyn Backend>,
    pub session: Arc<SessionManager>,
    pub config: Config,
    pub dashboard: Arc<LatestSlot<Dashboard>>,
}

impl FromRef<AppState> for Arc<dyn Backend> {
    fn from_ref(state: &AppState) -> Self {
        state.backend.clone()
    }
}

impl FromRef<AppState> for Arc<SessionManager> {
    fn from_ref(state: &AppState) -> Self {
        state.session.clone()
    }
}

impl FromRef<AppState> for Config {
    fn from_ref(state: &AppState) -> Self {
        state.config.clone()
    }
}

impl FromRef<AppState> for Arc<LatestSlot<Dashboard>> {
    fn from_ref(state: &AppState) -> Self {
        state.dashboard.clone()
    }
}

/// Generation ticket handed out by `LatestSlot::begin`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Ticket(u64);

/// Holds the result of the most recently *started* computation.
///
/// Each request takes a ticket before it starts fetching. A result is only
/// published if no newer ticket has been issued since, so a slow, superseded
/// request cannot overwrite a newer one.
pub struct LatestSlot<T> {
    generation: AtomicU64,
    value: Mutex<Option<T>>,
}

impl<T: Clone> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            generation: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    pub fn begin(&self) -> Ticket {
        Ticket(self.generation.fetch_add(1, Ordering::SeqCst) + 1)
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        self.generation.load(Ordering::SeqCst) == ticket.0
    }

    /// Stores `value` if `ticket` is still the newest. Returns whether it was stored.
    pub fn publish(&self, ticket: Ticket, value: T) -> bool {
        let Ok(mut slot) = self.value.lock() else {
            return false;
        };
        // Checked under the lock so two publishers cannot interleave.
        if !self.is_current(ticket) {
            return false;
        }
        *slot = Some(value);
        true
    }

    /// Drops the stored value and invalidates every ticket issued so far.
    pub fn clear(&self) {
        let Ok(mut slot) = self.value.lock() else {
            return;
        };
        self.generation.fetch_add(1, Ordering::SeqCst);
        *slot = None;
    }

    pub fn get(&self) -> Option<T> {
        self.value.lock().ok().and_then(|v| v.clone())
    }
}

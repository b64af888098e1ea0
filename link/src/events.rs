//! Session lifecycle events.
//!
//! The session manager broadcasts a [`SessionEvent`] to every registered
//! listener after any operation that changes the login state (login, logout,
//! a refresh that tore the session down, or a store reload that observed a
//! change made by another process). The event carries the new state, so
//! listeners do not need to query the session again.
//!
//! # Example
//!
//! ```rust
//! use diasys_link::events::{SessionEvent, SessionEventHandlers};
//!
//! let handlers = SessionEventHandlers::new()
//!     .on_auth_changed(|event| {
//!         let SessionEvent::AuthChanged(state) = event;
//!         println!("session is now {}", state);
//!     });
//! assert_eq!(handlers.len(), 1);
//! ```

use std::fmt;
use std::sync::Arc;

use crate::models::SessionState;

/// Event delivered to session listeners.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// The login state changed; carries the state after the change.
    AuthChanged(SessionState),
}

impl SessionEvent {
    /// State carried by the event
    pub fn state(&self) -> &SessionState {
        match self {
            Self::AuthChanged(state) => state,
        }
    }
}

impl fmt::Display for SessionEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AuthChanged(state) => write!(f, "auth changed: {}", state),
        }
    }
}

/// Type alias for a session event listener.
pub type OnSessionEventCallback = Arc<dyn Fn(&SessionEvent) + Send + Sync>;

/// Registered session event listeners.
///
/// Any number of listeners may be registered; each receives every event in
/// registration order. Listeners are `Send + Sync` so they can be shared with
/// the tokio runtime.
#[derive(Clone, Default)]
pub struct SessionEventHandlers {
    listeners: Vec<OnSessionEventCallback>,
}

impl fmt::Debug for SessionEventHandlers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionEventHandlers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl SessionEventHandlers {
    /// Create an empty set of handlers
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for auth state changes.
    pub fn on_auth_changed(mut self, f: impl Fn(&SessionEvent) + Send + Sync + 'static) -> Self {
        self.listeners.push(Arc::new(f));
        self
    }

    pub(crate) fn push(&mut self, f: OnSessionEventCallback) {
        self.listeners.push(f);
    }

    /// Number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// Returns `true` if no listener is registered
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }

    /// Deliver an event to every listener
    pub(crate) fn emit(&self, event: &SessionEvent) {
        for listener in &self.listeners {
            listener(event);
        }
    }
}

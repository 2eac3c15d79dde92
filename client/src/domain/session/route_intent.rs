//! Declarative navigation intents.
//!
//! The session layer never navigates by itself. It publishes the route it
//! wants, and the embedding shell watches the channel and performs the
//! actual transition. Only the most recent intent matters, so the channel
//! deliberately coalesces.

use tokio::sync::watch;

/// Why a navigation was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteReason {
    /// The session expired or was rejected; sign in again.
    LoginRequired,
    /// A login just succeeded.
    LoginSucceeded,
    /// The user signed out.
    LoggedOut,
}

/// A desired route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteIntent {
    /// Route the shell should present.
    pub target: String,
    /// Why the navigation is wanted.
    pub reason: RouteReason,
}

/// Watch-backed publisher of the latest navigation intent.
#[derive(Debug)]
pub struct RouteIntents {
    tx: watch::Sender<Option<RouteIntent>>,
}

impl Default for RouteIntents {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteIntents {
    /// Create an idle publisher with no pending intent.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self { tx }
    }

    /// Publish a desired route, replacing any unacknowledged one.
    pub fn request(&self, target: impl Into<String>, reason: RouteReason) {
        self.tx.send_replace(Some(RouteIntent {
            target: target.into(),
            reason,
        }));
    }

    /// Subscribe to intent changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<RouteIntent>> {
        self.tx.subscribe()
    }

    /// Latest unacknowledged intent, if any.
    #[must_use]
    pub fn latest(&self) -> Option<RouteIntent> {
        self.tx.borrow().clone()
    }

    /// Acknowledge the current intent after navigating.
    pub fn acknowledge(&self) {
        self.tx.send_replace(None);
    }
}

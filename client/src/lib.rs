//! Marketplace client core: session lifecycle, resource synchronisation,
//! and the HTTP/storage adapters they drive.
//!
//! The crate is laid out hexagonally. `domain` holds the session state
//! machine, the per-resource synchronisers, and the ports they depend on;
//! `outbound` holds the reqwest gateway and the identity store adapters;
//! `config` resolves the environment-dependent settings both need.

pub mod config;
pub mod domain;
pub mod outbound;

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;

/// Route intents surfaced to the embedding shell.
pub use domain::session::{RouteIntent, RouteIntents, RouteReason};

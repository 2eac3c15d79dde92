//! Port for the persistent client store.

use serde_json::Value;

use super::define_port_error;
use crate::domain::identity::StorageKey;

define_port_error! {
    /// Errors surfaced by [`IdentityStore`] implementations.
    pub enum IdentityStoreError {
        /// The backing medium failed (I/O, lock poisoning).
        Backend { message: String } => "client store backend failed: {message}",
        /// A record could not be encoded for persistence.
        Serialize { message: String } => "record serialisation failed: {message}",
    }
}

/// Port abstraction over the persistent client store.
///
/// Semantics mirror a browser origin store: string-keyed JSON records,
/// whole-record last-writer-wins replacement, no cross-record transactions.
/// A record that no longer parses is treated as absent, and implementations
/// drop the corrupt entry so later reads stay clean.
#[cfg_attr(test, mockall::automock)]
pub trait IdentityStore: Send + Sync {
    /// Persist `value` under `key`, replacing any previous record whole.
    fn save(&self, key: StorageKey, value: &Value) -> Result<(), IdentityStoreError>;

    /// Load the record under `key`. Absent and malformed records yield
    /// `Ok(None)`.
    fn load(&self, key: StorageKey) -> Result<Option<Value>, IdentityStoreError>;

    /// Remove the record under `key`. Removing an absent record succeeds.
    fn remove(&self, key: StorageKey) -> Result<(), IdentityStoreError>;
}

/// Fixture store that persists nothing and never holds a record.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureIdentityStore;

impl IdentityStore for FixtureIdentityStore {
    fn save(&self, _key: StorageKey, _value: &Value) -> Result<(), IdentityStoreError> {
        Ok(())
    }

    fn load(&self, _key: StorageKey) -> Result<Option<Value>, IdentityStoreError> {
        Ok(None)
    }

    fn remove(&self, _key: StorageKey) -> Result<(), IdentityStoreError> {
        Ok(())
    }
}

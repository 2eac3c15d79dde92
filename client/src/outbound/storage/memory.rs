//! In-memory identity store for tests and ephemeral sessions.

use std::collections::BTreeMap;
use std::sync::Mutex;

use serde_json::Value;

use crate::domain::identity::StorageKey;
use crate::domain::ports::{IdentityStore, IdentityStoreError};

/// Identity store backed by a process-local map.
///
/// Nothing survives the process; useful in tests and for callers that
/// explicitly opt out of persistence.
#[derive(Debug, Default)]
pub struct MemoryIdentityStore {
    records: Mutex<BTreeMap<StorageKey, Value>>,
}

impl MemoryIdentityStore {
    fn records(&self) -> Result<std::sync::MutexGuard<'_, BTreeMap<StorageKey, Value>>, IdentityStoreError> {
        self.records
            .lock()
            .map_err(|_| IdentityStoreError::backend("store mutex poisoned"))
    }
}

impl IdentityStore for MemoryIdentityStore {
    fn save(&self, key: StorageKey, value: &Value) -> Result<(), IdentityStoreError> {
        self.records()?.insert(key, value.clone());
        Ok(())
    }

    fn load(&self, key: StorageKey) -> Result<Option<Value>, IdentityStoreError> {
        Ok(self.records()?.get(&key).cloned())
    }

    fn remove(&self, key: StorageKey) -> Result<(), IdentityStoreError> {
        self.records()?.remove(&key);
        Ok(())
    }
}

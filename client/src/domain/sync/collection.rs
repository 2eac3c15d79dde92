//! Shared collection state for the resource synchronisers.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tokio::sync::{Mutex, MutexGuard};

use crate::domain::envelope;
use crate::domain::ports::ApiError;

/// Snapshot of one synchronised collection.
#[derive(Debug, Clone, PartialEq)]
pub struct SyncedCollection<T> {
    /// Current items, optimistic mutations included.
    pub items: Vec<T>,
    /// Server message recorded when the last load was declined.
    pub load_error: Option<String>,
}

impl<T> Default for SyncedCollection<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            load_error: None,
        }
    }
}

impl<T> SyncedCollection<T> {
    /// Collection holding `items` with no recorded failure.
    #[must_use]
    pub fn loaded(items: Vec<T>) -> Self {
        Self {
            items,
            load_error: None,
        }
    }

    /// True when the last load was declined by the server.
    #[must_use]
    pub fn is_errored(&self) -> bool {
        self.load_error.is_some()
    }

    /// Number of items currently held.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// True when no items are held.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Concurrency core shared by the entity synchronisers.
///
/// Three rules, enforced here once:
/// - loads carry an epoch, so a reply landing after a newer load began is
///   discarded instead of clobbering fresher state;
/// - mutations serialise on one lock held across their server round trip,
///   and loads take the same lock for their fetch, so a list snapshot the
///   server produced before confirming a mutation can never commit over
///   the confirmed state;
/// - state is reachable only through snapshots, never by reference.
#[derive(Debug)]
pub(crate) struct SyncCore<T> {
    state: Mutex<SyncedCollection<T>>,
    mutations: Mutex<()>,
    epoch: AtomicU64,
}

impl<T: Clone> SyncCore<T> {
    pub(crate) fn new() -> Self {
        Self {
            state: Mutex::new(SyncedCollection::default()),
            mutations: Mutex::new(()),
            epoch: AtomicU64::new(0),
        }
    }

    /// Snapshot of the current collection.
    pub(crate) async fn snapshot(&self) -> SyncedCollection<T> {
        self.state.lock().await.clone()
    }

    /// Run `mutate` under the state lock, returning its result.
    pub(crate) async fn update<R>(
        &self,
        mutate: impl FnOnce(&mut SyncedCollection<T>) -> R,
    ) -> R {
        let mut state = self.state.lock().await;
        mutate(&mut state)
    }

    /// Hold the mutation lock for the duration of one mutation round trip.
    pub(crate) async fn lock_mutations(&self) -> MutexGuard<'_, ()> {
        self.mutations.lock().await
    }

    /// Begin a load, superseding any in-flight one.
    pub(crate) fn begin_load(&self) -> u64 {
        self.epoch.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Begin a load that excludes in-flight mutations.
    ///
    /// The epoch is taken before queueing on the lock, so a newer load
    /// still supersedes one that is waiting; the returned guard must be
    /// held until the load commits.
    pub(crate) async fn begin_exclusive_load(&self) -> (u64, MutexGuard<'_, ()>) {
        let epoch = self.begin_load();
        let guard = self.mutations.lock().await;
        (epoch, guard)
    }

    /// Commit a finished load unless a newer one began meanwhile.
    pub(crate) async fn commit_load(
        &self,
        epoch: u64,
        items: Vec<T>,
        load_error: Option<String>,
    ) -> bool {
        if self.epoch.load(Ordering::SeqCst) != epoch {
            return false;
        }
        let mut state = self.state.lock().await;
        state.items = items;
        state.load_error = load_error;
        true
    }
}

impl<T: Clone + DeserializeOwned> SyncCore<T> {
    /// Decode a list reply and commit it against `epoch`.
    ///
    /// A declined envelope records the server message on the collection
    /// instead of failing the load; only transport and decoding failures
    /// surface as errors.
    pub(crate) async fn complete_load(
        &self,
        epoch: u64,
        reply: Value,
        resource: &'static str,
    ) -> Result<SyncedCollection<T>, ApiError> {
        let (items, load_error) = envelope::decode_list(reply)?;
        if let Some(message) = &load_error {
            tracing::warn!("{resource} list declined by server: {message}");
        }
        if !self.commit_load(epoch, items, load_error).await {
            tracing::debug!("{resource} list reply discarded: superseded by a newer load");
        }
        Ok(self.snapshot().await)
    }
}

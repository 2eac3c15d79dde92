//! Optimistic command helper: snapshot, apply, confirm or revert.

use std::future::Future;

use super::collection::{SyncCore, SyncedCollection};
use crate::domain::ports::ApiError;

/// Run one optimistic mutation against `core`.
///
/// Under the mutation lock: snapshot the items, let `decide` mutate the
/// collection and return whatever the confirmation needs, then await
/// `confirm`. A confirmation failure restores the snapshot and hands the
/// error back for presentation.
///
/// Because the lock is held across the round trip, rapid repeated
/// mutations serialise: each `decide` observes the state the previous
/// confirmation left behind, and the final state is the last confirmed one.
pub(crate) async fn run<T, D, R, Fut>(
    core: &SyncCore<T>,
    decide: impl FnOnce(&mut SyncedCollection<T>) -> D,
    confirm: impl FnOnce(D) -> Fut,
) -> Result<R, ApiError>
where
    T: Clone,
    Fut: Future<Output = Result<R, ApiError>>,
{
    let _serialised = core.lock_mutations().await;
    let (snapshot, decision) = core
        .update(|state| {
            let snapshot = state.items.clone();
            let decision = decide(state);
            (snapshot, decision)
        })
        .await;

    match confirm(decision).await {
        Ok(result) => Ok(result),
        Err(error) => {
            core.update(|state| state.items = snapshot).await;
            Err(error)
        }
    }
}

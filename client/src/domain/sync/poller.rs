//! Interval polling scoped to a surface's lifetime.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;

/// Interval between background unread-notification refreshes.
pub const UNREAD_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Sleep abstraction so polling tests drive time explicitly.
#[async_trait]
pub trait Sleeper: Send + Sync {
    /// Sleep for `duration`.
    async fn sleep(&self, duration: Duration);
}

/// Production sleeper backed by the tokio timer.
#[derive(Debug, Default, Clone, Copy)]
pub struct TokioSleeper;

#[async_trait]
impl Sleeper for TokioSleeper {
    async fn sleep(&self, duration: Duration) {
        tokio::time::sleep(duration).await;
    }
}

/// Owner handle for a polling loop.
///
/// Dropping the handle cancels the loop, which is what ties the poll to
/// the lifetime of the surface that spawned it.
#[derive(Debug)]
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    /// True until the loop ends or is cancelled.
    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Spawn a loop running `tick` after every `interval`, until the returned
/// handle drops.
///
/// The loop sleeps first: callers load eagerly on mount, so an immediate
/// tick would duplicate that request.
pub(crate) fn spawn_interval<F, Fut>(
    sleeper: Arc<dyn Sleeper>,
    interval: Duration,
    tick: F,
) -> PollerHandle
where
    F: Fn() -> Fut + Send + 'static,
    Fut: Future<Output = ()> + Send,
{
    let task = tokio::spawn(async move {
        loop {
            sleeper.sleep(interval).await;
            tick().await;
        }
    });
    PollerHandle { task }
}

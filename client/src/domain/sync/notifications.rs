//! Notification synchronisation with optimistic read receipts.

use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tokio::sync::watch;

use super::collection::{SyncCore, SyncedCollection};
use super::optimistic;
use super::poller::{PollerHandle, Sleeper, spawn_interval};
use crate::domain::envelope::ApiEnvelope;
use crate::domain::identity::Role;
use crate::domain::ports::{ApiError, ApiGateway};

/// One notification as delivered to a signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationItem {
    pub id: i64,
    /// Server-side category, absent on older notifications.
    #[serde(default, rename = "type")]
    pub kind: Option<String>,
    pub message: String,
    /// Read receipt; unread until marked.
    #[serde(default)]
    pub lue: bool,
    #[serde(default)]
    pub date_creation: Option<String>,
}

/// Synchroniser for a user's notification feed.
///
/// The unread count is published through a watch channel so badge widgets
/// observe it without polling the collection themselves.
pub struct NotificationsSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<NotificationItem>,
    unread: watch::Sender<usize>,
}

impl NotificationsSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
            unread: watch::Sender::new(0),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<NotificationItem> {
        self.core.snapshot().await
    }

    /// Current unread count.
    #[must_use]
    pub fn unread(&self) -> usize {
        *self.unread.borrow()
    }

    /// Watch the unread count.
    #[must_use]
    pub fn unread_counts(&self) -> watch::Receiver<usize> {
        self.unread.subscribe()
    }

    async fn publish_unread(&self) {
        let snapshot = self.core.snapshot().await;
        let count = snapshot.items.iter().filter(|item| !item.lue).count();
        self.unread.send_replace(count);
    }

    /// Reload the feed for `user_id` acting as `user_type`.
    pub async fn load(
        &self,
        user_id: &str,
        user_type: Role,
    ) -> Result<SyncedCollection<NotificationItem>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!(
                "/api/notifications?user_id={user_id}&user_type={user_type}"
            ))
            .await?;
        let snapshot = self.core.complete_load(epoch, reply, "notifications").await?;
        self.publish_unread().await;
        Ok(snapshot)
    }

    /// Mark one notification read, returning whether the server was told.
    ///
    /// Unknown or already-read ids resolve locally without a request. The
    /// receipt flips optimistically and rolls back if the server declines.
    pub async fn mark_read(&self, id: i64) -> Result<bool, ApiError> {
        let gateway = Arc::clone(&self.gateway);
        let result = optimistic::run(
            &self.core,
            |state| {
                let mut flipped = false;
                for item in &mut state.items {
                    if item.id == id && !item.lue {
                        item.lue = true;
                        flipped = true;
                    }
                }
                flipped
            },
            |flipped| async move {
                if !flipped {
                    return Ok(false);
                }
                let reply = gateway
                    .post(&format!("/api/notifications/{id}/marquer-lue"), &Value::Null)
                    .await?;
                let _ = ApiEnvelope::<Value>::decode(reply)?.accept()?;
                Ok(true)
            },
        )
        .await;
        self.publish_unread().await;
        result
    }

    /// Mark every notification read, returning whether the server was told.
    ///
    /// A feed with nothing unread resolves locally; repeated calls are
    /// idempotent and cost one request at most.
    pub async fn mark_all_read(&self, user_id: &str, user_type: Role) -> Result<bool, ApiError> {
        let gateway = Arc::clone(&self.gateway);
        let body = json!({ "user_id": user_id, "user_type": user_type.as_str() });
        let result = optimistic::run(
            &self.core,
            |state| {
                let had_unread = state.items.iter().any(|item| !item.lue);
                for item in &mut state.items {
                    item.lue = true;
                }
                had_unread
            },
            |had_unread| async move {
                if !had_unread {
                    return Ok(false);
                }
                let reply = gateway
                    .post("/api/notifications/tout-marquer-lu", &body)
                    .await?;
                let _ = ApiEnvelope::<Value>::decode(reply)?.accept()?;
                Ok(true)
            },
        )
        .await;
        self.publish_unread().await;
        result
    }

    /// Refresh the feed on an interval until the handle drops.
    ///
    /// Failed refreshes are logged and retried on the next tick; the loop
    /// never tears the badge down over a transient error.
    #[must_use]
    pub fn spawn_unread_poller(
        self: &Arc<Self>,
        user_id: impl Into<String>,
        user_type: Role,
        sleeper: Arc<dyn Sleeper>,
        interval: Duration,
    ) -> PollerHandle {
        let sync = Arc::clone(self);
        let user_id = user_id.into();
        spawn_interval(sleeper, interval, move || {
            let sync = Arc::clone(&sync);
            let user_id = user_id.clone();
            async move {
                if let Err(error) = sync.load(&user_id, user_type).await {
                    tracing::warn!("notification refresh failed: {error}");
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use serde_json::json;

    use super::NotificationsSync;
    use crate::domain::identity::Role;
    use crate::domain::ports::{ApiError, MockApiGateway};

    fn feed() -> serde_json::Value {
        json!({
            "success": true,
            "data": [
                { "id": 1, "type": "mission", "message": "Mission validée", "lue": true },
                { "id": 2, "message": "Nouvelle facture disponible", "lue": false }
            ]
        })
    }

    #[tokio::test]
    async fn loading_publishes_the_unread_count() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_get()
            .withf(|path| path == "/api/notifications?user_id=ECL-001&user_type=ecole")
            .return_once(|_| Ok(feed()));
        let sync = NotificationsSync::new(Arc::new(gateway));
        let mut counts = sync.unread_counts();

        sync.load("ECL-001", Role::School).await.expect("feed loads");

        assert_eq!(sync.unread(), 1);
        assert!(counts.has_changed().expect("sender alive"));
        assert_eq!(*counts.borrow_and_update(), 1);
    }

    #[tokio::test]
    async fn marking_one_read_posts_and_drops_the_count() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_get().return_once(|_| Ok(feed()));
        gateway
            .expect_post()
            .withf(|path, body| path == "/api/notifications/2/marquer-lue" && body.is_null())
            .times(1)
            .return_once(|_, _| Ok(json!({ "success": true })));
        let sync = NotificationsSync::new(Arc::new(gateway));
        sync.load("ECL-001", Role::School).await.expect("feed loads");

        let told = sync.mark_read(2).await.expect("receipt confirms");

        assert!(told);
        assert_eq!(sync.unread(), 0);
    }

    #[tokio::test]
    async fn declined_receipts_roll_back() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_get().return_once(|_| Ok(feed()));
        gateway.expect_post().return_once(|_, _| {
            Ok(json!({ "success": false, "message": "Notification inconnue" }))
        });
        let sync = NotificationsSync::new(Arc::new(gateway));
        sync.load("ECL-001", Role::School).await.expect("feed loads");

        let error = sync.mark_read(2).await.expect_err("refusal propagates");

        assert_eq!(error, ApiError::rejected("Notification inconnue"));
        assert_eq!(sync.unread(), 1);
    }

    #[tokio::test]
    async fn marking_an_unknown_notification_stays_local() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_get().return_once(|_| Ok(feed()));
        let sync = NotificationsSync::new(Arc::new(gateway));
        sync.load("ECL-001", Role::School).await.expect("feed loads");

        let told = sync.mark_read(99).await.expect("local no-op succeeds");

        assert!(!told);
        assert_eq!(sync.unread(), 1);
    }

    #[tokio::test]
    async fn mark_all_read_costs_one_request_at_most() {
        let mut gateway = MockApiGateway::new();
        gateway.expect_get().return_once(|_| Ok(feed()));
        gateway
            .expect_post()
            .withf(|path, body| {
                path == "/api/notifications/tout-marquer-lu"
                    && *body == json!({ "user_id": "ECL-001", "user_type": "ecole" })
            })
            .times(1)
            .return_once(|_, _| Ok(json!({ "success": true })));
        let sync = NotificationsSync::new(Arc::new(gateway));
        sync.load("ECL-001", Role::School).await.expect("feed loads");

        let first = sync
            .mark_all_read("ECL-001", Role::School)
            .await
            .expect("first sweep confirms");
        let second = sync
            .mark_all_read("ECL-001", Role::School)
            .await
            .expect("second sweep is local");

        assert!(first);
        assert!(!second);
        assert_eq!(sync.unread(), 0);
    }
}

//! Pending payment listings for instructors.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collection::{SyncCore, SyncedCollection};
use crate::domain::ports::{ApiError, ApiGateway};

/// One payment awaiting settlement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPayment {
    pub id: i64,
    pub montant: f64,
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub date_echeance: Option<String>,
    #[serde(default)]
    pub mission_id: Option<i64>,
}

/// Synchroniser for an instructor's pending payments.
pub struct PaymentsSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<PendingPayment>,
}

impl PaymentsSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<PendingPayment> {
        self.core.snapshot().await
    }

    /// Reload the instructor's pending payments.
    pub async fn load_pending(
        &self,
        intervenant_id: &str,
    ) -> Result<SyncedCollection<PendingPayment>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!("/api/paiements/intervenant/{intervenant_id}/pending"))
            .await?;
        self.core.complete_load(epoch, reply, "payments").await
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use std::sync::Arc;

    use serde_json::json;

    use super::PaymentsSync;
    use crate::domain::ports::MockApiGateway;

    #[tokio::test]
    async fn pending_payments_load_for_the_instructor() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_get()
            .withf(|path| path == "/api/paiements/intervenant/I1/pending")
            .return_once(|_| {
                Ok(json!({
                    "success": true,
                    "data": [
                        { "id": 3, "montant": 420.0, "statut": "en attente", "mission_id": 7 }
                    ]
                }))
            });
        let sync = PaymentsSync::new(Arc::new(gateway));

        let snapshot = sync.load_pending("I1").await.expect("list loads");

        assert_eq!(snapshot.len(), 1);
        assert_eq!(snapshot.items[0].mission_id, Some(7));
    }

    #[tokio::test]
    async fn a_declined_listing_resolves_empty_with_the_message() {
        let mut gateway = MockApiGateway::new();
        gateway
            .expect_get()
            .return_once(|_| Ok(json!({ "success": false })));
        let sync = PaymentsSync::new(Arc::new(gateway));

        let snapshot = sync.load_pending("I1").await.expect("refusal is not an error");

        assert!(snapshot.is_empty());
        assert_eq!(snapshot.load_error.as_deref(), Some("liste indisponible"));
    }
}

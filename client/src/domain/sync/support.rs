//! Support ticket listings and creation for schools.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collection::{SyncCore, SyncedCollection};
use crate::domain::envelope::ApiEnvelope;
use crate::domain::ports::{ApiError, ApiGateway};

/// One support ticket as listed for a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportTicket {
    pub id: i64,
    pub sujet: String,
    pub message: String,
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub date_creation: Option<String>,
}

/// Form a school submits to open a ticket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewTicket {
    pub ecole_id: String,
    pub sujet: String,
    pub message: String,
}

/// Synchroniser for a school's support tickets.
pub struct SupportSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<SupportTicket>,
}

impl SupportSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<SupportTicket> {
        self.core.snapshot().await
    }

    /// Reload the school's tickets.
    pub async fn load(&self, ecole_id: &str) -> Result<SyncedCollection<SupportTicket>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!("/api/support/ecole/mes-tickets/{ecole_id}"))
            .await?;
        self.core.complete_load(epoch, reply, "support tickets").await
    }

    /// Open a ticket, appending the created one on confirmation.
    pub async fn create(&self, ticket: &NewTicket) -> Result<SupportTicket, ApiError> {
        let body = serde_json::to_value(ticket)
            .map_err(|error| ApiError::validation(error.to_string()))?;
        let _serialised = self.core.lock_mutations().await;
        let reply = self.gateway.post("/api/support/tickets", &body).await?;
        let created: SupportTicket = ApiEnvelope::decode(reply)?.require_data()?;
        self.core
            .update(|state| state.items.push(created.clone()))
            .await;
        Ok(created)
    }
}

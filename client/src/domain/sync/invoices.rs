//! Invoice listings and document retrieval.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collection::{SyncCore, SyncedCollection};
use crate::domain::ports::{ApiError, ApiGateway};

/// One invoice row, shared by the school and instructor listings.
///
/// Amounts stay as raw numbers; rendering goes through
/// [`crate::domain::display::format_eur`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Invoice {
    pub id_facture: String,
    pub montant: f64,
    pub statut: String,
    #[serde(default)]
    pub date_emission: Option<String>,
    #[serde(default)]
    pub ecole_id: Option<String>,
    #[serde(default)]
    pub intervenant_id: Option<String>,
}

/// Synchroniser for a user's invoices.
pub struct InvoicesSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<Invoice>,
}

impl InvoicesSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<Invoice> {
        self.core.snapshot().await
    }

    /// Reload a school's invoices.
    pub async fn load_for_school(
        &self,
        ecole_id: &str,
    ) -> Result<SyncedCollection<Invoice>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!("/api/factures/ecole/{ecole_id}"))
            .await?;
        self.core.complete_load(epoch, reply, "invoices").await
    }

    /// Reload an instructor's invoices.
    ///
    /// The server is first asked to materialise the latest invoice so the
    /// listing is current. That step is best effort; a failure is logged
    /// and the listing proceeds with whatever already exists.
    pub async fn load_for_instructor(
        &self,
        intervenant_id: &str,
    ) -> Result<SyncedCollection<Invoice>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        if let Err(error) = self
            .gateway
            .post(
                &format!("/api/factures/intervenant/{intervenant_id}/generate-latest"),
                &serde_json::Value::Null,
            )
            .await
        {
            tracing::warn!("latest invoice generation failed, listing anyway: {error}");
        }
        let reply = self
            .gateway
            .get(&format!("/api/factures/intervenant/{intervenant_id}"))
            .await?;
        self.core.complete_load(epoch, reply, "invoices").await
    }

    /// Fetch the inline preview document for one invoice.
    pub async fn preview(&self, id_facture: &str) -> Result<Vec<u8>, ApiError> {
        self.gateway
            .get_bytes(&format!("/api/factures/preview/{id_facture}"))
            .await
    }

    /// Fetch the downloadable document for one invoice.
    pub async fn download(&self, id_facture: &str) -> Result<Vec<u8>, ApiError> {
        self.gateway
            .get_bytes(&format!("/api/factures/download/{id_facture}"))
            .await
    }
}

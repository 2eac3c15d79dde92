//! Favourite-instructor synchronisation for schools.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::collection::{SyncCore, SyncedCollection};
use super::optimistic;
use crate::domain::envelope::ApiEnvelope;
use crate::domain::ports::{ApiError, ApiGateway};

/// One favourite relation, as listed for a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    /// Instructor the school favourited.
    #[serde(alias = "id")]
    pub intervenant_id: String,
    /// Family name, filled in on listed entries.
    #[serde(default)]
    pub nom: Option<String>,
    /// Given name, filled in on listed entries.
    #[serde(default)]
    pub prenom: Option<String>,
}

impl FavoriteEntry {
    /// Entry inserted optimistically before the server confirms; the next
    /// list reload fills in the names.
    #[must_use]
    pub fn pending(intervenant_id: impl Into<String>) -> Self {
        Self {
            intervenant_id: intervenant_id.into(),
            nom: None,
            prenom: None,
        }
    }
}

/// Synchroniser for a school's favourite instructors.
pub struct FavoritesSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<FavoriteEntry>,
}

impl FavoritesSync {
    /// New synchroniser with an empty collection.
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<FavoriteEntry> {
        self.core.snapshot().await
    }

    /// True when `intervenant_id` is currently favourited.
    pub async fn is_favorite(&self, intervenant_id: &str) -> bool {
        self.core
            .update(|state| {
                state
                    .items
                    .iter()
                    .any(|entry| entry.intervenant_id == intervenant_id)
            })
            .await
    }

    /// Reload the school's favourites.
    ///
    /// A declined envelope resolves to an empty collection carrying the
    /// server message; transport failures propagate.
    pub async fn load(&self, ecole_id: &str) -> Result<SyncedCollection<FavoriteEntry>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!("/api/intervenants/favoris/{ecole_id}"))
            .await?;
        self.core.complete_load(epoch, reply, "favourites").await
    }

    /// Toggle `intervenant_id`, returning the confirmed membership.
    ///
    /// The collection updates optimistically; a declined or failed call
    /// rolls the toggle back. Rapid toggles serialise, so the final state
    /// is always the last server-confirmed one.
    pub async fn toggle(&self, ecole_id: &str, intervenant_id: &str) -> Result<bool, ApiError> {
        let gateway = Arc::clone(&self.gateway);
        let body = json!({
            "ecole_id": ecole_id,
            "intervenant_id": intervenant_id,
        });
        optimistic::run(
            &self.core,
            |state| {
                let was_favorite = state
                    .items
                    .iter()
                    .any(|entry| entry.intervenant_id == intervenant_id);
                if was_favorite {
                    state
                        .items
                        .retain(|entry| entry.intervenant_id != intervenant_id);
                } else {
                    state.items.push(FavoriteEntry::pending(intervenant_id));
                }
                was_favorite
            },
            |was_favorite| async move {
                let reply = if was_favorite {
                    gateway
                        .delete("/api/intervenants/favoris/remove", Some(body))
                        .await?
                } else {
                    gateway.post("/api/intervenants/favoris/add", &body).await?
                };
                let _ = ApiEnvelope::<Value>::decode(reply)?.accept()?;
                Ok(!was_favorite)
            },
        )
        .await
    }
}

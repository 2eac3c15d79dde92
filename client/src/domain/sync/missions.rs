//! Mission listings and declarations for schools.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::collection::{SyncCore, SyncedCollection};
use crate::domain::envelope::ApiEnvelope;
use crate::domain::ports::{ApiError, ApiGateway};

/// One mission as listed for a school.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Mission {
    pub id: i64,
    pub titre: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub statut: Option<String>,
    #[serde(default)]
    pub date_debut: Option<String>,
    #[serde(default)]
    pub date_fin: Option<String>,
}

/// Declaration form a school submits to create a mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionDeclaration {
    pub ecole_id: String,
    pub titre: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_debut: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub date_fin: Option<String>,
}

/// Synchroniser for a school's missions.
pub struct MissionsSync {
    gateway: Arc<dyn ApiGateway>,
    core: SyncCore<Mission>,
}

impl MissionsSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self {
            gateway,
            core: SyncCore::new(),
        }
    }

    /// Current snapshot.
    pub async fn snapshot(&self) -> SyncedCollection<Mission> {
        self.core.snapshot().await
    }

    /// Reload the school's missions.
    pub async fn load(&self, ecole_id: &str) -> Result<SyncedCollection<Mission>, ApiError> {
        let (epoch, _serialised) = self.core.begin_exclusive_load().await;
        let reply = self
            .gateway
            .get(&format!("/api/mission/ecole/{ecole_id}"))
            .await?;
        self.core.complete_load(epoch, reply, "missions").await
    }

    /// Declare a new mission, appending the created one on confirmation.
    ///
    /// Unlike favourites there is no optimistic insert; the collection only
    /// changes once the server returns the mission it created.
    pub async fn declare(&self, declaration: &MissionDeclaration) -> Result<Mission, ApiError> {
        let body = serde_json::to_value(declaration)
            .map_err(|error| ApiError::validation(error.to_string()))?;
        let _serialised = self.core.lock_mutations().await;
        let reply = self
            .gateway
            .post("/api/declaration/mission/ecole", &body)
            .await?;
        let mission: Mission = ApiEnvelope::decode(reply)?.require_data()?;
        self.core
            .update(|state| state.items.push(mission.clone()))
            .await;
        Ok(mission)
    }
}

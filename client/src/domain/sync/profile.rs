//! Profile reads and edits for signed-in users.

use std::sync::Arc;

use crate::domain::envelope::ApiEnvelope;
use crate::domain::identity::{InstructorIdentity, SchoolIdentity};
use crate::domain::ports::{ApiError, ApiGateway};

/// Stateless profile accessor.
///
/// Profiles belong to the session once fetched, so there is no collection
/// to keep in step; every call goes straight to the server.
pub struct ProfileSync {
    gateway: Arc<dyn ApiGateway>,
}

impl ProfileSync {
    #[must_use]
    pub fn new(gateway: Arc<dyn ApiGateway>) -> Self {
        Self { gateway }
    }

    /// Fetch a school profile.
    pub async fn school(&self, ecole_id: &str) -> Result<SchoolIdentity, ApiError> {
        let reply = self
            .gateway
            .get(&format!("/api/ecole/profile/{ecole_id}"))
            .await?;
        ApiEnvelope::decode(reply)?.require_data()
    }

    /// Store edits to a school profile, returning the server's copy.
    pub async fn update_school(&self, profile: &SchoolIdentity) -> Result<SchoolIdentity, ApiError> {
        let body = serde_json::to_value(profile)
            .map_err(|error| ApiError::validation(error.to_string()))?;
        let reply = self
            .gateway
            .put(&format!("/api/ecole/profile/{}", profile.id), &body)
            .await?;
        ApiEnvelope::decode(reply)?.require_data()
    }

    /// Fetch an instructor profile.
    pub async fn instructor(&self, intervenant_id: &str) -> Result<InstructorIdentity, ApiError> {
        let reply = self
            .gateway
            .get(&format!("/api/intervenant/profile/{intervenant_id}"))
            .await?;
        ApiEnvelope::decode(reply)?.require_data()
    }

    /// Store edits to an instructor profile, returning the server's copy.
    pub async fn update_instructor(
        &self,
        profile: &InstructorIdentity,
    ) -> Result<InstructorIdentity, ApiError> {
        let body = serde_json::to_value(profile)
            .map_err(|error| ApiError::validation(error.to_string()))?;
        let reply = self
            .gateway
            .put(&format!("/api/intervenant/profile/{}", profile.id), &body)
            .await?;
        ApiEnvelope::decode(reply)?.require_data()
    }
}

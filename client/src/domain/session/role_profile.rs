//! Role profiles: everything that differs between the account families.
//!
//! The school, instructor, and admin sessions behave identically except for
//! endpoint paths, storage keys, routes, and persistence side effects. Each
//! difference lives here; the controller logic is shared.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::domain::identity::{
    AdminIdentity, InstructorIdentity, Role, SchoolIdentity, StorageKey,
};
use crate::domain::ports::{ApiError, IdentityStore, IdentityStoreError};

/// Everything the session controller needs to know about one account family.
pub trait RoleProfile: Send + Sync + 'static {
    /// Identity record for this role.
    type Identity: Clone
        + PartialEq
        + std::fmt::Debug
        + Serialize
        + DeserializeOwned
        + Send
        + Sync
        + 'static;

    /// Role tag.
    const ROLE: Role;

    /// Login endpoint path.
    fn login_path() -> &'static str;

    /// Current-session endpoint path.
    fn me_path() -> &'static str;

    /// Logout endpoint path.
    fn logout_path() -> &'static str;

    /// Storage key of the persisted identity record.
    fn storage_key() -> StorageKey;

    /// Route of this role's login screen.
    fn login_route() -> &'static str;

    /// Route of this role's landing screen after login.
    fn dashboard_route() -> &'static str;

    /// Extract the identity from the login payload.
    fn identity_from_login(data: &Value) -> Result<Self::Identity, ApiError> {
        decode_identity(Self::ROLE, data)
    }

    /// Extract the identity from the current-session payload.
    fn identity_from_me(data: &Value) -> Result<Self::Identity, ApiError> {
        Self::identity_from_login(data)
    }

    /// Persist the identity after a successful login.
    ///
    /// `data` is the whole login payload, for profiles that persist
    /// companion records next to the identity.
    fn persist_login(
        store: &dyn IdentityStore,
        identity: &Self::Identity,
        data: &Value,
    ) -> Result<(), IdentityStoreError> {
        let _ = data;
        Self::persist_refresh(store, identity)
    }

    /// Persist the identity after a session refresh.
    fn persist_refresh(
        store: &dyn IdentityStore,
        identity: &Self::Identity,
    ) -> Result<(), IdentityStoreError> {
        store.save(Self::storage_key(), &encode(identity)?)
    }

    /// Remove every record this role persists.
    fn clear(store: &dyn IdentityStore) -> Result<(), IdentityStoreError> {
        store.remove(Self::storage_key())
    }

    /// Load the cached identity, treating malformed records as absent.
    ///
    /// A record that no longer matches the expected shape is removed so the
    /// next load starts clean.
    fn load_cached(store: &dyn IdentityStore) -> Option<Self::Identity> {
        let raw = match store.load(Self::storage_key()) {
            Ok(Some(value)) => value,
            Ok(None) => return None,
            Err(error) => {
                tracing::warn!("cached {} identity unavailable: {error}", Self::ROLE);
                return None;
            }
        };
        match serde_json::from_value(raw) {
            Ok(identity) => Some(identity),
            Err(error) => {
                tracing::warn!("cached {} identity malformed, discarding: {error}", Self::ROLE);
                if let Err(error) = Self::clear(store) {
                    tracing::warn!("could not discard malformed {} identity: {error}", Self::ROLE);
                }
                None
            }
        }
    }
}

fn decode_identity<I: DeserializeOwned>(role: Role, data: &Value) -> Result<I, ApiError> {
    serde_json::from_value(data.clone()).map_err(|error| {
        ApiError::decode(format!("payload did not match the {role} record: {error}"))
    })
}

fn encode<T: Serialize>(record: &T) -> Result<Value, IdentityStoreError> {
    serde_json::to_value(record).map_err(|error| IdentityStoreError::serialize(error.to_string()))
}

/// School account family.
#[derive(Debug, Clone, Copy)]
pub struct SchoolProfile;

impl RoleProfile for SchoolProfile {
    type Identity = SchoolIdentity;

    const ROLE: Role = Role::School;

    fn login_path() -> &'static str {
        "/api/ecole/login"
    }

    fn me_path() -> &'static str {
        "/api/ecole/me"
    }

    fn logout_path() -> &'static str {
        "/api/ecole/logout"
    }

    fn storage_key() -> StorageKey {
        StorageKey::SchoolIdentity
    }

    fn login_route() -> &'static str {
        "/connexion"
    }

    fn dashboard_route() -> &'static str {
        "/tableau-de-bord"
    }

    // Screens outside the session layer still read the legacy flag and the
    // bare school id, so both stay in lockstep with the record.
    fn persist_refresh(
        store: &dyn IdentityStore,
        identity: &Self::Identity,
    ) -> Result<(), IdentityStoreError> {
        store.save(StorageKey::SchoolIdentity, &encode(identity)?)?;
        store.save(
            StorageKey::AuthenticatedFlag,
            &Value::String("true".to_owned()),
        )?;
        store.save(StorageKey::SchoolId, &Value::String(identity.id.clone()))
    }

    fn clear(store: &dyn IdentityStore) -> Result<(), IdentityStoreError> {
        store.remove(StorageKey::SchoolIdentity)?;
        store.remove(StorageKey::AuthenticatedFlag)?;
        store.remove(StorageKey::SchoolId)
    }
}

/// Instructor account family.
#[derive(Debug, Clone, Copy)]
pub struct InstructorProfile;

impl RoleProfile for InstructorProfile {
    type Identity = InstructorIdentity;

    const ROLE: Role = Role::Instructor;

    fn login_path() -> &'static str {
        "/api/intervenant/login"
    }

    fn me_path() -> &'static str {
        "/api/intervenant/me"
    }

    fn logout_path() -> &'static str {
        "/api/intervenant/logout"
    }

    fn storage_key() -> StorageKey {
        StorageKey::InstructorIdentity
    }

    fn login_route() -> &'static str {
        "/connexion-intervenant"
    }

    fn dashboard_route() -> &'static str {
        "/espace-intervenant"
    }
}

/// Back-office administrator family.
///
/// The admin login payload nests the identity under `admin` and carries an
/// API token next to it; the token persists under its own key.
#[derive(Debug, Clone, Copy)]
pub struct AdminProfile;

impl RoleProfile for AdminProfile {
    type Identity = AdminIdentity;

    const ROLE: Role = Role::Admin;

    fn login_path() -> &'static str {
        "/admin/login"
    }

    fn me_path() -> &'static str {
        "/admin/me"
    }

    fn logout_path() -> &'static str {
        "/admin/logout"
    }

    fn storage_key() -> StorageKey {
        StorageKey::AdminIdentity
    }

    fn login_route() -> &'static str {
        "/admin/login"
    }

    fn dashboard_route() -> &'static str {
        "/admin/dashboard"
    }

    fn identity_from_login(data: &Value) -> Result<Self::Identity, ApiError> {
        let node = data.get("admin").unwrap_or(data);
        decode_identity(Self::ROLE, node)
    }

    fn identity_from_me(data: &Value) -> Result<Self::Identity, ApiError> {
        Self::identity_from_login(data)
    }

    fn persist_login(
        store: &dyn IdentityStore,
        identity: &Self::Identity,
        data: &Value,
    ) -> Result<(), IdentityStoreError> {
        Self::persist_refresh(store, identity)?;
        match data.get("token").and_then(Value::as_str) {
            Some(token) => store.save(StorageKey::AdminToken, &Value::String(token.to_owned())),
            None => {
                tracing::warn!("admin login payload carried no token");
                Ok(())
            }
        }
    }

    fn clear(store: &dyn IdentityStore) -> Result<(), IdentityStoreError> {
        store.remove(StorageKey::AdminIdentity)?;
        store.remove(StorageKey::AdminToken)
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use serde_json::json;

    use super::{AdminProfile, RoleProfile, SchoolProfile};
    use crate::domain::identity::{SchoolIdentity, StorageKey};
    use crate::domain::ports::IdentityStore;
    use crate::outbound::storage::MemoryIdentityStore;

    fn school() -> SchoolIdentity {
        SchoolIdentity {
            id: "ECL-001".into(),
            nom: "Lycée Jean Moulin".into(),
            email: "contact@jean-moulin.fr".into(),
            telephone: None,
            ville: Some("Lyon".into()),
        }
    }

    #[test]
    fn school_login_persists_the_companion_records() {
        let store = MemoryIdentityStore::default();
        let identity = school();
        SchoolProfile::persist_login(&store, &identity, &json!({}))
            .expect("persist should succeed");

        assert_eq!(
            store
                .load(StorageKey::AuthenticatedFlag)
                .expect("load flag"),
            Some(json!("true"))
        );
        assert_eq!(
            store.load(StorageKey::SchoolId).expect("load id"),
            Some(json!("ECL-001"))
        );
        assert_eq!(SchoolProfile::load_cached(&store), Some(identity));
    }

    #[test]
    fn school_clear_removes_the_companion_records_too() {
        let store = MemoryIdentityStore::default();
        SchoolProfile::persist_login(&store, &school(), &json!({}))
            .expect("persist should succeed");
        SchoolProfile::clear(&store).expect("clear should succeed");

        for key in [
            StorageKey::SchoolIdentity,
            StorageKey::AuthenticatedFlag,
            StorageKey::SchoolId,
        ] {
            assert_eq!(store.load(key).expect("load after clear"), None);
        }
    }

    #[test]
    fn malformed_cached_records_are_discarded_on_load() {
        let store = MemoryIdentityStore::default();
        store
            .save(StorageKey::SchoolIdentity, &json!({ "id": 42 }))
            .expect("seed malformed record");

        assert_eq!(SchoolProfile::load_cached(&store), None);
        assert_eq!(
            store
                .load(StorageKey::SchoolIdentity)
                .expect("load after discard"),
            None
        );
    }

    #[test]
    fn admin_login_unnests_the_identity_and_keeps_the_token() {
        let store = MemoryIdentityStore::default();
        let payload = json!({
            "admin": { "id": "A1", "nom": "Back Office", "email": "admin@marketplace.fr" },
            "token": "jwt-opaque"
        });
        let identity =
            AdminProfile::identity_from_login(&payload).expect("nested identity should decode");
        AdminProfile::persist_login(&store, &identity, &payload).expect("persist should succeed");

        assert_eq!(
            store.load(StorageKey::AdminToken).expect("load token"),
            Some(json!("jwt-opaque"))
        );
        assert_eq!(AdminProfile::load_cached(&store), Some(identity));
    }

    #[test]
    fn admin_me_payload_may_be_flat() {
        let payload = json!({ "id": "A1", "nom": "Back Office", "email": "admin@marketplace.fr" });
        let identity = AdminProfile::identity_from_me(&payload).expect("flat identity decodes");
        assert_eq!(identity.id, "A1");
    }
}

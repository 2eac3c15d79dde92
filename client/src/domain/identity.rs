//! Signed-in identity records and the storage keys they persist under.
//!
//! Field names follow the wire payloads of the marketplace API, which speaks
//! French for domain attributes. The storage key literals and the record
//! shapes are a compatibility contract with earlier releases of the client:
//! records written by one release must keep loading under the next.

use serde::{Deserialize, Serialize};

/// Role tag distinguishing the three account families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    /// School account ("ecole").
    School,
    /// Instructor account ("intervenant").
    Instructor,
    /// Back-office administrator.
    Admin,
}

impl Role {
    /// Wire name of the role, as used in query strings and payloads.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::School => "ecole",
            Self::Instructor => "intervenant",
            Self::Admin => "admin",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Keys under which the client store persists records.
///
/// The literal values must never change; persisted data from earlier
/// releases is read back under exactly these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum StorageKey {
    /// Signed-in school record.
    SchoolIdentity,
    /// Signed-in instructor record.
    InstructorIdentity,
    /// Signed-in administrator record.
    AdminIdentity,
    /// Administrator API token.
    AdminToken,
    /// Legacy boolean flag written alongside the school record.
    AuthenticatedFlag,
    /// Legacy school id written alongside the school record.
    SchoolId,
}

impl StorageKey {
    /// Literal key used by the storage backend.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SchoolIdentity => "ecole_connectee",
            Self::InstructorIdentity => "intervenant_connecte",
            Self::AdminIdentity => "adminData",
            Self::AdminToken => "adminToken",
            Self::AuthenticatedFlag => "is_authenticated",
            Self::SchoolId => "ecole_id",
        }
    }
}

/// School account as returned by the login and profile endpoints.
///
/// Unknown fields are ignored on load so records written before a server
/// addition keep deserialising.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchoolIdentity {
    /// Stable school identifier, e.g. `"ECL-001"`.
    pub id: String,
    /// School name shown in the header.
    pub nom: String,
    /// Contact email used as the login identifier.
    pub email: String,
    /// Contact phone number.
    #[serde(default)]
    pub telephone: Option<String>,
    /// City of the establishment.
    #[serde(default)]
    pub ville: Option<String>,
}

impl SchoolIdentity {
    /// Role tag for this record.
    #[must_use]
    pub const fn role(&self) -> Role {
        Role::School
    }

    /// Name rendered in the account menu.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.nom
    }
}

/// Instructor account as returned by the login and profile endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstructorIdentity {
    /// Stable instructor identifier, e.g. `"I1"`.
    pub id: String,
    /// Family name.
    pub nom: String,
    /// Given name.
    pub prenom: String,
    /// Contact email used as the login identifier.
    pub email: String,
    /// Declared speciality, when one has been recorded.
    #[serde(default)]
    pub specialite: Option<String>,
    /// Moderation state of the account ("en attente", "valide", "rejete").
    #[serde(default)]
    pub statut_validation: Option<String>,
}

impl InstructorIdentity {
    /// Role tag for this record.
    #[must_use]
    pub const fn role(&self) -> Role {
        Role::Instructor
    }

    /// Name rendered in the account menu.
    #[must_use]
    pub fn display_name(&self) -> String {
        format!("{} {}", self.prenom, self.nom)
    }
}

/// Administrator account as returned by the back-office login endpoint.
///
/// The API token travels next to this record in the login payload and is
/// persisted separately under [`StorageKey::AdminToken`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdminIdentity {
    /// Stable administrator identifier.
    pub id: String,
    /// Display name.
    pub nom: String,
    /// Login email.
    pub email: String,
}

impl AdminIdentity {
    /// Role tag for this record.
    #[must_use]
    pub const fn role(&self) -> Role {
        Role::Admin
    }

    /// Name rendered in the back-office header.
    #[must_use]
    pub fn display_name(&self) -> &str {
        &self.nom
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use rstest::rstest;

    use super::{InstructorIdentity, Role, SchoolIdentity, StorageKey};

    #[rstest]
    #[case::school(StorageKey::SchoolIdentity, "ecole_connectee")]
    #[case::instructor(StorageKey::InstructorIdentity, "intervenant_connecte")]
    #[case::admin(StorageKey::AdminIdentity, "adminData")]
    #[case::admin_token(StorageKey::AdminToken, "adminToken")]
    #[case::flag(StorageKey::AuthenticatedFlag, "is_authenticated")]
    #[case::school_id(StorageKey::SchoolId, "ecole_id")]
    fn storage_keys_are_pinned(#[case] key: StorageKey, #[case] literal: &str) {
        assert_eq!(key.as_str(), literal);
    }

    #[rstest]
    #[case::school(Role::School, "ecole")]
    #[case::instructor(Role::Instructor, "intervenant")]
    #[case::admin(Role::Admin, "admin")]
    fn role_wire_names_are_pinned(#[case] role: Role, #[case] wire: &str) {
        assert_eq!(role.as_str(), wire);
        assert_eq!(role.to_string(), wire);
    }

    #[test]
    fn school_records_tolerate_unknown_fields() {
        let raw = serde_json::json!({
            "id": "ECL-001",
            "nom": "Lycée Jean Moulin",
            "email": "contact@jean-moulin.fr",
            "code_postal": "69003"
        });
        let school: SchoolIdentity =
            serde_json::from_value(raw).expect("record with extra fields should load");
        assert_eq!(school.id, "ECL-001");
        assert_eq!(school.display_name(), "Lycée Jean Moulin");
        assert_eq!(school.telephone, None);
    }

    #[test]
    fn instructor_display_name_joins_given_and_family_names() {
        let instructor = InstructorIdentity {
            id: "I1".into(),
            nom: "Durand".into(),
            prenom: "Alice".into(),
            email: "alice.durand@example.fr".into(),
            specialite: None,
            statut_validation: Some("en attente".into()),
        };
        assert_eq!(instructor.display_name(), "Alice Durand");
        assert_eq!(instructor.role(), Role::Instructor);
    }
}

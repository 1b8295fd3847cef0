//! User account wire models and translation helpers.
//!
//! An account links an externally-issued identity to a role and, for
//! dietitians and patients, to the two-sided assignment state:
//! a dietitian's roster of linked patients and a patient's back-reference
//! to its dietitian.
//!
//! Invariant (enforced by the assignment coordinator, not here): a patient's
//! `linked_dietitian_id` is set iff that patient appears in exactly one
//! dietitian's roster.

use crate::{parse_with_path, RecordError, RecordResult};
use aahara_types::{EmailAddress, Identity, NonEmptyText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Account role enumeration.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Administrative account.
    Admin,
    /// Dietitian account; owns a roster of linked patients.
    Dietitian,
    /// Patient account; holds at most one dietitian back-reference.
    Patient,
}

impl Role {
    /// Wire-format string as stored in account documents.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Dietitian => "dietitian",
            Role::Patient => "patient",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = RecordError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "admin" => Ok(Role::Admin),
            "dietitian" => Ok(Role::Dietitian),
            "patient" => Ok(Role::Patient),
            other => Err(RecordError::InvalidInput(format!(
                "unknown role: {other:?}"
            ))),
        }
    }
}

/// A user account document.
///
/// Field names on the wire match the source document store exactly
/// (`linkedPatientIds`, `linkedDietitianId`, `createdAt`, `updatedAt`).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct UserAccount {
    /// The externally-issued identity handle.
    pub id: Identity,

    /// Display name.
    pub name: NonEmptyText,

    /// Contact email.
    pub email: EmailAddress,

    /// Account role.
    pub role: Role,

    /// Dietitian side of the assignment link. Deduplicated; treated as a set.
    #[serde(
        rename = "linkedPatientIds",
        default,
        skip_serializing_if = "Vec::is_empty"
    )]
    pub linked_patient_ids: Vec<Identity>,

    /// Patient side of the assignment link.
    #[serde(
        rename = "linkedDietitianId",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub linked_dietitian_id: Option<Identity>,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl UserAccount {
    /// Creates a fresh account document with role-specific linkage fields.
    ///
    /// Dietitians start with an empty roster; patients start unassigned.
    /// Admin accounts carry no linkage state.
    pub fn register(
        id: Identity,
        name: NonEmptyText,
        email: EmailAddress,
        role: Role,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            name,
            email,
            role,
            linked_patient_ids: Vec::new(),
            linked_dietitian_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether this patient account currently has a dietitian.
    pub fn is_assigned_to_dietitian(&self) -> bool {
        self.linked_dietitian_id.is_some()
    }

    /// Adds `patient_id` to the roster with set-union semantics.
    ///
    /// Returns `true` if the roster changed, `false` if the id was already
    /// present. Duplicate appends never create duplicate entries.
    pub fn add_linked_patient(&mut self, patient_id: Identity) -> bool {
        if self.linked_patient_ids.contains(&patient_id) {
            return false;
        }
        self.linked_patient_ids.push(patient_id);
        true
    }

    /// Removes `patient_id` from the roster.
    ///
    /// Returns `true` if the roster changed, `false` if the id was not
    /// present.
    pub fn remove_linked_patient(&mut self, patient_id: &Identity) -> bool {
        let before = self.linked_patient_ids.len();
        self.linked_patient_ids.retain(|id| id != patient_id);
        self.linked_patient_ids.len() != before
    }

    /// Whether `patient_id` is on this dietitian's roster.
    pub fn has_linked_patient(&self, patient_id: &Identity) -> bool {
        self.linked_patient_ids.contains(patient_id)
    }
}

// ============================================================================
// Public Account operations
// ============================================================================

/// Account document operations.
///
/// This is a zero-sized type used for namespacing account-related operations.
/// All methods are associated functions.
pub struct Account;

impl Account {
    /// Parse an account document from JSON text.
    ///
    /// Uses `serde_path_to_error` to surface a best-effort path (for example
    /// `linkedPatientIds.1`) to the failing field when the JSON does not match
    /// the wire schema.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the JSON does not represent a valid account
    /// document, any field has an unexpected type, or unknown keys are present.
    pub fn parse(json_text: &str) -> RecordResult<UserAccount> {
        parse_with_path::<UserAccount>("Account", json_text)
    }

    /// Render an account document as pretty-printed JSON text.
    pub fn render(account: &UserAccount) -> RecordResult<String> {
        serde_json::to_string_pretty(account)
            .map_err(|e| RecordError::Translation(format!("Failed to serialise account: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_account(role: Role) -> UserAccount {
        UserAccount::register(
            Identity::parse("uid-dietitian-1").unwrap(),
            NonEmptyText::new("Asha Nair").unwrap(),
            EmailAddress::parse("asha@example.com").unwrap(),
            role,
            Utc::now(),
        )
    }

    #[test]
    fn role_parses_from_wire_string() {
        assert_eq!("dietitian".parse::<Role>().unwrap(), Role::Dietitian);
        assert!("gardener".parse::<Role>().is_err());
    }

    #[test]
    fn register_initialises_linkage_fields_empty() {
        let dietitian = sample_account(Role::Dietitian);
        assert!(dietitian.linked_patient_ids.is_empty());
        assert!(dietitian.linked_dietitian_id.is_none());

        let patient = sample_account(Role::Patient);
        assert!(!patient.is_assigned_to_dietitian());
    }

    #[test]
    fn add_linked_patient_is_set_union() {
        let mut dietitian = sample_account(Role::Dietitian);
        let p1 = Identity::parse("uid-p1").unwrap();

        assert!(dietitian.add_linked_patient(p1.clone()));
        assert!(!dietitian.add_linked_patient(p1.clone()));
        assert_eq!(dietitian.linked_patient_ids.len(), 1);
        assert!(dietitian.has_linked_patient(&p1));
    }

    #[test]
    fn remove_linked_patient_drops_only_the_named_entry() {
        let mut dietitian = sample_account(Role::Dietitian);
        let p1 = Identity::parse("uid-p1").unwrap();
        let p2 = Identity::parse("uid-p2").unwrap();
        dietitian.add_linked_patient(p1.clone());
        dietitian.add_linked_patient(p2.clone());

        assert!(dietitian.remove_linked_patient(&p1));
        assert!(!dietitian.remove_linked_patient(&p1));
        assert_eq!(dietitian.linked_patient_ids, vec![p2]);
    }

    #[test]
    fn round_trips_sample_json() {
        let input = r#"{
  "id": "uid-p1",
  "name": "Ravi Kumar",
  "email": "ravi@example.com",
  "role": "patient",
  "linkedDietitianId": "uid-d1",
  "createdAt": "2026-01-23T13:58:04.099304Z",
  "updatedAt": "2026-01-23T13:58:04.099304Z"
}"#;

        let account = Account::parse(input).expect("parse account json");
        assert_eq!(account.role, Role::Patient);
        assert!(account.is_assigned_to_dietitian());

        let output = Account::render(&account).expect("render account");
        let reparsed = Account::parse(&output).expect("reparse account json");
        assert_eq!(account, reparsed);
    }

    #[test]
    fn strict_validation_rejects_unknown_keys() {
        let input = r#"{
  "id": "uid-p1",
  "name": "Ravi Kumar",
  "email": "ravi@example.com",
  "role": "patient",
  "createdAt": "2026-01-23T13:58:04.099304Z",
  "updatedAt": "2026-01-23T13:58:04.099304Z",
  "favouriteColour": "green"
}"#;

        let err = Account::parse(input).expect_err("unknown key should be rejected");
        assert!(matches!(err, RecordError::Translation(_)));
    }

    #[test]
    fn parse_reports_failing_field_path() {
        let input = r#"{
  "id": "uid-p1",
  "name": "Ravi Kumar",
  "email": "ravi@example.com",
  "role": "gardener",
  "createdAt": "2026-01-23T13:58:04.099304Z",
  "updatedAt": "2026-01-23T13:58:04.099304Z"
}"#;

        let err = Account::parse(input).expect_err("invalid role should fail");
        let message = err.to_string();
        assert!(message.contains("role"), "path should name the field: {message}");
    }
}

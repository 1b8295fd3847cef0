//! Wire/boundary support for patient–dietitian coordination records.
//!
//! This crate provides **wire models** and **format/translation helpers** for the
//! JSON documents the coordination core persists and exchanges:
//! - user accounts (role, roster linkage)
//! - clinical intake profiles (Ayurvedic assessment fields)
//! - todo records (system-generated and user-created reminders)
//! - generated diet plans (opaque chart payloads with a publish flag)
//!
//! This crate focuses on:
//! - preserving the exact wire field names of the source document store
//! - serialisation/deserialisation with path diagnostics
//! - translation between domain primitives and wire structs
//!
//! No I/O happens here; persistence lives behind the store ports in `aahara-core`.

pub mod account;
pub mod plan;
pub mod profile;
pub mod todo;

// Re-export facades
pub use account::Account;
pub use plan::Plan;
pub use profile::Profile;
pub use todo::TodoList;

// Re-export public domain-level types
pub use account::{Role, UserAccount};
pub use plan::DietPlan;
pub use profile::{
    ActiveStatus, ActivityLevel, AgniStrength, AssessmentOption, ClinicalProfile, FoodPreference,
    Gender, ProfileUpdate, Season,
};
pub use todo::{Priority, TodoRecord, TodoUpdate};

// Re-export the identity primitive so downstream crates need a single import.
pub use aahara_types::Identity;

/// Errors returned by the `records` boundary crate.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("invalid JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("translation error: {0}")]
    Translation(String),
}

/// Type alias for Results that can fail with a [`RecordError`].
pub type RecordResult<T> = Result<T, RecordError>;

/// Deserialize `json_text` into `T`, reporting the failing field path.
///
/// Shared by all record facades so schema mismatches in stored documents
/// surface as `record schema mismatch at linked_patient_ids.2: ...` rather
/// than an offsetless serde error.
pub(crate) fn parse_with_path<T: serde::de::DeserializeOwned>(
    kind: &str,
    json_text: &str,
) -> RecordResult<T> {
    let mut deserializer = serde_json::Deserializer::from_str(json_text);

    match serde_path_to_error::deserialize::<_, T>(&mut deserializer) {
        Ok(parsed) => Ok(parsed),
        Err(err) => {
            let path = err.path().to_string();
            let source = err.into_inner();
            let path = if path.is_empty() {
                "<root>"
            } else {
                path.as_str()
            };
            Err(RecordError::Translation(format!(
                "{kind} schema mismatch at {path}: {source}"
            )))
        }
    }
}

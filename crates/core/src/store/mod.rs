//! Storage ports for the coordination core.
//!
//! The source system persisted everything in a hosted document database and
//! a browser-local key-value blob. Both are modelled here as capability
//! traits so the same coordination logic runs against the bundled
//! file-backed store, a future server-side store, or in-memory fakes in
//! tests. Core services depend only on these traits.

pub mod file;
pub mod memory;

use crate::CoordResult;
use aahara_types::Identity;
use records::{ClinicalProfile, DietPlan, Role, UserAccount};

/// Keyed access to user account documents.
pub trait AccountStore {
    /// Fetch an account by id; absent accounts are `Ok(None)`, never an error.
    fn get(&self, id: &Identity) -> CoordResult<Option<UserAccount>>;

    /// Write an account document wholesale.
    fn put(&self, account: &UserAccount) -> CoordResult<()>;

    /// Set-union append of `patient_id` to the dietitian's roster.
    ///
    /// Returns `true` if the roster changed. Duplicate appends are harmless
    /// no-ops, so a lost race produces at worst a redundant attempt.
    fn add_patient_to_roster(
        &self,
        dietitian_id: &Identity,
        patient_id: &Identity,
    ) -> CoordResult<bool>;

    /// Remove `patient_id` from the dietitian's roster, compensating an
    /// append whose claim was subsequently lost.
    ///
    /// Returns `true` if the roster changed. Removing an absent entry is a
    /// harmless no-op.
    fn remove_patient_from_roster(
        &self,
        dietitian_id: &Identity,
        patient_id: &Identity,
    ) -> CoordResult<bool>;

    /// Conditionally claim the patient: set `linked_dietitian_id` iff the
    /// patient is currently unassigned (compare-and-set).
    ///
    /// Returns `true` when the claim succeeded, `false` when another
    /// dietitian already holds the patient. Claiming a patient already held
    /// by `dietitian_id` returns `true` (idempotent).
    fn claim_dietitian_if_unassigned(
        &self,
        patient_id: &Identity,
        dietitian_id: &Identity,
    ) -> CoordResult<bool>;

    /// All accounts with the given role. Unparseable documents are skipped.
    fn list_by_role(&self, role: Role) -> CoordResult<Vec<UserAccount>>;
}

/// Keyed access to clinical profile documents.
///
/// Method names deliberately avoid colliding with [`AccountStore`] so one
/// backend can implement both ports.
pub trait ProfileStore {
    /// Fetch a profile by patient id; absent profiles are `Ok(None)`.
    fn load(&self, patient_id: &Identity) -> CoordResult<Option<ClinicalProfile>>;

    /// Create the profile document iff none exists yet.
    ///
    /// Returns `true` if the document was created, `false` if one was
    /// already present (which is left untouched).
    fn create_if_absent(&self, patient_id: &Identity, profile: &ClinicalProfile)
        -> CoordResult<bool>;

    /// Overwrite the profile document.
    fn save(&self, patient_id: &Identity, profile: &ClinicalProfile) -> CoordResult<()>;
}

/// Append-oriented access to generated diet plan documents.
pub trait PlanStore {
    /// Store a newly generated plan.
    fn append(&self, plan: &DietPlan) -> CoordResult<()>;

    /// The most recent plan for the patient by generation timestamp.
    ///
    /// With `include_unpublished` false only published plans are considered
    /// (the patient-facing read path).
    fn latest_for_patient(
        &self,
        patient_id: &Identity,
        include_unpublished: bool,
    ) -> CoordResult<Option<DietPlan>>;

    /// Mark the most recent plan published. Returns `false` when the patient
    /// has no plans.
    fn publish_latest(&self, patient_id: &Identity) -> CoordResult<bool>;
}

/// The persistence medium behind a single dietitian's todo list.
///
/// One opaque blob, read and written wholesale per operation. A missing or
/// externally cleared medium reads as `None` and must never be an error.
pub trait TodoMedium {
    fn read(&self) -> Option<String>;

    fn write(&self, blob: &str) -> CoordResult<()>;
}

//! Patient–dietitian assignment coordination.
//!
//! Linking a patient touches three documents with no multi-document
//! transaction: the dietitian's roster, the patient's back-reference and the
//! patient's clinical profile. The writes are deliberately best-effort in
//! the same shape as the source system; the conditional claim closes the
//! concurrent double-assignment race, and a missing profile is healed
//! lazily by [`AssignmentService::ensure_profile`] on the next read.

use crate::context::AuthContext;
use crate::error::{CoordResult, CoordinationError};
use crate::policy::{evaluate, AssignmentDecision};
use crate::store::{AccountStore, ProfileStore};
use crate::todo::synthesizer::PatientSnapshot;
use aahara_types::Identity;
use chrono::Utc;
use records::{ActiveStatus, ClinicalProfile, Role, UserAccount};
use std::sync::Arc;
use tracing::warn;

/// Outcome of a successful assignment request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AssignOutcome {
    /// The patient was newly linked to the requesting dietitian.
    Linked,
    /// The patient was already on the requesting dietitian's roster.
    AlreadyLinked,
}

/// Coordinates assignment writes across the account and profile stores.
pub struct AssignmentService {
    accounts: Arc<dyn AccountStore + Send + Sync>,
    profiles: Arc<dyn ProfileStore + Send + Sync>,
}

impl AssignmentService {
    pub fn new(
        accounts: Arc<dyn AccountStore + Send + Sync>,
        profiles: Arc<dyn ProfileStore + Send + Sync>,
    ) -> Self {
        Self { accounts, profiles }
    }

    // ========================================================================
    // Public operations
    // ========================================================================

    /// Links `patient_id` to the calling dietitian.
    ///
    /// The assignment policy is re-evaluated against freshly read account
    /// state immediately before writing. Three writes follow:
    ///
    /// 1. set-union append of the patient to the dietitian's roster;
    /// 2. conditional claim of the patient's dietitian back-reference;
    /// 3. creation of the clinical profile iff absent, all clinical fields
    ///    null.
    ///
    /// If (1) or (2) fails, the error is logged and surfaced after (3) has
    /// still been attempted. A failure in (3) alone does not undo (1) or
    /// (2); the profile is created lazily on the next read instead. A claim
    /// lost to a concurrent rival removes the entry appended in (1) again,
    /// so the loser's roster never retains a patient held elsewhere.
    ///
    /// # Errors
    ///
    /// - [`CoordinationError::RoleMismatch`] unless the caller is a
    ///   dietitian and the target account a patient.
    /// - [`CoordinationError::AccountNotFound`] when the patient account
    ///   does not exist.
    /// - [`CoordinationError::AlreadyAssignedElsewhere`] when another
    ///   dietitian holds the patient.
    pub fn assign(&self, ctx: &AuthContext, patient_id: &Identity) -> CoordResult<AssignOutcome> {
        ctx.require_role(Role::Dietitian)?;

        let patient = self
            .accounts
            .get(patient_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(patient_id.clone()))?;
        if patient.role != Role::Patient {
            return Err(CoordinationError::RoleMismatch {
                expected: Role::Patient,
                found: patient.role,
            });
        }

        match evaluate(&patient, &ctx.user_id) {
            AssignmentDecision::AlreadyYours => return Ok(AssignOutcome::AlreadyLinked),
            AssignmentDecision::HeldByOther(held_by) => {
                return Err(CoordinationError::AlreadyAssignedElsewhere {
                    patient: patient_id.clone(),
                    held_by,
                });
            }
            AssignmentDecision::Allowed => {}
        }

        let mut pending_failure: Option<CoordinationError> = None;

        if let Err(e) = self.accounts.add_patient_to_roster(&ctx.user_id, patient_id) {
            warn!("Roster append for patient {patient_id} failed: {e}");
            pending_failure = Some(e);
        }

        if pending_failure.is_none() {
            match self
                .accounts
                .claim_dietitian_if_unassigned(patient_id, &ctx.user_id)
            {
                Ok(true) => {}
                Ok(false) => {
                    // Lost the claim between the policy read and the write.
                    // The roster entry appended in (1) now points at a
                    // patient held elsewhere; take it back out.
                    if let Err(e) = self
                        .accounts
                        .remove_patient_from_roster(&ctx.user_id, patient_id)
                    {
                        warn!("Roster compensation for patient {patient_id} failed: {e}");
                    }
                    let fresh = self
                        .accounts
                        .get(patient_id)?
                        .ok_or_else(|| CoordinationError::AccountNotFound(patient_id.clone()))?;
                    return match evaluate(&fresh, &ctx.user_id) {
                        AssignmentDecision::AlreadyYours => Ok(AssignOutcome::AlreadyLinked),
                        AssignmentDecision::HeldByOther(held_by) => {
                            Err(CoordinationError::AlreadyAssignedElsewhere {
                                patient: patient_id.clone(),
                                held_by,
                            })
                        }
                        // Links are never cleared once set, so a lost claim
                        // always leaves a holder behind.
                        AssignmentDecision::Allowed => Err(CoordinationError::InvalidInput(
                            format!("assignment of {patient_id} conflicted with a concurrent claim"),
                        )),
                    };
                }
                Err(e) => {
                    warn!("Claim of patient {patient_id} failed: {e}");
                    pending_failure = Some(e);
                }
            }
        }

        let profile =
            ClinicalProfile::unassessed(patient.name.clone(), ctx.user_id.clone(), Utc::now());
        if let Err(e) = self.profiles.create_if_absent(patient_id, &profile) {
            match pending_failure {
                Some(_) => warn!("Profile creation for patient {patient_id} also failed: {e}"),
                None => {
                    // Accepted: the link stands and the profile is created
                    // lazily on the next read.
                    warn!("Profile creation for patient {patient_id} failed, deferring: {e}");
                }
            }
        }

        match pending_failure {
            Some(e) => Err(e),
            None => Ok(AssignOutcome::Linked),
        }
    }

    /// Returns the patient's clinical profile, creating the unassessed
    /// document if an earlier assignment left it missing.
    ///
    /// # Errors
    ///
    /// Returns [`CoordinationError::AccountNotFound`] when the patient
    /// account does not exist, or [`CoordinationError::InvalidInput`] when
    /// the patient has no dietitian and therefore no profile to create.
    pub fn ensure_profile(&self, patient_id: &Identity) -> CoordResult<ClinicalProfile> {
        if let Some(profile) = self.profiles.load(patient_id)? {
            return Ok(profile);
        }

        let patient = self
            .accounts
            .get(patient_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(patient_id.clone()))?;
        let Some(dietitian_id) = patient.linked_dietitian_id.clone() else {
            return Err(CoordinationError::InvalidInput(format!(
                "patient {patient_id} has no assigned dietitian"
            )));
        };

        let profile = ClinicalProfile::unassessed(patient.name.clone(), dietitian_id, Utc::now());
        self.profiles.create_if_absent(patient_id, &profile)?;
        // A concurrent writer may have created the document first; read back
        // whichever version won.
        Ok(self.profiles.load(patient_id)?.unwrap_or(profile))
    }

    /// Resolves the calling dietitian's linked patient accounts.
    ///
    /// Roster entries whose account document is missing are logged and
    /// skipped, never fatal.
    pub fn roster(&self, ctx: &AuthContext) -> CoordResult<Vec<UserAccount>> {
        ctx.require_role(Role::Dietitian)?;

        let dietitian = self
            .accounts
            .get(&ctx.user_id)?
            .ok_or_else(|| CoordinationError::AccountNotFound(ctx.user_id.clone()))?;

        let mut patients = Vec::with_capacity(dietitian.linked_patient_ids.len());
        for id in &dietitian.linked_patient_ids {
            match self.accounts.get(id)? {
                Some(account) => patients.push(account),
                None => warn!("Roster references missing account {id}, skipping"),
            }
        }
        Ok(patients)
    }

    /// The roster joined with profile state, for reminder synthesis.
    ///
    /// Patients whose profile is marked not active are excluded; a patient
    /// with no profile document yet is included with an absent profile.
    pub fn roster_snapshots(&self, ctx: &AuthContext) -> CoordResult<Vec<PatientSnapshot>> {
        let mut snapshots = Vec::new();
        for patient in self.roster(ctx)? {
            let profile = self.profiles.load(&patient.id)?;
            if matches!(
                profile.as_ref().map(|p| p.active_status),
                Some(ActiveStatus::NotActive)
            ) {
                continue;
            }
            snapshots.push(PatientSnapshot {
                id: patient.id,
                name: patient.name,
                profile,
            });
        }
        Ok(snapshots)
    }
}

//! Assignment policy.
//!
//! Decides whether a dietitian may link a given patient. Exclusivity is the
//! governing rule: a patient holds at most one dietitian at a time. The
//! policy is pure and must be evaluated against freshly read account state
//! immediately before every mutating assignment attempt — roster state can
//! change between render and click when the same dietitian acts from two
//! open sessions, or when two dietitians race for the same patient.

use aahara_types::Identity;
use records::UserAccount;

/// Outcome of evaluating an assignment request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentDecision {
    /// The patient is unassigned; linking may proceed.
    Allowed,
    /// The patient is already linked to the requesting dietitian.
    /// Callers treat this as already-added, not as an error.
    AlreadyYours,
    /// The patient is exclusively held by another dietitian.
    HeldByOther(Identity),
}

/// Evaluates whether `requesting` may claim `patient`.
pub fn evaluate(patient: &UserAccount, requesting: &Identity) -> AssignmentDecision {
    match &patient.linked_dietitian_id {
        None => AssignmentDecision::Allowed,
        Some(current) if current == requesting => AssignmentDecision::AlreadyYours,
        Some(current) => AssignmentDecision::HeldByOther(current.clone()),
    }
}

/// Boolean convenience over [`evaluate`]: true only for a fresh claim.
pub fn can_assign(patient: &UserAccount, requesting: &Identity) -> bool {
    evaluate(patient, requesting) == AssignmentDecision::Allowed
}

#[cfg(test)]
mod tests {
    use super::*;
    use aahara_types::{EmailAddress, NonEmptyText};
    use chrono::Utc;
    use records::Role;

    fn patient_account(linked_dietitian: Option<&str>) -> UserAccount {
        let mut account = UserAccount::register(
            Identity::parse("uid-p1").unwrap(),
            NonEmptyText::new("Ravi Kumar").unwrap(),
            EmailAddress::parse("ravi@example.com").unwrap(),
            Role::Patient,
            Utc::now(),
        );
        account.linked_dietitian_id = linked_dietitian.map(|d| Identity::parse(d).unwrap());
        account
    }

    #[test]
    fn unassigned_patient_is_allowed() {
        let patient = patient_account(None);
        let d1 = Identity::parse("uid-d1").unwrap();
        assert_eq!(evaluate(&patient, &d1), AssignmentDecision::Allowed);
        assert!(can_assign(&patient, &d1));
    }

    #[test]
    fn own_patient_is_already_yours() {
        let patient = patient_account(Some("uid-d1"));
        let d1 = Identity::parse("uid-d1").unwrap();
        assert_eq!(evaluate(&patient, &d1), AssignmentDecision::AlreadyYours);
        assert!(!can_assign(&patient, &d1));
    }

    #[test]
    fn patient_held_by_other_dietitian_is_blocked() {
        let patient = patient_account(Some("uid-d2"));
        let d1 = Identity::parse("uid-d1").unwrap();
        assert_eq!(
            evaluate(&patient, &d1),
            AssignmentDecision::HeldByOther(Identity::parse("uid-d2").unwrap())
        );
        assert!(!can_assign(&patient, &d1));
    }
}

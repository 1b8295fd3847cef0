//! System-generated reminder synthesis.
//!
//! The synthesizer derives reminders from the assignment roster and the
//! profile-completeness state of each linked patient, then merges them into
//! the dietitian's todo collection. System-generated records carry
//! deterministic ids so repeat runs address existing records instead of
//! duplicating them; records are completed in place, never deleted.

use crate::completeness::is_complete;
use crate::error::CoordResult;
use crate::todo::store::TodoStore;
use aahara_types::{Identity, NonEmptyText};
use chrono::Utc;
use records::{ClinicalProfile, Priority, TodoRecord};

/// Non-patient-specific reminders seeded once per collection.
///
/// Matched by id only; completing one does not resurrect it on the next run.
const DEFAULT_REMINDERS: [(&str, &str, &str, Priority); 2] = [
    (
        "default:review-diet-charts",
        "Review pending diet charts",
        "Check generated charts awaiting review before publishing to patients",
        Priority::Medium,
    ),
    (
        "default:weekly-patient-checkins",
        "Weekly patient check-ins",
        "Follow up with patients who have not logged progress this week",
        Priority::Low,
    ),
];

/// A linked patient as the synthesizer sees it: identity, display name and
/// the profile document if one exists yet.
#[derive(Clone, Debug)]
pub struct PatientSnapshot {
    pub id: Identity,
    pub name: NonEmptyText,
    pub profile: Option<ClinicalProfile>,
}

/// Derives and merges system-generated reminders.
pub struct TodoSynthesizer {
    store: TodoStore,
}

impl TodoSynthesizer {
    pub fn new(store: TodoStore) -> Self {
        Self { store }
    }

    /// The collection this synthesizer writes through.
    pub fn store(&self) -> &TodoStore {
        &self.store
    }

    /// Re-derives system-generated reminders for `active_patients` and merges
    /// them into the persisted collection, returning the full collection.
    ///
    /// - Each default reminder exists exactly once, regardless of completion.
    /// - Each patient with an incomplete (or absent) profile gets exactly one
    ///   open complete-profile record; an existing open record is left alone.
    /// - When a patient's profile has become complete, the open record is
    ///   marked completed in place. Nothing is ever deleted.
    ///
    /// Repeat calls under unchanged inputs write nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the merged collection cannot be written back.
    pub fn synthesize(&self, active_patients: &[PatientSnapshot]) -> CoordResult<Vec<TodoRecord>> {
        let mut todos = self.store.load();
        let mut changed = false;
        let now = Utc::now();

        for (id, title, description, priority) in DEFAULT_REMINDERS {
            if todos.iter().any(|t| t.id == id) {
                continue;
            }
            let title = NonEmptyText::new(title)?;
            todos.push(TodoRecord::system_generated(
                id.to_string(),
                title,
                description.to_string(),
                priority,
                now,
            ));
            changed = true;
        }

        for patient in active_patients {
            let id = complete_profile_id(&patient.id);
            let complete = is_complete(patient.profile.as_ref());

            match todos.iter_mut().find(|t| t.id == id) {
                Some(record) => {
                    if complete && !record.is_completed {
                        record.is_completed = true;
                        changed = true;
                    }
                }
                None => {
                    if !complete {
                        let title =
                            NonEmptyText::new(format!("Complete profile for {}", patient.name))?;
                        todos.push(
                            TodoRecord::system_generated(
                                id,
                                title,
                                "Fill in the remaining intake fields so a diet chart can be \
                                 generated"
                                    .to_string(),
                                Priority::High,
                                now,
                            )
                            .for_patient(patient.id.clone(), patient.name.clone()),
                        );
                        changed = true;
                    }
                }
            }
        }

        if changed {
            self.store.save(&todos)?;
        }
        Ok(todos)
    }
}

/// Deterministic id for a patient's complete-profile reminder.
fn complete_profile_id(patient_id: &Identity) -> String {
    format!("complete-profile:{patient_id}")
}

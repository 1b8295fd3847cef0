//! Todo record wire models and translation helpers.
//!
//! Todos are persisted wholesale as a single JSON array per dietitian
//! (the medium is injected in `aahara-core`). Two lifecycles coexist:
//!
//! - **system-generated** records, created and completed by the synthesizer
//!   under a deterministic id per (kind, patient), never deleted by it;
//! - **user-created** records with random ids, deleted only by explicit
//!   user action.

use crate::{parse_with_path, RecordError, RecordResult};
use aahara_types::{Identity, NonEmptyText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ============================================================================
// Public domain-level types
// ============================================================================

/// Reminder priority.
///
/// Variant order matters: `Ord` is used for dashboard ranking
/// (high before medium before low).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Low,
    Medium,
    High,
}

impl std::str::FromStr for Priority {
    type Err = RecordError;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        match input {
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            other => Err(RecordError::InvalidInput(format!(
                "unknown priority: {other:?}"
            ))),
        }
    }
}

/// A single todo record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoRecord {
    /// Deterministic for system-generated entries, random for user-created.
    pub id: String,

    pub title: NonEmptyText,

    #[serde(default)]
    pub description: String,

    #[serde(rename = "isCompleted")]
    pub is_completed: bool,

    #[serde(rename = "isSystemGenerated")]
    pub is_system_generated: bool,

    pub priority: Priority,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "patientId", default, skip_serializing_if = "Option::is_none")]
    pub patient_id: Option<Identity>,

    #[serde(
        rename = "patientName",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub patient_name: Option<NonEmptyText>,
}

impl TodoRecord {
    /// Creates a user-authored record with a random id.
    pub fn user_created(
        title: NonEmptyText,
        description: String,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title,
            description,
            is_completed: false,
            is_system_generated: false,
            priority,
            created_at: now,
            patient_id: None,
            patient_name: None,
        }
    }

    /// Creates an open system-generated record under a caller-chosen id.
    ///
    /// The synthesizer derives ids deterministically so repeat runs address
    /// the same record rather than creating a new one.
    pub fn system_generated(
        id: String,
        title: NonEmptyText,
        description: String,
        priority: Priority,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            id,
            title,
            description,
            is_completed: false,
            is_system_generated: true,
            priority,
            created_at: now,
            patient_id: None,
            patient_name: None,
        }
    }

    /// Attaches the patient this record concerns.
    pub fn for_patient(mut self, patient_id: Identity, patient_name: NonEmptyText) -> Self {
        self.patient_id = Some(patient_id);
        self.patient_name = Some(patient_name);
        self
    }
}

/// A partial mutation of an existing todo record.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TodoUpdate {
    pub title: Option<NonEmptyText>,
    pub description: Option<String>,
    pub priority: Option<Priority>,
    #[serde(rename = "isCompleted")]
    pub is_completed: Option<bool>,
}

impl TodoUpdate {
    /// Applies the populated fields to `record`.
    pub fn apply(self, record: &mut TodoRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(priority) = self.priority {
            record.priority = priority;
        }
        if let Some(is_completed) = self.is_completed {
            record.is_completed = is_completed;
        }
    }
}

// ============================================================================
// Public TodoList operations
// ============================================================================

/// Whole-collection todo operations.
///
/// The persistence medium stores the entire list as one JSON blob, read and
/// written wholesale per operation.
pub struct TodoList;

impl TodoList {
    /// Parse a todo collection from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the JSON is not a valid array of todo
    /// records; the failing element and field are named in the message.
    pub fn parse(json_text: &str) -> RecordResult<Vec<TodoRecord>> {
        parse_with_path::<Vec<TodoRecord>>("Todo list", json_text)
    }

    /// Render a todo collection as JSON text.
    pub fn render(todos: &[TodoRecord]) -> RecordResult<String> {
        serde_json::to_string(todos)
            .map_err(|e| RecordError::Translation(format!("Failed to serialise todos: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn priority_orders_high_above_low() {
        assert!(Priority::High > Priority::Medium);
        assert!(Priority::Medium > Priority::Low);
    }

    #[test]
    fn priority_parses_from_wire_string() {
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!("urgent".parse::<Priority>().is_err());
    }

    #[test]
    fn user_created_records_get_distinct_ids() {
        let now = Utc::now();
        let a = TodoRecord::user_created(
            NonEmptyText::new("Order leaflets").unwrap(),
            String::new(),
            Priority::Low,
            now,
        );
        let b = TodoRecord::user_created(
            NonEmptyText::new("Order leaflets").unwrap(),
            String::new(),
            Priority::Low,
            now,
        );
        assert_ne!(a.id, b.id);
        assert!(!a.is_system_generated);
    }

    #[test]
    fn round_trips_list_with_patient_reference() {
        let record = TodoRecord::system_generated(
            "complete-profile:uid-p1".to_string(),
            NonEmptyText::new("Complete profile for Ravi Kumar").unwrap(),
            "Fill in the remaining intake fields".to_string(),
            Priority::High,
            Utc::now(),
        )
        .for_patient(
            Identity::parse("uid-p1").unwrap(),
            NonEmptyText::new("Ravi Kumar").unwrap(),
        );

        let json = TodoList::render(&[record.clone()]).expect("render todos");
        assert!(json.contains("\"isSystemGenerated\":true"));
        assert!(json.contains("\"patientId\":\"uid-p1\""));

        let reparsed = TodoList::parse(&json).expect("reparse todos");
        assert_eq!(reparsed, vec![record]);
    }

    #[test]
    fn update_toggles_completion_only() {
        let mut record = TodoRecord::user_created(
            NonEmptyText::new("Call the clinic").unwrap(),
            "Confirm Friday slots".to_string(),
            Priority::Medium,
            Utc::now(),
        );

        TodoUpdate {
            is_completed: Some(true),
            ..Default::default()
        }
        .apply(&mut record);

        assert!(record.is_completed);
        assert_eq!(record.priority, Priority::Medium);
        assert_eq!(record.description, "Confirm Friday slots");
    }
}

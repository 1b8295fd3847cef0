//! Generated diet plan wire models.
//!
//! Plans are produced by the external generation service; this core stores
//! them as documents and reads back the most recent one per patient. The
//! chart payload is deliberately opaque (recipes, meal slots, Ayurvedic
//! annotations) — this core renders it, it never interprets it.

use crate::{parse_with_path, RecordError, RecordResult};
use aahara_types::Identity;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A generated diet plan document.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DietPlan {
    #[serde(rename = "patientId")]
    pub patient_id: Identity,

    #[serde(rename = "generatedAt")]
    pub generated_at: DateTime<Utc>,

    /// Set by an explicit dietitian action; gates patient-side visibility.
    #[serde(default)]
    pub published: bool,

    /// Opaque chart payload from the generation service.
    pub chart: serde_json::Value,
}

impl DietPlan {
    /// Wraps a freshly generated chart payload, unpublished.
    pub fn new(patient_id: Identity, chart: serde_json::Value, now: DateTime<Utc>) -> Self {
        Self {
            patient_id,
            generated_at: now,
            published: false,
            chart,
        }
    }
}

/// Diet plan document operations.
pub struct Plan;

impl Plan {
    /// Parse a diet plan document from JSON text.
    pub fn parse(json_text: &str) -> RecordResult<DietPlan> {
        parse_with_path::<DietPlan>("Diet plan", json_text)
    }

    /// Render a diet plan document as pretty-printed JSON text.
    pub fn render(plan: &DietPlan) -> RecordResult<String> {
        serde_json::to_string_pretty(plan)
            .map_err(|e| RecordError::Translation(format!("Failed to serialise diet plan: {e}")))
    }
}

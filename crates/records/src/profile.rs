//! Clinical intake profile wire models and translation helpers.
//!
//! A clinical profile is a flat document keyed by patient identity. It is
//! created at assignment time with every clinical field null and filled in
//! later by the dietitian through intake flows. Each field is independently
//! nullable; profile completeness is a derived property computed in
//! `aahara-core`, never stored here.

use crate::{parse_with_path, RecordError, RecordResult};
use aahara_types::{Identity, NonEmptyText};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ============================================================================
// Public domain-level types
// ============================================================================

/// Patient gender as recorded at intake.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    Other,
}

/// Daily activity level.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityLevel {
    Sedentary,
    Light,
    Moderate,
    Active,
    VeryActive,
}

/// Dietary preference category.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FoodPreference {
    Vegetarian,
    NonVegetarian,
    Eggetarian,
    Vegan,
}

/// Three-way Ayurvedic assessment answer.
///
/// Body frame, skin type and hair type are each assessed as one of three
/// constitution-aligned options; the intake form labels them `a`, `b`, `c`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssessmentOption {
    A,
    B,
    C,
}

/// Digestive fire (agni) strength classification.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AgniStrength {
    Sama,
    Tikshna,
    Manda,
    Vishama,
}

/// Season in the Ayurvedic calendar at the time of assessment.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Season {
    Spring,
    Summer,
    Monsoon,
    Autumn,
    Winter,
    LateWinter,
}

/// Whether the patient is actively under care.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActiveStatus {
    #[serde(rename = "active")]
    Active,
    #[serde(rename = "not active")]
    NotActive,
}

/// A clinical intake profile document.
///
/// Wire field names follow the source document store: clinical fields are
/// snake_case, linkage and metadata fields are camelCase.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ClinicalProfile {
    /// Patient display name, copied from the account at creation.
    pub name: NonEmptyText,

    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<u16>,
    pub height_cm: Option<u16>,
    pub activity_level: Option<ActivityLevel>,
    pub food_preference: Option<FoodPreference>,
    pub cuisine_preference: Option<String>,
    pub sub_cuisine_preference: Option<String>,

    /// Known conditions. Informative only; never gates completeness.
    #[serde(default)]
    pub diseases: Vec<String>,

    pub body_frame: Option<AssessmentOption>,
    pub skin_type: Option<AssessmentOption>,
    pub hair_type: Option<AssessmentOption>,
    pub agni_strength: Option<AgniStrength>,
    pub current_season: Option<Season>,

    #[serde(rename = "assignedDietitianId")]
    pub assigned_dietitian_id: Identity,

    #[serde(rename = "activeStatus")]
    pub active_status: ActiveStatus,

    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,

    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl ClinicalProfile {
    /// Creates the profile document written at assignment time.
    ///
    /// Every clinical field is null; only the name, the assigning dietitian
    /// and the active status are set.
    pub fn unassessed(name: NonEmptyText, dietitian_id: Identity, now: DateTime<Utc>) -> Self {
        Self {
            name,
            age: None,
            gender: None,
            weight_kg: None,
            height_cm: None,
            activity_level: None,
            food_preference: None,
            cuisine_preference: None,
            sub_cuisine_preference: None,
            diseases: Vec::new(),
            body_frame: None,
            skin_type: None,
            hair_type: None,
            agni_strength: None,
            current_season: None,
            assigned_dietitian_id: dietitian_id,
            active_status: ActiveStatus::Active,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A partial intake update.
///
/// Fields left as `None` are unchanged; the profile-edit flow sends only the
/// fields the dietitian touched. Clearing a recorded value back to null is
/// not expressible through this update, matching the intake form behaviour.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ProfileUpdate {
    pub age: Option<u8>,
    pub gender: Option<Gender>,
    pub weight_kg: Option<u16>,
    pub height_cm: Option<u16>,
    pub activity_level: Option<ActivityLevel>,
    pub food_preference: Option<FoodPreference>,
    pub cuisine_preference: Option<String>,
    pub sub_cuisine_preference: Option<String>,
    pub diseases: Option<Vec<String>>,
    pub body_frame: Option<AssessmentOption>,
    pub skin_type: Option<AssessmentOption>,
    pub hair_type: Option<AssessmentOption>,
    pub agni_strength: Option<AgniStrength>,
    pub current_season: Option<Season>,
    #[serde(rename = "activeStatus")]
    pub active_status: Option<ActiveStatus>,
}

impl ProfileUpdate {
    /// Applies the populated fields to `profile` and touches `updatedAt`.
    pub fn apply(self, profile: &mut ClinicalProfile, now: DateTime<Utc>) {
        if let Some(age) = self.age {
            profile.age = Some(age);
        }
        if let Some(gender) = self.gender {
            profile.gender = Some(gender);
        }
        if let Some(weight_kg) = self.weight_kg {
            profile.weight_kg = Some(weight_kg);
        }
        if let Some(height_cm) = self.height_cm {
            profile.height_cm = Some(height_cm);
        }
        if let Some(activity_level) = self.activity_level {
            profile.activity_level = Some(activity_level);
        }
        if let Some(food_preference) = self.food_preference {
            profile.food_preference = Some(food_preference);
        }
        if let Some(cuisine_preference) = self.cuisine_preference {
            profile.cuisine_preference = Some(cuisine_preference);
        }
        if let Some(sub_cuisine_preference) = self.sub_cuisine_preference {
            profile.sub_cuisine_preference = Some(sub_cuisine_preference);
        }
        if let Some(diseases) = self.diseases {
            profile.diseases = diseases;
        }
        if let Some(body_frame) = self.body_frame {
            profile.body_frame = Some(body_frame);
        }
        if let Some(skin_type) = self.skin_type {
            profile.skin_type = Some(skin_type);
        }
        if let Some(hair_type) = self.hair_type {
            profile.hair_type = Some(hair_type);
        }
        if let Some(agni_strength) = self.agni_strength {
            profile.agni_strength = Some(agni_strength);
        }
        if let Some(current_season) = self.current_season {
            profile.current_season = Some(current_season);
        }
        if let Some(active_status) = self.active_status {
            profile.active_status = active_status;
        }
        profile.updated_at = now;
    }
}

// ============================================================================
// Public Profile operations
// ============================================================================

/// Clinical profile document operations.
pub struct Profile;

impl Profile {
    /// Parse a clinical profile document from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`RecordError`] if the JSON does not represent a valid profile
    /// document, any field has an unexpected type, or unknown keys are present.
    pub fn parse(json_text: &str) -> RecordResult<ClinicalProfile> {
        parse_with_path::<ClinicalProfile>("Clinical profile", json_text)
    }

    /// Render a clinical profile document as pretty-printed JSON text.
    pub fn render(profile: &ClinicalProfile) -> RecordResult<String> {
        serde_json::to_string_pretty(profile)
            .map_err(|e| RecordError::Translation(format!("Failed to serialise profile: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unassessed() -> ClinicalProfile {
        ClinicalProfile::unassessed(
            NonEmptyText::new("Ravi Kumar").unwrap(),
            Identity::parse("uid-d1").unwrap(),
            Utc::now(),
        )
    }

    #[test]
    fn unassessed_profile_has_all_clinical_fields_null() {
        let profile = unassessed();
        assert_eq!(profile.age, None);
        assert_eq!(profile.gender, None);
        assert_eq!(profile.weight_kg, None);
        assert_eq!(profile.height_cm, None);
        assert_eq!(profile.activity_level, None);
        assert_eq!(profile.food_preference, None);
        assert_eq!(profile.cuisine_preference, None);
        assert_eq!(profile.body_frame, None);
        assert_eq!(profile.skin_type, None);
        assert_eq!(profile.hair_type, None);
        assert_eq!(profile.agni_strength, None);
        assert_eq!(profile.current_season, None);
        assert!(profile.diseases.is_empty());
        assert_eq!(profile.active_status, ActiveStatus::Active);
    }

    #[test]
    fn update_applies_only_populated_fields() {
        let mut profile = unassessed();
        let created = profile.updated_at;

        let update = ProfileUpdate {
            age: Some(34),
            agni_strength: Some(AgniStrength::Manda),
            ..Default::default()
        };
        let later = created + chrono::Duration::seconds(5);
        update.apply(&mut profile, later);

        assert_eq!(profile.age, Some(34));
        assert_eq!(profile.agni_strength, Some(AgniStrength::Manda));
        assert_eq!(profile.gender, None, "untouched fields stay null");
        assert_eq!(profile.updated_at, later);
        assert_eq!(profile.created_at, created);
    }

    #[test]
    fn round_trips_sample_json() {
        let mut profile = unassessed();
        profile.age = Some(41);
        profile.gender = Some(Gender::Female);
        profile.current_season = Some(Season::LateWinter);
        profile.active_status = ActiveStatus::NotActive;
        profile.diseases = vec!["hypertension".to_string()];

        let json = Profile::render(&profile).expect("render profile");
        assert!(json.contains("\"late_winter\""));
        assert!(json.contains("\"not active\""));

        let reparsed = Profile::parse(&json).expect("reparse profile");
        assert_eq!(profile, reparsed);
    }

    #[test]
    fn parse_rejects_unknown_season() {
        let mut profile = unassessed();
        profile.current_season = Some(Season::Monsoon);
        let json = Profile::render(&profile)
            .expect("render profile")
            .replace("monsoon", "midsummer");

        let err = Profile::parse(&json).expect_err("unknown season should fail");
        assert!(err.to_string().contains("current_season"));
    }
}

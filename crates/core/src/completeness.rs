//! Profile completeness evaluation.
//!
//! Completeness is a derived view over a clinical profile's required fields,
//! recomputed on every evaluation and never cached: it gates diet-plan
//! generation and drives the synthesizer's per-patient reminders, both of
//! which must see profile mutations immediately.

use records::ClinicalProfile;

/// The intake fields a profile must have before a diet plan can be generated.
///
/// `diseases` and `sub_cuisine_preference` are informative only and never
/// appear here.
const REQUIRED_FIELDS: [&str; 12] = [
    "age",
    "gender",
    "weight_kg",
    "height_cm",
    "activity_level",
    "food_preference",
    "cuisine_preference",
    "body_frame",
    "skin_type",
    "hair_type",
    "agni_strength",
    "current_season",
];

/// Returns the names of required fields still unset on `profile`.
///
/// An absent profile is missing everything.
pub fn missing_fields(profile: Option<&ClinicalProfile>) -> Vec<&'static str> {
    let Some(profile) = profile else {
        return REQUIRED_FIELDS.to_vec();
    };

    let unset = [
        profile.age.is_none(),
        profile.gender.is_none(),
        profile.weight_kg.is_none(),
        profile.height_cm.is_none(),
        profile.activity_level.is_none(),
        profile.food_preference.is_none(),
        profile.cuisine_preference.is_none(),
        profile.body_frame.is_none(),
        profile.skin_type.is_none(),
        profile.hair_type.is_none(),
        profile.agni_strength.is_none(),
        profile.current_season.is_none(),
    ];

    REQUIRED_FIELDS
        .iter()
        .zip(unset)
        .filter_map(|(name, missing)| missing.then_some(*name))
        .collect()
}

/// Whether `profile` satisfies the minimum field set for diet-plan generation.
///
/// Pure: depends only on the required fields above.
pub fn is_complete(profile: Option<&ClinicalProfile>) -> bool {
    missing_fields(profile).is_empty()
}

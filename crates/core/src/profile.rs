//! User-declared skin profile.
//!
//! Profile values are free-form strings. The vocabularies below only drive
//! dashboard choices; the API never validates against them.

use serde::{Deserialize, Serialize};

pub const DEFAULT_SKIN_TYPE: &str = "any";
pub const DEFAULT_FITZPATRICK: &str = "unspecified";
pub const DEFAULT_ETHNICITY: &str = "unspecified";

/// Label returned when no model artifact is loaded.
pub const FALLBACK_CONDITION: &str = "normal";

pub const SKIN_TYPES: &[&str] = &["any", "oily", "dry", "combination", "sensitive", "normal"];

pub const FITZPATRICK_TYPES: &[&str] = &["unspecified", "I", "II", "III", "IV", "V", "VI"];

pub const ETHNICITIES: &[&str] = &[
    "unspecified",
    "west_african",
    "east_african",
    "north_african",
    "afro_caribbean",
    "afro_european",
    "south_asian",
    "south_east_asian",
    "mixed_african_asian",
    "other",
];

/// Conditions offered as corrections in the feedback forms.
pub const CORRECTABLE_CONDITIONS: &[&str] =
    &["acne", "rosacea", "dermatitis", "hyperpigmentation", "normal"];

/// Profile fields echoed back by `/analyze` and stored on the record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkinProfile {
    pub skin_type: String,
    pub fitzpatrick: String,
    pub ethnicity: String,
}

impl SkinProfile {
    /// Build a profile, substituting defaults for absent fields.
    pub fn with_defaults(
        skin_type: Option<String>,
        fitzpatrick: Option<String>,
        ethnicity: Option<String>,
    ) -> Self {
        Self {
            skin_type: skin_type.unwrap_or_else(|| DEFAULT_SKIN_TYPE.to_string()),
            fitzpatrick: fitzpatrick.unwrap_or_else(|| DEFAULT_FITZPATRICK.to_string()),
            ethnicity: ethnicity.unwrap_or_else(|| DEFAULT_ETHNICITY.to_string()),
        }
    }
}

impl Default for SkinProfile {
    fn default() -> Self {
        Self::with_defaults(None, None, None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_fill_missing_fields() {
        let p = SkinProfile::with_defaults(Some("oily".into()), None, None);
        assert_eq!(p.skin_type, "oily");
        assert_eq!(p.fitzpatrick, "unspecified");
        assert_eq!(p.ethnicity, "unspecified");
    }

    #[test]
    fn default_profile_matches_constants() {
        let p = SkinProfile::default();
        assert_eq!(p.skin_type, DEFAULT_SKIN_TYPE);
        assert!(SKIN_TYPES.contains(&p.skin_type.as_str()));
        assert!(FITZPATRICK_TYPES.contains(&p.fitzpatrick.as_str()));
        assert!(ETHNICITIES.contains(&p.ethnicity.as_str()));
    }
}

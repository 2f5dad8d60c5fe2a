//! Feedback state carried by inference records.
//!
//! The correctness flag is tri-state. It is stored as a nullable integer
//! and rendered in JSON as `null` / `true` / `false`.

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::CoreError;

/// User verdict on a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Correctness {
    /// No feedback submitted yet.
    #[default]
    Unset,
    /// The user confirmed the prediction.
    Correct,
    /// The user reported the prediction as wrong.
    Incorrect,
}

impl Correctness {
    pub fn from_flag(is_correct: bool) -> Self {
        if is_correct {
            Self::Correct
        } else {
            Self::Incorrect
        }
    }

    /// Nullable-boolean form used for storage and JSON.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::Unset => None,
            Self::Correct => Some(true),
            Self::Incorrect => Some(false),
        }
    }

    /// Whether this record counts as ground truth for the dataset builder.
    pub fn is_confirmed(self) -> bool {
        self == Self::Correct
    }
}

impl From<Option<bool>> for Correctness {
    fn from(flag: Option<bool>) -> Self {
        match flag {
            None => Self::Unset,
            Some(b) => Self::from_flag(b),
        }
    }
}

impl Serialize for Correctness {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.as_flag().serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for Correctness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<bool>::deserialize(deserializer).map(Self::from)
    }
}

/// Parse a form-encoded boolean.
///
/// Accepts `true/false`, `1/0`, `yes/no` and `on/off`, case-insensitively.
pub fn parse_form_bool(value: &str) -> Result<bool, CoreError> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "on" => Ok(true),
        "false" | "0" | "no" | "off" => Ok(false),
        other => Err(CoreError::Validation(format!(
            "Invalid boolean value '{other}'"
        ))),
    }
}

/// Filter applied to the admin listing on the `needs_review` flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewFilter {
    #[default]
    All,
    NeedsReview,
    /// Records whose `needs_review` flag is unset. This includes records
    /// nobody has looked at yet.
    NotFlagged,
}

impl ReviewFilter {
    /// Parse the `needs_review` query parameter (`"true"`, `"false"` or absent).
    pub fn parse(raw: Option<&str>) -> Result<Self, CoreError> {
        match raw {
            None | Some("") => Ok(Self::All),
            Some("true") => Ok(Self::NeedsReview),
            Some("false") => Ok(Self::NotFlagged),
            Some(other) => Err(CoreError::Validation(format!(
                "needs_review must be 'true' or 'false', got '{other}'"
            ))),
        }
    }

    /// The flag value to match, or `None` for no filtering.
    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::NeedsReview => Some(true),
            Self::NotFlagged => Some(false),
        }
    }
}

/// Treat blank optional form fields as absent.
pub fn non_blank(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

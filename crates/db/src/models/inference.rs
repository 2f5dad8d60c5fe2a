//! Inference record entity model and DTOs.

use serde::Serialize;
use skinai_core::feedback::Correctness;
use skinai_core::profile::SkinProfile;
use skinai_core::types::{InferenceId, Timestamp};
use sqlx::types::Json;
use sqlx::FromRow;

/// A row from the `inferences` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct InferenceRecord {
    pub id: InferenceId,
    pub image_path: String,
    pub created_at: Timestamp,
    pub predicted_condition: String,
    pub predicted_confidence: Option<f64>,
    pub user_skin_type: Option<String>,
    pub user_fitzpatrick: Option<String>,
    pub user_ethnicity: Option<String>,
    pub predictions_json: Option<Json<serde_json::Value>>,
    #[sqlx(try_from = "Option<bool>")]
    pub is_correct: Correctness,
    pub corrected_condition: Option<String>,
    pub notes: Option<String>,
    pub needs_review: bool,
}

impl InferenceRecord {
    /// Label used as ground truth: the correction if given, else the prediction.
    pub fn authoritative_label(&self) -> &str {
        self.corrected_condition
            .as_deref()
            .unwrap_or(&self.predicted_condition)
    }
}

/// DTO for inserting a record after a successful analysis.
#[derive(Debug, Clone)]
pub struct CreateInference {
    pub id: InferenceId,
    pub image_path: String,
    pub predicted_condition: String,
    pub predicted_confidence: f64,
    pub profile: SkinProfile,
}

impl CreateInference {
    /// Structured prediction payload stored alongside the scalar columns.
    pub fn predictions_json(&self) -> serde_json::Value {
        serde_json::json!({
            "condition": self.predicted_condition,
            "confidence": self.predicted_confidence,
        })
    }
}

/// DTO for a feedback submission.
#[derive(Debug, Clone)]
pub struct FeedbackUpdate {
    pub is_correct: bool,
    /// Only stored when `is_correct` is false.
    pub corrected_condition: Option<String>,
    /// Replaces existing notes when present.
    pub notes: Option<String>,
}

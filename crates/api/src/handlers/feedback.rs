//! Handler for `POST /feedback`.

use axum::extract::rejection::FormRejection;
use axum::extract::State;
use axum::{Form, Json};
use serde::{Deserialize, Serialize};
use skinai_core::error::CoreError;
use skinai_core::feedback::{non_blank, parse_form_bool};
use skinai_core::types::is_valid_inference_id;
use skinai_db::models::inference::FeedbackUpdate;
use skinai_db::repositories::InferenceRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Form body for a feedback submission.
#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub inference_id: String,
    /// Parsed with [`parse_form_bool`].
    pub is_correct: String,
    pub corrected_condition: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct FeedbackResponse {
    pub ok: bool,
}

/// POST /feedback
///
/// Records whether the prediction was right. A negative verdict also stores
/// the corrected label and flags the record for review. Resubmitting
/// overwrites the previous verdict.
pub async fn submit(
    State(state): State<AppState>,
    form: Result<Form<FeedbackForm>, FormRejection>,
) -> AppResult<Json<FeedbackResponse>> {
    let Form(form) = form.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let is_correct = parse_form_bool(&form.is_correct)?;
    let id = form.inference_id.trim();

    let not_found = || CoreError::NotFound {
        entity: "Inference record",
        id: id.to_string(),
    };

    if !is_valid_inference_id(id) {
        return Err(not_found().into());
    }

    let update = FeedbackUpdate {
        is_correct,
        corrected_condition: non_blank(form.corrected_condition),
        notes: non_blank(form.notes),
    };

    let record = InferenceRepo::apply_feedback(&state.pool, id, &update)
        .await?
        .ok_or_else(not_found)?;

    tracing::info!(
        inference_id = %record.id,
        is_correct,
        corrected_condition = ?record.corrected_condition,
        "Feedback recorded",
    );

    Ok(Json(FeedbackResponse { ok: true }))
}

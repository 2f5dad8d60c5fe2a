//! Handler for `POST /analyze`.

use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, State};
use axum::Json;
use serde::Serialize;
use skinai_core::feedback::non_blank;
use skinai_core::profile::SkinProfile;
use skinai_core::types::{new_inference_id, InferenceId};
use skinai_core::upload::{stored_file_name, validate_content_type, validate_size};
use skinai_db::models::inference::CreateInference;
use skinai_db::repositories::InferenceRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

/// Response body for a successful analysis.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub inference_id: InferenceId,
    pub condition: String,
    pub confidence: f64,
    #[serde(flatten)]
    pub profile: SkinProfile,
}

/// The `file` part of the multipart body.
struct UploadedFile {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

/// POST /analyze
///
/// Accepts a multipart body with a `file` part and optional `skin_type`,
/// `fitzpatrick` and `ethnicity` text parts. Runs the classifier, stores the
/// image under the new inference id and inserts the record.
pub async fn analyze(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> AppResult<Json<AnalyzeResponse>> {
    let mut upload: Option<UploadedFile> = None;
    let mut skin_type: Option<String> = None;
    let mut fitzpatrick: Option<String> = None;
    let mut ethnicity: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "file" => {
                let file_name = field.file_name().map(str::to_string);
                let content_type = field.content_type().map(str::to_string);
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                upload = Some(UploadedFile {
                    file_name,
                    content_type,
                    data,
                });
            }
            "skin_type" => skin_type = Some(read_text(field).await?),
            "fitzpatrick" => fitzpatrick = Some(read_text(field).await?),
            "ethnicity" => ethnicity = Some(read_text(field).await?),
            _ => {}
        }
    }

    let upload = upload.ok_or_else(|| AppError::BadRequest("Missing 'file' field".into()))?;
    validate_content_type(upload.content_type.as_deref())?;
    validate_size(upload.data.len())?;

    let profile = SkinProfile::with_defaults(
        non_blank(skin_type),
        non_blank(fitzpatrick),
        non_blank(ethnicity),
    );

    let classifier = Arc::clone(&state.classifier);
    let image = upload.data.clone();
    let prediction = tokio::task::spawn_blocking(move || classifier.predict(&image))
        .await
        .map_err(|e| AppError::InternalError(format!("Prediction task failed: {e}")))??;

    let id = new_inference_id();
    let file_name = stored_file_name(
        &id,
        upload.file_name.as_deref(),
        upload.content_type.as_deref(),
    );
    let path = state
        .uploads
        .save(&file_name, &upload.data)
        .await
        .map_err(|e| AppError::InternalError(format!("Failed to store upload: {e}")))?;

    let input = CreateInference {
        id,
        image_path: path.display().to_string(),
        predicted_condition: prediction.label,
        predicted_confidence: prediction.confidence,
        profile,
    };

    let record = match InferenceRepo::create(&state.pool, &input).await {
        Ok(record) => record,
        Err(e) => {
            state.uploads.remove(&path).await;
            return Err(e.into());
        }
    };

    tracing::info!(
        inference_id = %record.id,
        condition = %record.predicted_condition,
        confidence = input.predicted_confidence,
        bytes = upload.data.len(),
        "Image analyzed",
    );

    Ok(Json(AnalyzeResponse {
        inference_id: record.id,
        condition: input.predicted_condition,
        confidence: input.predicted_confidence,
        profile: input.profile,
    }))
}

async fn read_text(field: axum::extract::multipart::Field<'_>) -> AppResult<String> {
    field
        .text()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

//! User-facing page: upload a photo, see the prediction, send feedback.
//!
//! ```text
//! GET  /          upload form
//! POST /analyze   forward the upload to the API, render the result
//! POST /feedback  forward feedback, render a confirmation
//! ```

use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::response::Html;
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use skinai_core::feedback::{non_blank, parse_form_bool};
use skinai_core::profile::{
    SkinProfile, CORRECTABLE_CONDITIONS, ETHNICITIES, FITZPATRICK_TYPES, SKIN_TYPES,
};
use skinai_core::upload::MAX_UPLOAD_BYTES;
use tower_http::trace::TraceLayer;

use crate::client::{AnalyzeResult, FeedbackSubmission, ImageUpload};
use crate::error::{DashboardError, DashboardResult};
use crate::html::{self, escape, select};
use crate::state::DashboardState;

const TITLE: &str = "Skin AI Assistant";

pub fn router(state: DashboardState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/analyze", post(analyze))
        .route("/feedback", post(feedback))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES + 1024 * 1024))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn index(State(state): State<DashboardState>) -> DashboardResult<Html<String>> {
    state.api.health().await?;
    Ok(html::page(TITLE, &upload_form(&SkinProfile::default())))
}

fn upload_form(profile: &SkinProfile) -> String {
    format!(
        "<form method=\"post\" action=\"/analyze\" enctype=\"multipart/form-data\">\
         <label>Photo <input type=\"file\" name=\"file\" accept=\"image/*\" required></label>\
         <label>Skin type {}</label>\
         <label>Fitzpatrick type {}</label>\
         <label>Ethnicity {}</label>\
         <button type=\"submit\">Analyze</button></form>",
        select("skin_type", SKIN_TYPES, Some(profile.skin_type.as_str())),
        select("fitzpatrick", FITZPATRICK_TYPES, Some(profile.fitzpatrick.as_str())),
        select("ethnicity", ETHNICITIES, Some(profile.ethnicity.as_str())),
    )
}

async fn analyze(
    State(state): State<DashboardState>,
    mut multipart: Multipart,
) -> DashboardResult<Html<String>> {
    let mut upload: Option<ImageUpload> = None;
    let mut fields: [Option<String>; 3] = Default::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| DashboardError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        let slot = match name.as_str() {
            "file" => {
                let file_name = field.file_name().unwrap_or("upload").to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| DashboardError::BadRequest(e.to_string()))?;
                upload = Some(ImageUpload {
                    file_name,
                    content_type,
                    data: data.to_vec(),
                });
                continue;
            }
            "skin_type" => 0,
            "fitzpatrick" => 1,
            "ethnicity" => 2,
            _ => continue,
        };
        fields[slot] = Some(
            field
                .text()
                .await
                .map_err(|e| DashboardError::BadRequest(e.to_string()))?,
        );
    }

    let upload = upload.ok_or_else(|| DashboardError::BadRequest("Choose a photo first".into()))?;
    let [skin_type, fitzpatrick, ethnicity] = fields;
    let profile = SkinProfile::with_defaults(
        non_blank(skin_type),
        non_blank(fitzpatrick),
        non_blank(ethnicity),
    );

    let result = state.api.analyze(upload, &profile).await?;
    tracing::info!(inference_id = %result.inference_id, condition = %result.condition, "Analysis shown");
    Ok(html::page(TITLE, &result_view(&result)))
}

fn result_view(result: &AnalyzeResult) -> String {
    let mut corrections = vec![""];
    corrections.extend_from_slice(CORRECTABLE_CONDITIONS);

    format!(
        "<h2>Result</h2>\
         <p>Condition: <strong>{condition}</strong> ({confidence:.1}% confidence)</p>\
         <p>Skin type: {skin_type} | Fitzpatrick: {fitzpatrick} | Ethnicity: {ethnicity}</p>\
         <h2>Was this right?</h2>\
         <form method=\"post\" action=\"/feedback\">\
         <input type=\"hidden\" name=\"inference_id\" value=\"{id}\">\
         <label><input type=\"radio\" name=\"is_correct\" value=\"true\" checked> Yes</label>\
         <label><input type=\"radio\" name=\"is_correct\" value=\"false\"> No</label>\
         <label>If not, what is it? {corrections}</label>\
         <button type=\"submit\">Send feedback</button></form>\
         <p><a href=\"/\">Analyze another photo</a></p>",
        condition = escape(&result.condition),
        confidence = result.confidence * 100.0,
        skin_type = escape(&result.profile.skin_type),
        fitzpatrick = escape(&result.profile.fitzpatrick),
        ethnicity = escape(&result.profile.ethnicity),
        id = escape(&result.inference_id),
        corrections = select("corrected_condition", &corrections, None),
    )
}

#[derive(Debug, Deserialize)]
pub struct FeedbackForm {
    pub inference_id: String,
    pub is_correct: String,
    pub corrected_condition: Option<String>,
}

async fn feedback(
    State(state): State<DashboardState>,
    Form(form): Form<FeedbackForm>,
) -> DashboardResult<Html<String>> {
    let is_correct = parse_form_bool(&form.is_correct)
        .map_err(|e| DashboardError::BadRequest(e.to_string()))?;

    let submission = FeedbackSubmission {
        inference_id: form.inference_id,
        is_correct,
        corrected_condition: non_blank(form.corrected_condition).unwrap_or_default(),
        notes: None,
    };
    state.api.submit_feedback(&submission).await?;

    Ok(html::page(
        TITLE,
        "<p class=\"ok\">Thanks, your feedback was recorded.</p><p><a href=\"/\">Analyze another photo</a></p>",
    ))
}

//! Admin review page.
//!
//! ```text
//! GET  /               record table, `?needs_review=all|yes|no`
//! POST /review         forward a verdict to the API, redirect back
//! GET  /images/{file}  stored uploads
//! ```

use std::path::Path;

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum::routing::{get, post};
use axum::{Form, Router};
use serde::Deserialize;
use skinai_core::feedback::{non_blank, Correctness};
use skinai_core::profile::CORRECTABLE_CONDITIONS;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use crate::client::{FeedbackSubmission, InferenceRow};
use crate::error::{DashboardError, DashboardResult};
use crate::html::{self, escape, or_dash, select};
use crate::state::DashboardState;

const TITLE: &str = "Skin AI Admin";

/// Records shown per page.
pub const PAGE_LIMIT: u32 = 100;

pub fn router(state: DashboardState) -> Router {
    let images = ServeDir::new(state.config.upload_dir.clone());
    Router::new()
        .route("/", get(index))
        .route("/review", post(review))
        .nest_service("/images", images)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Admin filter on the review flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReviewChoice {
    #[default]
    All,
    Yes,
    No,
}

impl ReviewChoice {
    pub fn parse(raw: Option<&str>) -> Self {
        match raw.map(str::to_ascii_lowercase).as_deref() {
            Some("yes") => Self::Yes,
            Some("no") => Self::No,
            _ => Self::All,
        }
    }

    pub fn as_flag(self) -> Option<bool> {
        match self {
            Self::All => None,
            Self::Yes => Some(true),
            Self::No => Some(false),
        }
    }

    fn as_str(self) -> &'static str {
        match self {
            Self::All => "all",
            Self::Yes => "yes",
            Self::No => "no",
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct IndexParams {
    pub needs_review: Option<String>,
}

async fn index(
    State(state): State<DashboardState>,
    Query(params): Query<IndexParams>,
) -> DashboardResult<Html<String>> {
    let choice = ReviewChoice::parse(params.needs_review.as_deref());
    let rows = state.api.list_inferences(PAGE_LIMIT, choice.as_flag()).await?;

    let mut body = format!(
        "<p>Backend: {}</p>\
         <form method=\"get\" action=\"/\"><label>Needs review? {}</label>\
         <button type=\"submit\">Filter</button></form>\
         <p>Found <strong>{}</strong> inference records.</p>",
        escape(state.api.api_url()),
        select("needs_review", &["all", "yes", "no"], Some(choice.as_str())),
        rows.len(),
    );

    body.push_str(
        "<table><tr><th>Image</th><th>Record</th><th>Prediction</th><th>Profile</th>\
         <th>Feedback</th><th>Review</th></tr>",
    );
    for row in &rows {
        body.push_str(&render_row(row));
    }
    body.push_str("</table>");

    Ok(html::page(TITLE, &body))
}

/// Link target for a stored image, by file name only.
pub fn image_href(image_path: &str) -> Option<String> {
    Path::new(image_path)
        .file_name()
        .map(|name| format!("/images/{}", escape(&name.to_string_lossy())))
}

fn render_row(row: &InferenceRow) -> String {
    let image = match image_href(&row.image_path) {
        Some(href) => format!("<a href=\"{href}\"><img class=\"thumb\" src=\"{href}\" alt=\"\"></a>"),
        None => "-".to_string(),
    };
    let confidence = row
        .predicted_confidence
        .map(|c| format!("{:.1}%", c * 100.0))
        .unwrap_or_else(|| "-".into());
    let verdict = match row.is_correct {
        Correctness::Unset => "unknown",
        Correctness::Correct => "correct",
        Correctness::Incorrect => "incorrect",
    };

    let mut corrections = vec![""];
    corrections.extend_from_slice(CORRECTABLE_CONDITIONS);

    format!(
        "<tr><td>{image}</td>\
         <td><code>{id}</code><br>{created}</td>\
         <td>{predicted} ({confidence})</td>\
         <td>skin: {skin}<br>fitzpatrick: {fitz}<br>ethnicity: {eth}</td>\
         <td>{verdict}<br>corrected: {corrected}<br>needs review: {needs_review}<br>notes: {notes}</td>\
         <td><form method=\"post\" action=\"/review\">\
         <input type=\"hidden\" name=\"inference_id\" value=\"{id}\">\
         {verdict_select} {correction_select}\
         <button type=\"submit\">Save review</button></form></td></tr>",
        id = escape(&row.id),
        created = escape(&row.created_at),
        predicted = escape(&row.predicted_condition),
        skin = or_dash(row.user_skin_type.as_deref()),
        fitz = or_dash(row.user_fitzpatrick.as_deref()),
        eth = or_dash(row.user_ethnicity.as_deref()),
        corrected = or_dash(row.corrected_condition.as_deref()),
        needs_review = row.needs_review,
        notes = or_dash(row.notes.as_deref()),
        verdict_select = select("verdict", &["unknown", "correct", "incorrect"], Some("unknown")),
        correction_select = select(
            "corrected_condition",
            &corrections,
            row.corrected_condition.as_deref()
        ),
    )
}

#[derive(Debug, Deserialize)]
pub struct ReviewForm {
    pub inference_id: String,
    pub verdict: String,
    pub corrected_condition: Option<String>,
}

async fn review(
    State(state): State<DashboardState>,
    Form(form): Form<ReviewForm>,
) -> DashboardResult<Redirect> {
    let is_correct = match form.verdict.as_str() {
        "correct" => true,
        "incorrect" => false,
        _ => {
            return Err(DashboardError::BadRequest(
                "Mark as Correct or Incorrect before saving.".into(),
            ))
        }
    };

    let submission = FeedbackSubmission {
        inference_id: form.inference_id,
        is_correct,
        corrected_condition: non_blank(form.corrected_condition).unwrap_or_default(),
        notes: None,
    };
    state.api.submit_feedback(&submission).await?;
    tracing::info!(inference_id = %submission.inference_id, is_correct, "Review saved");

    Ok(Redirect::to("/"))
}

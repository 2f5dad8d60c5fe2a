//! Handler for `GET /admin/inferences`.

use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use skinai_core::feedback::ReviewFilter;
use skinai_db::models::inference::InferenceRecord;
use skinai_db::repositories::InferenceRepo;

use crate::error::{AppError, AppResult};
use crate::state::AppState;

pub const DEFAULT_LIST_LIMIT: i64 = 100;
pub const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub limit: Option<i64>,
    pub needs_review: Option<String>,
}

/// GET /admin/inferences?limit=&needs_review=
///
/// Newest records first, optionally filtered on the review flag.
pub async fn list_inferences(
    State(state): State<AppState>,
    params: Result<Query<ListParams>, QueryRejection>,
) -> AppResult<Json<Vec<InferenceRecord>>> {
    let Query(params) = params.map_err(|rejection| AppError::BadRequest(rejection.body_text()))?;

    let limit = params.limit.unwrap_or(DEFAULT_LIST_LIMIT);
    if !(1..=MAX_LIST_LIMIT).contains(&limit) {
        return Err(AppError::BadRequest(format!(
            "Limit must be between 1 and {MAX_LIST_LIMIT}"
        )));
    }
    let filter = ReviewFilter::parse(params.needs_review.as_deref())?;

    let records = InferenceRepo::list(&state.pool, filter.as_flag(), limit).await?;
    Ok(Json(records))
}

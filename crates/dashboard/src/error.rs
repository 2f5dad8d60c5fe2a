use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::client::ApiClientError;
use crate::html;

/// Errors rendered as an HTML error page.
#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error(transparent)]
    Api(#[from] ApiClientError),

    #[error("{0}")]
    BadRequest(String),
}

pub type DashboardResult<T> = Result<T, DashboardError>;

impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            DashboardError::Api(err) if err.is_unreachable() => {
                tracing::warn!(error = %err, "Backend unreachable");
                (
                    StatusCode::BAD_GATEWAY,
                    "Cannot connect to the backend. It may still be starting up; refresh in a few seconds.".to_string(),
                )
            }
            DashboardError::Api(ApiClientError::ApiError { status, body }) => {
                let status = StatusCode::from_u16(*status)
                    .ok()
                    .filter(StatusCode::is_client_error)
                    .unwrap_or(StatusCode::BAD_GATEWAY);
                (status, format!("Backend returned an error: {}", api_message(body)))
            }
            DashboardError::Api(err) => {
                tracing::error!(error = %err, "Backend request failed");
                (StatusCode::BAD_GATEWAY, err.to_string())
            }
            DashboardError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
        };

        (status, html::error_page(&message)).into_response()
    }
}

/// Pull `error` out of a JSON error body, else return the body as-is.
fn api_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| v.get("error").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| body.to_string())
}

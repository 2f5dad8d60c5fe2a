use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;
use skinai_core::types::Timestamp;

use crate::state::AppState;

/// Name reported by the health endpoint.
pub const SERVICE_NAME: &str = "Skin AI Assistant API";

/// Health check response payload.
#[derive(Serialize)]
pub struct HealthResponse {
    /// Always `"ok"` while the process is serving requests.
    pub status: &'static str,
    pub service: &'static str,
    /// Crate version from Cargo.toml.
    pub version: &'static str,
    /// `false` when the classifier runs in fallback mode.
    pub model_loaded: bool,
    /// Whether the database is reachable. Informational only.
    pub db_healthy: bool,
    pub timestamp: Timestamp,
}

/// GET /health -- liveness plus model and database status.
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = skinai_db::health_check(&state.pool).await.is_ok();

    Json(HealthResponse {
        status: "ok",
        service: SERVICE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        model_loaded: state.classifier.model_loaded(),
        db_healthy,
        timestamp: chrono::Utc::now(),
    })
}

/// Mount health check routes.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

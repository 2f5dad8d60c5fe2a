pub mod admin;
pub mod health;
pub mod inference;

use axum::Router;

use crate::state::AppState;

/// All service routes. Mounted at the root; there is no version prefix.
///
/// ```text
/// GET  /health
/// POST /analyze
/// POST /feedback
/// GET  /admin/inferences
/// ```
pub fn app_routes() -> Router<AppState> {
    Router::new()
        .merge(health::router())
        .merge(inference::router())
        .nest("/admin", admin::router())
}

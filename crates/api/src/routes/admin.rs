//! Route definitions for the admin listing, nested under `/admin`.

use axum::routing::get;
use axum::Router;

use crate::handlers::admin;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/inferences", get(admin::list_inferences))
}

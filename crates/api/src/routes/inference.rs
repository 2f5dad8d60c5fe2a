//! Route definitions for analysis and feedback.
//!
//! ```text
//! POST /analyze    analyze::analyze   (multipart)
//! POST /feedback   feedback::submit   (form)
//! ```

use axum::routing::post;
use axum::Router;

use crate::handlers::{analyze, feedback};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/analyze", post(analyze::analyze))
        .route("/feedback", post(feedback::submit))
}

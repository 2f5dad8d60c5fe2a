use std::sync::Arc;

use skinai_model::Classifier;

use crate::config::ServerConfig;
use crate::storage::UploadStore;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable: everything is behind `Arc` or is already a pool handle.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: skinai_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Classifier loaded once at startup; immutable afterwards.
    pub classifier: Arc<dyn Classifier>,
    /// Where uploaded images are written.
    pub uploads: Arc<UploadStore>,
}

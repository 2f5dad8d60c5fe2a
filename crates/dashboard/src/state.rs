use std::sync::Arc;

use crate::client::ApiClient;
use crate::config::DashboardConfig;

/// Shared state for both dashboards.
#[derive(Clone)]
pub struct DashboardState {
    pub api: Arc<ApiClient>,
    pub config: Arc<DashboardConfig>,
}

impl DashboardState {
    pub fn new(config: DashboardConfig) -> Self {
        Self {
            api: Arc::new(ApiClient::new(config.api_url.clone())),
            config: Arc::new(config),
        }
    }
}

use std::path::PathBuf;

use skinai_core::paths::ServicePaths;

/// Dashboard configuration loaded from environment variables.
///
/// | Env Var          | Default                     |
/// |------------------|-----------------------------|
/// | `HOST`           | `0.0.0.0`                   |
/// | `<port_var>`     | first free port 8000-9000   |
/// | `SKINAI_API_URL` | `http://127.0.0.1:8000`     |
///
/// `port_var` is `UI_PORT` for the user page and `ADMIN_PORT` for the
/// admin page.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub host: String,
    pub port: u16,
    pub api_url: String,
    /// Where the API stores uploads; the admin page serves images from here.
    pub upload_dir: PathBuf,
}

pub const DEFAULT_API_URL: &str = "http://127.0.0.1:8000";

impl DashboardConfig {
    pub fn from_env(port_var: &str) -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let port = skinai_core::ports::resolve_port(port_var)
            .unwrap_or_else(|e| panic!("No free port available for {port_var}: {e}"));
        let api_url = std::env::var("SKINAI_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.into());

        Self {
            host,
            port,
            api_url,
            upload_dir: ServicePaths::from_env().upload_dir,
        }
    }
}

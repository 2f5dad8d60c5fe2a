use std::path::PathBuf;

use skinai_core::paths::ServicePaths;

/// Server configuration loaded from environment variables.
///
/// All fields have defaults suitable for local development.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port, from `BACKEND_PORT` or the first free port in 8000-9000.
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS`.
    /// A single `*` allows any origin.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `60`).
    pub request_timeout_secs: u64,
    /// Database, model and upload locations.
    pub paths: ServicePaths,
    /// Plain-text log file written alongside stdout, if enabled.
    pub log_file: Option<PathBuf>,
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                | Default                    |
    /// |------------------------|----------------------------|
    /// | `HOST`                 | `0.0.0.0`                  |
    /// | `BACKEND_PORT`         | first free port 8000-9000  |
    /// | `CORS_ORIGINS`         | `*`                        |
    /// | `REQUEST_TIMEOUT_SECS` | `60`                       |
    /// | `SKINAI_LOG_FILE`      | unset (stdout only)        |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port = skinai_core::ports::resolve_port("BACKEND_PORT")
            .expect("No free port available for the backend");

        let cors_origins: Vec<String> = std::env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "*".into())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "60".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let paths = ServicePaths::from_env();
        let log_file = Self::log_file_from_env(&paths);

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            paths,
            log_file,
        }
    }

    /// Read `SKINAI_LOG_FILE`. Needed before tracing is set up, so it does
    /// not depend on the rest of the configuration.
    pub fn log_file_from_env(paths: &ServicePaths) -> Option<PathBuf> {
        log_file_setting(std::env::var("SKINAI_LOG_FILE").ok(), paths)
    }

    /// Whether CORS should accept any origin.
    pub fn allows_any_origin(&self) -> bool {
        self.cors_origins.is_empty() || self.cors_origins.iter().any(|o| o == "*")
    }
}

/// Unset, blank or `off` disables the log file; relative paths are taken
/// relative to the base directory.
fn log_file_setting(raw: Option<String>, paths: &ServicePaths) -> Option<PathBuf> {
    let raw = raw?;
    let value = raw.trim();
    if value.is_empty() || value.eq_ignore_ascii_case("off") {
        return None;
    }
    Some(paths.resolve(value))
}

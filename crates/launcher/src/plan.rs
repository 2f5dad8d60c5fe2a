//! Port allocation and the list of services to start.

use std::path::{Path, PathBuf};
use std::time::Duration;

use skinai_core::ports::{
    find_free_port, find_free_ports, PortError, ADMIN_PORT_RANGE, BACKEND_PORT_RANGE,
    DEFAULT_PORT_RANGE, UI_PORT_RANGE,
};

use crate::error::LauncherError;

/// Ports for the three services.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServicePorts {
    pub backend: u16,
    pub ui: u16,
    pub admin: u16,
}

impl ServicePorts {
    /// Three distinct free ports from 8000-9000, or one from each
    /// per-service range when the shared scan comes up short.
    pub fn allocate() -> Result<Self, PortError> {
        match find_free_ports(3, DEFAULT_PORT_RANGE) {
            Ok(ports) => Ok(Self {
                backend: ports[0],
                ui: ports[1],
                admin: ports[2],
            }),
            Err(e) => {
                tracing::warn!(error = %e, "Shared port scan failed, using per-service ranges");
                Ok(Self {
                    backend: find_free_port(BACKEND_PORT_RANGE)?,
                    ui: find_free_port(UI_PORT_RANGE)?,
                    admin: find_free_port(ADMIN_PORT_RANGE)?,
                })
            }
        }
    }

    pub fn api_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.backend)
    }

    /// Environment passed to every child.
    pub fn env_vars(&self) -> Vec<(&'static str, String)> {
        vec![
            ("BACKEND_PORT", self.backend.to_string()),
            ("UI_PORT", self.ui.to_string()),
            ("ADMIN_PORT", self.admin.to_string()),
            ("SKINAI_API_URL", self.api_url()),
        ]
    }
}

/// One child process and how long to wait after starting it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSpec {
    pub name: &'static str,
    pub program: PathBuf,
    pub args: Vec<String>,
    pub startup_delay: Duration,
}

/// API, user page and admin page, in start order.
pub fn default_services(bin_dir: &Path) -> Vec<ServiceSpec> {
    [
        ("skinai-api", 5),
        ("skinai-ui", 3),
        ("skinai-admin", 2),
    ]
    .into_iter()
    .map(|(name, delay)| ServiceSpec {
        name,
        program: bin_dir.join(format!("{name}{}", std::env::consts::EXE_SUFFIX)),
        args: Vec::new(),
        startup_delay: Duration::from_secs(delay),
    })
    .collect()
}

/// Directory holding this executable; the service binaries are built next to it.
pub fn sibling_bin_dir() -> Result<PathBuf, LauncherError> {
    let exe = std::env::current_exe().map_err(LauncherError::CurrentExe)?;
    exe.parent().map(Path::to_path_buf).ok_or_else(|| {
        LauncherError::CurrentExe(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "executable has no parent directory",
        ))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allocated_ports_are_distinct() {
        let ports = ServicePorts::allocate().unwrap();
        assert_ne!(ports.backend, ports.ui);
        assert_ne!(ports.ui, ports.admin);
        assert_ne!(ports.backend, ports.admin);
    }

    #[test]
    fn env_vars_point_dashboards_at_backend() {
        let ports = ServicePorts {
            backend: 8001,
            ui: 8002,
            admin: 8003,
        };
        let env = ports.env_vars();
        assert!(env.contains(&("BACKEND_PORT", "8001".into())));
        assert!(env.contains(&("UI_PORT", "8002".into())));
        assert!(env.contains(&("ADMIN_PORT", "8003".into())));
        assert!(env.contains(&("SKINAI_API_URL", "http://127.0.0.1:8001".into())));
    }

    #[test]
    fn services_start_api_first() {
        let services = default_services(Path::new("/opt/skinai/bin"));
        let names: Vec<_> = services.iter().map(|s| s.name).collect();
        assert_eq!(names, ["skinai-api", "skinai-ui", "skinai-admin"]);
        assert_eq!(services[0].startup_delay, Duration::from_secs(5));
        assert!(services[1].program.starts_with("/opt/skinai/bin"));
    }
}

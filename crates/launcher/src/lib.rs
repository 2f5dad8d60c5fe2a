//! Starts the API and both dashboards as child processes on free ports.

pub mod error;
pub mod plan;
pub mod supervisor;

pub use error::LauncherError;
pub use plan::{ServicePorts, ServiceSpec};
pub use supervisor::Supervisor;

use skinai_core::ports::PortError;

#[derive(Debug, thiserror::Error)]
pub enum LauncherError {
    #[error(transparent)]
    Ports(#[from] PortError),

    #[error("Failed to locate sibling binaries: {0}")]
    CurrentExe(#[source] std::io::Error),

    #[error("Failed to start {name} ({program}): {source}")]
    Spawn {
        name: String,
        program: String,
        #[source]
        source: std::io::Error,
    },
}

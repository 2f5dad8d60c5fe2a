//! Local storage for uploaded images.

use std::path::{Path, PathBuf};

/// Writes uploads into a single flat directory.
#[derive(Debug, Clone)]
pub struct UploadStore {
    dir: PathBuf,
}

impl UploadStore {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Create the upload directory if it does not exist.
    pub async fn ensure_dir(&self) -> std::io::Result<()> {
        tokio::fs::create_dir_all(&self.dir).await
    }

    /// Write `data` to `<dir>/<file_name>`, returning the full path.
    pub async fn save(&self, file_name: &str, data: &[u8]) -> std::io::Result<PathBuf> {
        self.ensure_dir().await?;
        let path = self.dir.join(file_name);
        tokio::fs::write(&path, data).await?;
        Ok(path)
    }

    /// Best-effort removal of a previously saved file.
    pub async fn remove(&self, path: &Path) {
        if let Err(e) = tokio::fs::remove_file(path).await {
            tracing::warn!(path = %path.display(), error = %e, "Failed to remove upload");
        }
    }
}

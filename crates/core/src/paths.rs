//! Filesystem and database locations shared by every binary.

use std::path::{Path, PathBuf};

/// Locations of persisted state, loaded from environment variables.
///
/// | Env Var              | Default                         |
/// |----------------------|---------------------------------|
/// | `SKINAI_BASE_DIR`    | current working directory       |
/// | `SKINAI_DB_URL`      | `sqlite://<base>/skin_ai.db`    |
/// | `SKINAI_MODELS_DIR`  | `<base>/models`                 |
/// | `SKINAI_UPLOAD_DIR`  | `<base>/uploaded_images`        |
/// | `SKINAI_DATASET_DIR` | `<base>/dataset`                |
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServicePaths {
    pub base_dir: PathBuf,
    pub database_url: String,
    pub models_dir: PathBuf,
    pub upload_dir: PathBuf,
    pub dataset_dir: PathBuf,
}

impl ServicePaths {
    pub fn from_env() -> Self {
        let base_dir = std::env::var("SKINAI_BASE_DIR")
            .map(PathBuf::from)
            .or_else(|_| std::env::current_dir())
            .unwrap_or_else(|_| PathBuf::from("."));

        let mut paths = Self::with_base(base_dir);
        if let Ok(url) = std::env::var("SKINAI_DB_URL") {
            paths.database_url = url;
        }
        if let Ok(dir) = std::env::var("SKINAI_MODELS_DIR") {
            paths.models_dir = paths.resolve(&dir);
        }
        if let Ok(dir) = std::env::var("SKINAI_UPLOAD_DIR") {
            paths.upload_dir = paths.resolve(&dir);
        }
        if let Ok(dir) = std::env::var("SKINAI_DATASET_DIR") {
            paths.dataset_dir = paths.resolve(&dir);
        }
        paths
    }

    /// Default layout rooted at `base_dir`.
    pub fn with_base(base_dir: PathBuf) -> Self {
        Self {
            database_url: format!("sqlite://{}", base_dir.join("skin_ai.db").display()),
            models_dir: base_dir.join("models"),
            upload_dir: base_dir.join("uploaded_images"),
            dataset_dir: base_dir.join("dataset"),
            base_dir,
        }
    }

    /// Resolve a stored path: relative paths are taken relative to `base_dir`.
    pub fn resolve(&self, path: impl AsRef<Path>) -> PathBuf {
        let path = path.as_ref();
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.base_dir.join(path)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_layout_under_base() {
        let paths = ServicePaths::with_base(PathBuf::from("/srv/skinai"));
        assert_eq!(paths.database_url, "sqlite:///srv/skinai/skin_ai.db");
        assert_eq!(paths.models_dir, PathBuf::from("/srv/skinai/models"));
        assert_eq!(paths.upload_dir, PathBuf::from("/srv/skinai/uploaded_images"));
        assert_eq!(paths.dataset_dir, PathBuf::from("/srv/skinai/dataset"));
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        let paths = ServicePaths::with_base(PathBuf::from("/srv/skinai"));
        assert_eq!(paths.resolve("/tmp/a.jpg"), PathBuf::from("/tmp/a.jpg"));
        assert_eq!(
            paths.resolve("uploaded_images/a.jpg"),
            PathBuf::from("/srv/skinai/uploaded_images/a.jpg")
        );
    }
}

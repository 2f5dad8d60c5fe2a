//! On-disk layout of a trained model artifact.

use std::path::{Path, PathBuf};

pub const BEST_DIR_NAME: &str = "best";
pub const MODEL_FILE_NAME: &str = "skin_model.onnx";
pub const LABELS_FILE_NAME: &str = "class_names.txt";
pub const HEAD_FILE_NAME: &str = "head.json";

/// Paths of the files making up one exported model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactPaths {
    /// ONNX graph: a full classifier, or a feature extractor when `head` exists.
    pub model: PathBuf,
    /// Newline-delimited label vocabulary.
    pub labels: PathBuf,
    /// Optional linear head applied on top of the ONNX output.
    pub head: PathBuf,
}

impl ArtifactPaths {
    /// Artifact files inside `dir`.
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            model: dir.join(MODEL_FILE_NAME),
            labels: dir.join(LABELS_FILE_NAME),
            head: dir.join(HEAD_FILE_NAME),
        }
    }

    /// The production artifact under `<models_dir>/best/`.
    pub fn best(models_dir: &Path) -> Self {
        Self::in_dir(&models_dir.join(BEST_DIR_NAME))
    }
}

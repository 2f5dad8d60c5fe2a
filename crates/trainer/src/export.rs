//! Writing training results to the models directory.
//!
//! ```text
//! <models>/checkpoints/best_head.json
//! <models>/best/skin_model.onnx     (copy of the backbone)
//! <models>/best/head.json
//! <models>/best/class_names.txt
//! ```

use std::path::{Path, PathBuf};

use skinai_model::artifact::{ArtifactPaths, BEST_DIR_NAME};
use skinai_model::LinearHead;

use crate::error::TrainerError;

pub const CHECKPOINT_DIR_NAME: &str = "checkpoints";
pub const CHECKPOINT_FILE_NAME: &str = "best_head.json";

/// Save `head` as the current best checkpoint.
pub fn write_checkpoint(head: &LinearHead, checkpoint_dir: &Path) -> Result<PathBuf, TrainerError> {
    std::fs::create_dir_all(checkpoint_dir).map_err(TrainerError::io(checkpoint_dir))?;
    let path = checkpoint_dir.join(CHECKPOINT_FILE_NAME);
    head.save(&path)?;
    tracing::debug!(path = %path.display(), "Checkpoint written");
    Ok(path)
}

/// Write the deployable artifact the API loads at startup.
pub fn export_artifact(
    head: &LinearHead,
    classes: &[String],
    backbone_path: &Path,
    models_dir: &Path,
) -> Result<ArtifactPaths, TrainerError> {
    let best_dir = models_dir.join(BEST_DIR_NAME);
    std::fs::create_dir_all(&best_dir).map_err(TrainerError::io(&best_dir))?;

    let paths = ArtifactPaths::in_dir(&best_dir);
    std::fs::copy(backbone_path, &paths.model).map_err(TrainerError::io(backbone_path))?;
    head.save(&paths.head)?;

    let mut labels = classes.join("\n");
    labels.push('\n');
    std::fs::write(&paths.labels, labels).map_err(TrainerError::io(&paths.labels))?;

    tracing::info!(dir = %best_dir.display(), classes = classes.len(), "Exported model");
    Ok(paths)
}

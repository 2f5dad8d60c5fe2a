//! Feature extraction through the frozen backbone.

use std::path::{Path, PathBuf};

use image::RgbImage;
use skinai_model::preprocess::image_to_tensor;
use skinai_model::OnnxRunner;

use crate::error::TrainerError;

/// Maps a transformed 224×224 image to a feature vector.
pub trait FeatureExtractor {
    fn extract(&self, img: &RgbImage) -> Result<Vec<f32>, TrainerError>;
}

/// Pretrained ONNX feature extractor; its flattened first output is the
/// feature vector.
#[derive(Debug)]
pub struct OnnxBackbone {
    runner: OnnxRunner,
    path: PathBuf,
}

impl OnnxBackbone {
    pub fn load(path: &Path) -> Result<Self, TrainerError> {
        tracing::info!(path = %path.display(), "Loading backbone");
        Ok(Self {
            runner: OnnxRunner::load(path)?,
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl FeatureExtractor for OnnxBackbone {
    fn extract(&self, img: &RgbImage) -> Result<Vec<f32>, TrainerError> {
        Ok(self.runner.run(image_to_tensor(img))?)
    }
}

/// Decode an image file into RGB.
pub fn load_rgb(path: &Path) -> Result<RgbImage, TrainerError> {
    image::open(path)
        .map(|img| img.to_rgb8())
        .map_err(|e| TrainerError::Image {
            path: path.display().to_string(),
            reason: e.to_string(),
        })
}

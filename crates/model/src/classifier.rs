//! The classifier service injected into the API.

use std::path::Path;

use skinai_core::profile::FALLBACK_CONDITION;

use crate::artifact::ArtifactPaths;
use crate::decode::{decode_logits, Prediction};
use crate::error::ModelError;
use crate::head::LinearHead;
use crate::preprocess::preprocess;
use crate::runner::OnnxRunner;

/// Confidence reported with the fallback prediction.
pub const FALLBACK_CONFIDENCE: f64 = 0.50;

/// Anything that can turn encoded image bytes into a prediction.
///
/// Implementations must be immutable after construction; `predict` is a
/// blocking call and is run off the async executor by callers.
pub trait Classifier: Send + Sync {
    fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, ModelError>;

    /// `true` when a real artifact is loaded, `false` in fallback mode.
    fn model_loaded(&self) -> bool;
}

/// ONNX-backed skin condition classifier.
#[derive(Debug)]
pub struct SkinClassifier {
    runner: Option<OnnxRunner>,
    head: Option<LinearHead>,
    labels: Vec<String>,
}

impl SkinClassifier {
    /// Load the artifact at `paths`.
    ///
    /// A missing ONNX file yields a fallback classifier and the head is not
    /// read at all; a present but broken model is an error. When both
    /// `head.json` and the label file exist they must agree on the number of
    /// classes, and the label file names win.
    pub fn load(paths: &ArtifactPaths) -> Result<Self, ModelError> {
        let file_labels = if paths.labels.exists() {
            Some(read_labels(&paths.labels)?)
        } else {
            None
        };

        if !paths.model.exists() {
            tracing::warn!(
                path = %paths.model.display(),
                "No ONNX model found, using fallback predictions"
            );
            return Ok(Self {
                runner: None,
                head: None,
                labels: file_labels.unwrap_or_default(),
            });
        }

        let head = if paths.head.exists() {
            Some(LinearHead::load(&paths.head)?)
        } else {
            None
        };
        let labels = reconcile_labels(head.as_ref(), file_labels)?;

        tracing::info!(
            path = %paths.model.display(),
            labels = labels.len(),
            with_head = head.is_some(),
            "Loading ONNX model"
        );
        let runner = OnnxRunner::load(&paths.model)?;

        Ok(Self {
            runner: Some(runner),
            head,
            labels,
        })
    }

    /// A classifier that always answers with the fallback prediction.
    pub fn fallback() -> Self {
        Self {
            runner: None,
            head: None,
            labels: Vec::new(),
        }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }
}

impl Classifier for SkinClassifier {
    fn predict(&self, image_bytes: &[u8]) -> Result<Prediction, ModelError> {
        let Some(runner) = &self.runner else {
            return Ok(Prediction {
                label: FALLBACK_CONDITION.to_string(),
                confidence: FALLBACK_CONFIDENCE,
            });
        };

        let input = preprocess(image_bytes)?;
        let output = runner.run(input)?;
        let logits = match &self.head {
            Some(head) => head.logits(&output)?,
            None => output,
        };
        decode_logits(&logits, &self.labels)
    }

    fn model_loaded(&self) -> bool {
        self.runner.is_some()
    }
}

/// Read a newline-delimited label vocabulary.
pub fn read_labels(path: &Path) -> Result<Vec<String>, ModelError> {
    let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(raw.lines().map(|line| line.trim().to_string()).collect())
}

/// Pick the label vocabulary from the head's classes and the label file.
pub fn reconcile_labels(
    head: Option<&LinearHead>,
    file_labels: Option<Vec<String>>,
) -> Result<Vec<String>, ModelError> {
    match (head, file_labels) {
        (Some(head), Some(labels)) => {
            if labels.len() != head.classes.len() {
                return Err(ModelError::Head(format!(
                    "head has {} classes but the label file lists {}",
                    head.classes.len(),
                    labels.len()
                )));
            }
            if labels != head.classes {
                tracing::warn!(
                    head = ?head.classes,
                    file = ?labels,
                    "Label file disagrees with head class names, using the label file"
                );
            }
            Ok(labels)
        }
        (Some(head), None) => Ok(head.classes.clone()),
        (None, Some(labels)) => Ok(labels),
        (None, None) => Ok(Vec::new()),
    }
}

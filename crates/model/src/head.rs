//! Linear classification head applied on top of backbone features.
//!
//! The trainer fine-tunes only this layer; the frozen backbone stays an ONNX
//! graph. Serialized as JSON next to the exported model.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ModelError;

/// `logits = weights · features + bias`, one row per class.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearHead {
    pub classes: Vec<String>,
    pub weights: Vec<Vec<f32>>,
    pub bias: Vec<f32>,
}

impl LinearHead {
    /// A zero-initialised head for `classes` over `feature_dim` inputs.
    pub fn zeros(classes: Vec<String>, feature_dim: usize) -> Self {
        let n = classes.len();
        Self {
            classes,
            weights: vec![vec![0.0; feature_dim]; n],
            bias: vec![0.0; n],
        }
    }

    pub fn num_classes(&self) -> usize {
        self.classes.len()
    }

    /// Input dimension, or 0 for a head without classes.
    pub fn feature_dim(&self) -> usize {
        self.weights.first().map_or(0, Vec::len)
    }

    /// Check that all shapes agree.
    pub fn validate(&self) -> Result<(), ModelError> {
        let n = self.classes.len();
        if n == 0 {
            return Err(ModelError::Head("head has no classes".into()));
        }
        if self.weights.len() != n || self.bias.len() != n {
            return Err(ModelError::Head(format!(
                "expected {n} weight rows and biases, got {} and {}",
                self.weights.len(),
                self.bias.len()
            )));
        }
        let dim = self.feature_dim();
        if dim == 0 || self.weights.iter().any(|row| row.len() != dim) {
            return Err(ModelError::Head("weight rows have inconsistent lengths".into()));
        }
        Ok(())
    }

    /// Compute logits for one feature vector.
    pub fn logits(&self, features: &[f32]) -> Result<Vec<f32>, ModelError> {
        if features.len() != self.feature_dim() {
            return Err(ModelError::Head(format!(
                "feature size {} does not match head input size {}",
                features.len(),
                self.feature_dim()
            )));
        }
        Ok(self
            .weights
            .iter()
            .zip(&self.bias)
            .map(|(row, b)| row.iter().zip(features).map(|(w, x)| w * x).sum::<f32>() + b)
            .collect())
    }

    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let raw = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let head: Self = serde_json::from_str(&raw)
            .map_err(|e| ModelError::Head(format!("{}: {e}", path.display())))?;
        head.validate()?;
        Ok(head)
    }

    pub fn save(&self, path: &Path) -> Result<(), ModelError> {
        let json = serde_json::to_string(self).map_err(|e| ModelError::Head(e.to_string()))?;
        std::fs::write(path, json).map_err(|source| ModelError::Io {
            path: path.display().to_string(),
            source,
        })
    }
}

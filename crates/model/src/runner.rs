//! Thin wrapper around a `tract` runnable ONNX plan.

use std::path::Path;

use tract_onnx::prelude::*;

use crate::error::ModelError;
use crate::preprocess::INPUT_SIZE;

type Plan = TypedRunnableModel<TypedModel>;

/// An optimized ONNX graph with its input pinned to `[1, 3, 224, 224]`.
///
/// Immutable after loading; `run` takes `&self` so one runner can be shared
/// across threads behind an `Arc`.
pub struct OnnxRunner {
    plan: Plan,
}

impl std::fmt::Debug for OnnxRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OnnxRunner").finish_non_exhaustive()
    }
}

impl OnnxRunner {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let side = INPUT_SIZE as usize;
        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .and_then(|model| model.with_input_fact(0, f32::fact([1, 3, side, side]).into()))
            .and_then(|model| model.into_optimized())
            .and_then(|model| model.into_runnable())
            .map_err(|e| ModelError::Load {
                path: path.display().to_string(),
                reason: e.to_string(),
            })?;
        Ok(Self { plan })
    }

    /// Run the graph on one preprocessed sample and flatten the first output.
    pub fn run(&self, input: Tensor) -> Result<Vec<f32>, ModelError> {
        let outputs = self
            .plan
            .run(tvec!(input.into()))
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        let first = outputs
            .first()
            .ok_or_else(|| ModelError::Inference("model produced no outputs".into()))?;
        let view = first
            .to_array_view::<f32>()
            .map_err(|e| ModelError::Inference(e.to_string()))?;
        Ok(view.iter().copied().collect())
    }
}

//! Skin condition classifier.
//!
//! Wraps an ONNX image classifier behind the [`Classifier`] trait. When no
//! artifact is present the wrapper returns a fixed fallback prediction so the
//! service keeps working before the first model has been trained.

pub mod artifact;
pub mod classifier;
pub mod decode;
pub mod error;
pub mod head;
pub mod preprocess;
pub mod runner;

pub use artifact::ArtifactPaths;
pub use classifier::{Classifier, SkinClassifier};
pub use decode::Prediction;
pub use error::ModelError;
pub use head::LinearHead;
pub use runner::OnnxRunner;

/// Errors raised while loading or running the classifier.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    /// The uploaded bytes are not a decodable image.
    #[error("Could not decode image bytes: {0}")]
    Decode(String),

    /// The ONNX artifact exists but could not be loaded or optimized.
    #[error("Failed to load model from {path}: {reason}")]
    Load { path: String, reason: String },

    /// The runtime failed while executing the model.
    #[error("Inference failed: {0}")]
    Inference(String),

    /// A sidecar file (labels, head) could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The linear head is malformed or does not match the feature size.
    #[error("Invalid classification head: {0}")]
    Head(String),
}

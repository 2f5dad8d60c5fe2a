use std::path::Path;

use skinai_model::ModelError;

/// Failures while building the dataset or training.
///
/// Both programs abort on the first error; nothing is retried.
#[derive(Debug, thiserror::Error)]
pub enum TrainerError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Model(#[from] ModelError),

    #[error("I/O error at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to read image {path}: {reason}")]
    Image { path: String, reason: String },

    #[error("Source image missing: {0}")]
    MissingImage(String),

    #[error("The {0} split is empty")]
    EmptySplit(&'static str),

    #[error("Feature vectors are empty; nothing to train")]
    EmptyFeatures,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

impl TrainerError {
    pub(crate) fn io(path: &Path) -> impl FnOnce(std::io::Error) -> Self + '_ {
        move |source| Self::Io {
            path: path.display().to_string(),
            source,
        }
    }
}

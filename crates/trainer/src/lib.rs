//! Offline tooling: turn confirmed inference records into a labelled image
//! dataset, then fine-tune the classifier head on it.

pub mod augment;
pub mod config;
pub mod dataset;
pub mod error;
pub mod export;
pub mod features;
pub mod optim;
pub mod train;

pub use error::TrainerError;

/// Install the `tracing` subscriber shared by the trainer binaries.
pub fn init_tracing() {
    use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "skinai_trainer=info,skinai_model=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}

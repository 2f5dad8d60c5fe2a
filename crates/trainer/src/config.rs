use std::path::PathBuf;
use std::str::FromStr;

use skinai_core::paths::ServicePaths;

use crate::error::TrainerError;

pub const DEFAULT_SPLIT_SEED: u64 = 42;
pub const DEFAULT_EPOCHS: usize = 8;
pub const DEFAULT_LEARNING_RATE: f32 = 1e-3;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_TRAIN_SEED: u64 = 42;

/// How confirmed records are divided between `train/` and `val/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitStrategy {
    /// First 80% by insertion order train, rest val.
    Ordered,
    /// Per-label seeded shuffle, then 80/20 within each label.
    Stratified { seed: u64 },
}

impl Default for SplitStrategy {
    fn default() -> Self {
        Self::Stratified {
            seed: DEFAULT_SPLIT_SEED,
        }
    }
}

/// Dataset builder configuration.
///
/// | Env Var             | Default      |
/// |---------------------|--------------|
/// | `SKINAI_SPLIT`      | `stratified` |
/// | `SKINAI_SPLIT_SEED` | `42`         |
///
/// Locations come from [`ServicePaths::from_env`].
#[derive(Debug, Clone)]
pub struct DatasetConfig {
    pub paths: ServicePaths,
    pub split: SplitStrategy,
}

impl DatasetConfig {
    pub fn from_env() -> Result<Self, TrainerError> {
        let seed = env_or("SKINAI_SPLIT_SEED", DEFAULT_SPLIT_SEED)?;
        let split = match std::env::var("SKINAI_SPLIT")
            .unwrap_or_else(|_| "stratified".into())
            .to_ascii_lowercase()
            .as_str()
        {
            "stratified" => SplitStrategy::Stratified { seed },
            "ordered" => SplitStrategy::Ordered,
            other => {
                return Err(TrainerError::Config(format!(
                    "SKINAI_SPLIT must be 'stratified' or 'ordered', got '{other}'"
                )))
            }
        };

        Ok(Self {
            paths: ServicePaths::from_env(),
            split,
        })
    }
}

/// Trainer configuration.
///
/// | Env Var                | Default                  |
/// |------------------------|--------------------------|
/// | `SKINAI_BACKBONE_PATH` | `<models>/backbone.onnx` |
/// | `SKINAI_EPOCHS`        | `8`                      |
/// | `SKINAI_LEARNING_RATE` | `0.001`                  |
/// | `SKINAI_BATCH_SIZE`    | `32`                     |
/// | `SKINAI_TRAIN_SEED`    | `42`                     |
#[derive(Debug, Clone)]
pub struct TrainConfig {
    pub dataset_dir: PathBuf,
    pub models_dir: PathBuf,
    pub backbone_path: PathBuf,
    pub epochs: usize,
    pub learning_rate: f32,
    pub batch_size: usize,
    /// Seeds shuffling and augmentation.
    pub seed: u64,
}

impl TrainConfig {
    pub fn from_env() -> Result<Self, TrainerError> {
        let paths = ServicePaths::from_env();
        let mut config = Self::with_paths(&paths);

        if let Ok(path) = std::env::var("SKINAI_BACKBONE_PATH") {
            config.backbone_path = paths.resolve(path);
        }
        config.epochs = env_or("SKINAI_EPOCHS", config.epochs)?;
        config.learning_rate = env_or("SKINAI_LEARNING_RATE", config.learning_rate)?;
        config.batch_size = env_or("SKINAI_BATCH_SIZE", config.batch_size)?;
        config.seed = env_or("SKINAI_TRAIN_SEED", config.seed)?;

        config.validate()?;
        Ok(config)
    }

    /// Defaults rooted at `paths`.
    pub fn with_paths(paths: &ServicePaths) -> Self {
        Self {
            dataset_dir: paths.dataset_dir.clone(),
            models_dir: paths.models_dir.clone(),
            backbone_path: paths.models_dir.join("backbone.onnx"),
            epochs: DEFAULT_EPOCHS,
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            seed: DEFAULT_TRAIN_SEED,
        }
    }

    pub fn validate(&self) -> Result<(), TrainerError> {
        if self.epochs == 0 {
            return Err(TrainerError::Config("SKINAI_EPOCHS must be at least 1".into()));
        }
        if self.batch_size == 0 {
            return Err(TrainerError::Config(
                "SKINAI_BATCH_SIZE must be at least 1".into(),
            ));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            return Err(TrainerError::Config(
                "SKINAI_LEARNING_RATE must be a positive number".into(),
            ));
        }
        Ok(())
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, TrainerError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| TrainerError::Config(format!("{key} has invalid value '{raw}'"))),
        Err(_) => Ok(default),
    }
}

//! Dataset builder.
//!
//! Confirmed records become `<dataset>/{train,val}/<label>/<file>`. The
//! directory is wiped and recreated on every run.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use skinai_core::paths::ServicePaths;
use skinai_db::models::inference::InferenceRecord;
use skinai_db::repositories::InferenceRepo;
use skinai_db::DbPool;

use crate::config::{DatasetConfig, SplitStrategy};
use crate::error::TrainerError;

pub const TRAIN_DIR: &str = "train";
pub const VAL_DIR: &str = "val";

/// Fraction of images assigned to `train/`.
pub const TRAIN_FRACTION: f64 = 0.8;

/// One image with its ground-truth label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabeledImage {
    pub source: PathBuf,
    pub label: String,
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Split {
    pub train: Vec<LabeledImage>,
    pub val: Vec<LabeledImage>,
}

/// Counts reported after the dataset is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetSummary {
    pub train: usize,
    pub val: usize,
    /// `(train, val)` per label.
    pub per_label: BTreeMap<String, (usize, usize)>,
}

/// Map confirmed records to labelled images, resolving stored paths.
pub fn labeled_images(records: &[InferenceRecord], paths: &ServicePaths) -> Vec<LabeledImage> {
    records
        .iter()
        .map(|r| LabeledImage {
            source: paths.resolve(&r.image_path),
            label: r.authoritative_label().to_string(),
        })
        .collect()
}

fn train_count(len: usize) -> usize {
    (len as f64 * TRAIN_FRACTION) as usize
}

/// First 80% (floored) in the given order train, the rest val.
pub fn split_ordered(mut items: Vec<LabeledImage>) -> Split {
    let val = items.split_off(train_count(items.len()));
    Split { train: items, val }
}

/// Shuffle each label's images with a seeded RNG, then split 80/20 per label.
///
/// A label with a single image keeps it in `train/`. Output is grouped by
/// label in sorted order and is identical for identical input and seed.
pub fn split_stratified(items: Vec<LabeledImage>, seed: u64) -> Split {
    let mut by_label: BTreeMap<String, Vec<LabeledImage>> = BTreeMap::new();
    for item in items {
        by_label.entry(item.label.clone()).or_default().push(item);
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let mut split = Split::default();
    for (_, mut group) in by_label {
        group.shuffle(&mut rng);
        let n_train = train_count(group.len()).max(1);
        let val = group.split_off(n_train);
        split.train.extend(group);
        split.val.extend(val);
    }
    split
}

pub fn split(items: Vec<LabeledImage>, strategy: SplitStrategy) -> Split {
    match strategy {
        SplitStrategy::Ordered => split_ordered(items),
        SplitStrategy::Stratified { seed } => split_stratified(items, seed),
    }
}

/// Directory name for a label. Path separators and dot-only names cannot
/// escape the split directory.
pub fn label_dir_name(label: &str) -> String {
    let cleaned: String = label
        .trim()
        .chars()
        .map(|c| if c == '/' || c == '\\' { '_' } else { c })
        .collect();
    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        "_".to_string()
    } else {
        cleaned
    }
}

/// Wipe `dataset_dir`, recreate `train/` and `val/` and copy every image.
///
/// A missing source image aborts the run; files already copied stay behind.
pub fn write_split(split: &Split, dataset_dir: &Path) -> Result<DatasetSummary, TrainerError> {
    if dataset_dir.exists() {
        std::fs::remove_dir_all(dataset_dir).map_err(TrainerError::io(dataset_dir))?;
    }

    let mut per_label: BTreeMap<String, (usize, usize)> = BTreeMap::new();
    for (name, items) in [(TRAIN_DIR, &split.train), (VAL_DIR, &split.val)] {
        let root = dataset_dir.join(name);
        std::fs::create_dir_all(&root).map_err(TrainerError::io(&root))?;

        for item in items {
            copy_image(item, &root)?;
            let counts = per_label.entry(item.label.clone()).or_default();
            if name == TRAIN_DIR {
                counts.0 += 1;
            } else {
                counts.1 += 1;
            }
        }
    }

    Ok(DatasetSummary {
        train: split.train.len(),
        val: split.val.len(),
        per_label,
    })
}

fn copy_image(item: &LabeledImage, root: &Path) -> Result<(), TrainerError> {
    if !item.source.is_file() {
        return Err(TrainerError::MissingImage(item.source.display().to_string()));
    }
    let file_name = item
        .source
        .file_name()
        .ok_or_else(|| TrainerError::MissingImage(item.source.display().to_string()))?;

    let label_dir = root.join(label_dir_name(&item.label));
    std::fs::create_dir_all(&label_dir).map_err(TrainerError::io(&label_dir))?;

    let dest = label_dir.join(file_name);
    std::fs::copy(&item.source, &dest).map_err(TrainerError::io(&item.source))?;
    Ok(())
}

/// Load confirmed records from the store and write the dataset.
pub async fn build_dataset(
    pool: &DbPool,
    config: &DatasetConfig,
) -> Result<DatasetSummary, TrainerError> {
    let records = InferenceRepo::list_confirmed(pool).await?;
    tracing::info!(records = records.len(), split = ?config.split, "Building dataset");

    let items = labeled_images(&records, &config.paths);
    let parts = split(items, config.split);
    let summary = write_split(&parts, &config.paths.dataset_dir)?;

    for (label, (train, val)) in &summary.per_label {
        tracing::info!(%label, train, val, "Label counts");
    }
    Ok(summary)
}

//! Fine-tuning of the linear classification head.
//!
//! Images are read from `<dataset>/train/<class>/` and `<dataset>/val/<class>/`.
//! Classes are the sorted subdirectory names of `train/`. Each epoch runs the
//! augmented training images through the frozen backbone, updates the head
//! with Adam on softmax cross-entropy and then measures validation accuracy.

use std::path::{Path, PathBuf};

use image::RgbImage;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use skinai_model::decode::{argmax, softmax};
use skinai_model::preprocess::resize_square;
use skinai_model::LinearHead;

use crate::augment::{train_transform, val_transform, TRAIN_RESIZE};
use crate::config::TrainConfig;
use crate::dataset::{TRAIN_DIR, VAL_DIR};
use crate::error::TrainerError;
use crate::export::{write_checkpoint, CHECKPOINT_DIR_NAME};
use crate::features::{load_rgb, FeatureExtractor};
use crate::optim::Adam;

/// Path of an image and the index of its class.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageEntry {
    pub path: PathBuf,
    pub class: usize,
}

/// A feature vector with its class index.
#[derive(Debug, Clone)]
pub struct Sample {
    pub features: Vec<f32>,
    pub class: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub struct EpochReport {
    pub epoch: usize,
    pub train_loss: f32,
    pub val_accuracy: f64,
    pub improved: bool,
}

#[derive(Debug, Clone)]
pub struct TrainOutcome {
    pub best_head: LinearHead,
    pub best_accuracy: f64,
    pub epochs: Vec<EpochReport>,
}

/// Sorted subdirectory names of `train_dir`.
pub fn list_classes(train_dir: &Path) -> Result<Vec<String>, TrainerError> {
    let mut classes = Vec::new();
    for entry in std::fs::read_dir(train_dir).map_err(TrainerError::io(train_dir))? {
        let entry = entry.map_err(TrainerError::io(train_dir))?;
        if entry.path().is_dir() {
            classes.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    classes.sort();
    Ok(classes)
}

/// Every file under `<split_dir>/<class>/` for the known classes.
///
/// Directories naming a class outside `classes` are skipped with a warning.
pub fn list_images(split_dir: &Path, classes: &[String]) -> Result<Vec<ImageEntry>, TrainerError> {
    let mut entries = Vec::new();
    if !split_dir.is_dir() {
        return Ok(entries);
    }

    let mut dirs: Vec<PathBuf> = std::fs::read_dir(split_dir)
        .map_err(TrainerError::io(split_dir))?
        .filter_map(|e| e.ok().map(|e| e.path()))
        .filter(|p| p.is_dir())
        .collect();
    dirs.sort();

    for dir in dirs {
        let name = dir
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let Some(class) = classes.iter().position(|c| *c == name) else {
            tracing::warn!(class = %name, split = %split_dir.display(), "Skipping unknown class");
            continue;
        };

        let mut files: Vec<PathBuf> = std::fs::read_dir(&dir)
            .map_err(TrainerError::io(&dir))?
            .filter_map(|e| e.ok().map(|e| e.path()))
            .filter(|p| p.is_file())
            .collect();
        files.sort();
        entries.extend(files.into_iter().map(|path| ImageEntry { path, class }));
    }
    Ok(entries)
}

/// One Adam step on a mini-batch. Returns the mean cross-entropy loss.
pub fn train_batch(
    head: &mut LinearHead,
    batch: &[Sample],
    weight_opt: &mut Adam,
    bias_opt: &mut Adam,
) -> Result<f32, TrainerError> {
    let classes = head.num_classes();
    let dim = head.feature_dim();
    if dim == 0 {
        return Err(TrainerError::EmptyFeatures);
    }
    let mut grad_w = vec![0.0_f32; classes * dim];
    let mut grad_b = vec![0.0_f32; classes];
    let mut loss = 0.0_f32;

    for sample in batch {
        let probs = softmax(&head.logits(&sample.features)?);
        loss -= probs[sample.class].max(f32::MIN_POSITIVE).ln();

        for (c, &p) in probs.iter().enumerate() {
            let g = p - if c == sample.class { 1.0 } else { 0.0 };
            grad_b[c] += g;
            let row = &mut grad_w[c * dim..(c + 1) * dim];
            for (gw, &x) in row.iter_mut().zip(&sample.features) {
                *gw += g * x;
            }
        }
    }

    let n = batch.len().max(1) as f32;
    grad_w.iter_mut().for_each(|g| *g /= n);
    grad_b.iter_mut().for_each(|g| *g /= n);

    let mut flat: Vec<f32> = head.weights.iter().flatten().copied().collect();
    weight_opt.step(&mut flat, &grad_w);
    for (row, chunk) in head.weights.iter_mut().zip(flat.chunks(dim)) {
        row.copy_from_slice(chunk);
    }
    bias_opt.step(&mut head.bias, &grad_b);

    Ok(loss / n)
}

/// Fraction of samples whose arg-max class matches.
pub fn accuracy(head: &LinearHead, samples: &[Sample]) -> Result<f64, TrainerError> {
    if samples.is_empty() {
        return Ok(0.0);
    }
    let mut correct = 0usize;
    for sample in samples {
        let logits = head.logits(&sample.features)?;
        if argmax(&logits) == Some(sample.class) {
            correct += 1;
        }
    }
    Ok(correct as f64 / samples.len() as f64)
}

/// Train a head from in-memory images.
///
/// `train` images should already be resized to the pre-crop size; augmentation
/// and feature extraction run per epoch. The first epoch always becomes the
/// best; later epochs replace it only on strictly greater accuracy. Each new
/// best is checkpointed under `checkpoint_dir` when given.
pub fn fit<F: FeatureExtractor + ?Sized>(
    extractor: &F,
    classes: &[String],
    train: &[(RgbImage, usize)],
    val: &[Sample],
    config: &TrainConfig,
    checkpoint_dir: Option<&Path>,
) -> Result<TrainOutcome, TrainerError> {
    if train.is_empty() {
        return Err(TrainerError::EmptySplit(TRAIN_DIR));
    }
    if val.is_empty() {
        return Err(TrainerError::EmptySplit(VAL_DIR));
    }

    let mut rng = StdRng::seed_from_u64(config.seed);
    let mut order: Vec<usize> = (0..train.len()).collect();

    let mut head: Option<LinearHead> = None;
    let mut weight_opt: Option<Adam> = None;
    let mut bias_opt = Adam::new(config.learning_rate, classes.len());
    let mut best: Option<(LinearHead, f64)> = None;
    let mut reports = Vec::with_capacity(config.epochs);

    for epoch in 1..=config.epochs {
        order.shuffle(&mut rng);

        let mut loss_sum = 0.0_f32;
        let mut batches = 0usize;
        for chunk in order.chunks(config.batch_size) {
            let mut batch = Vec::with_capacity(chunk.len());
            for &i in chunk {
                let (img, class) = &train[i];
                let features = extractor.extract(&train_transform(img, &mut rng))?;
                batch.push(Sample {
                    features,
                    class: *class,
                });
            }

            let dim = batch[0].features.len();
            let head = head.get_or_insert_with(|| LinearHead::zeros(classes.to_vec(), dim));
            let weight_opt =
                weight_opt.get_or_insert_with(|| Adam::new(config.learning_rate, classes.len() * dim));

            loss_sum += train_batch(head, &batch, weight_opt, &mut bias_opt)?;
            batches += 1;
        }

        let Some(current) = head.as_ref() else {
            return Err(TrainerError::EmptySplit(TRAIN_DIR));
        };
        let val_accuracy = accuracy(current, val)?;
        let improved = best.as_ref().map_or(true, |(_, acc)| val_accuracy > *acc);
        if improved {
            best = Some((current.clone(), val_accuracy));
            if let Some(dir) = checkpoint_dir {
                write_checkpoint(current, dir)?;
            }
        }

        let train_loss = loss_sum / batches.max(1) as f32;
        tracing::info!(
            epoch,
            epochs = config.epochs,
            train_loss,
            val_accuracy,
            improved,
            "Epoch finished"
        );
        reports.push(EpochReport {
            epoch,
            train_loss,
            val_accuracy,
            improved,
        });
    }

    let (best_head, best_accuracy) = best.ok_or(TrainerError::EmptySplit(TRAIN_DIR))?;
    Ok(TrainOutcome {
        best_head,
        best_accuracy,
        epochs: reports,
    })
}

/// Run the whole training job from the dataset directory.
pub fn train_from_dataset<F: FeatureExtractor + ?Sized>(
    extractor: &F,
    config: &TrainConfig,
) -> Result<(Vec<String>, TrainOutcome), TrainerError> {
    let train_dir = config.dataset_dir.join(TRAIN_DIR);
    let val_dir = config.dataset_dir.join(VAL_DIR);
    if !train_dir.is_dir() {
        return Err(TrainerError::EmptySplit(TRAIN_DIR));
    }

    let classes = list_classes(&train_dir)?;
    tracing::info!(classes = ?classes, "Discovered classes");

    let train_entries = list_images(&train_dir, &classes)?;
    let val_entries = list_images(&val_dir, &classes)?;
    tracing::info!(
        train = train_entries.len(),
        val = val_entries.len(),
        "Loaded dataset index"
    );

    let mut train = Vec::with_capacity(train_entries.len());
    for entry in &train_entries {
        let img = load_rgb(&entry.path)?;
        train.push((resize_square(&img, TRAIN_RESIZE), entry.class));
    }

    let mut val = Vec::with_capacity(val_entries.len());
    for entry in &val_entries {
        let img = load_rgb(&entry.path)?;
        val.push(Sample {
            features: extractor.extract(&val_transform(&img))?,
            class: entry.class,
        });
    }

    let checkpoint_dir = config.models_dir.join(CHECKPOINT_DIR_NAME);
    let outcome = fit(extractor, &classes, &train, &val, config, Some(&checkpoint_dir))?;
    Ok((classes, outcome))
}

//! Training-time image transforms.

use image::imageops::{self, FilterType};
use image::RgbImage;
use rand::Rng;
use skinai_model::preprocess::{resize_square, INPUT_SIZE};

/// Side length images are resized to before the random crop.
pub const TRAIN_RESIZE: u32 = 256;

/// Crop area as a fraction of the source image.
pub const CROP_SCALE: (f64, f64) = (0.08, 1.0);

/// Crop aspect ratio (width / height).
pub const CROP_RATIO: (f64, f64) = (3.0 / 4.0, 4.0 / 3.0);

const CROP_ATTEMPTS: usize = 10;

/// Crop a random region with random area and aspect ratio, then resize it to
/// `size`×`size`. Falls back to a center crop when no sampled box fits.
pub fn random_resized_crop<R: Rng + ?Sized>(img: &RgbImage, size: u32, rng: &mut R) -> RgbImage {
    let (width, height) = img.dimensions();
    let area = f64::from(width) * f64::from(height);
    let (log_lo, log_hi) = (CROP_RATIO.0.ln(), CROP_RATIO.1.ln());

    for _ in 0..CROP_ATTEMPTS {
        let target = area * rng.random_range(CROP_SCALE.0..=CROP_SCALE.1);
        let aspect = rng.random_range(log_lo..=log_hi).exp();

        let w = (target * aspect).sqrt().round() as u32;
        let h = (target / aspect).sqrt().round() as u32;
        if w == 0 || h == 0 || w > width || h > height {
            continue;
        }

        let x = rng.random_range(0..=width - w);
        let y = rng.random_range(0..=height - h);
        let crop = imageops::crop_imm(img, x, y, w, h).to_image();
        return imageops::resize(&crop, size, size, FilterType::Triangle);
    }

    center_crop(img, size)
}

fn center_crop(img: &RgbImage, size: u32) -> RgbImage {
    let (width, height) = img.dimensions();
    let side = width.min(height);
    let crop = imageops::crop_imm(img, (width - side) / 2, (height - side) / 2, side, side).to_image();
    imageops::resize(&crop, size, size, FilterType::Triangle)
}

/// Resize to 256, random resized crop to 224, flip horizontally half the time.
pub fn train_transform<R: Rng + ?Sized>(img: &RgbImage, rng: &mut R) -> RgbImage {
    let resized = resize_square(img, TRAIN_RESIZE);
    let mut out = random_resized_crop(&resized, INPUT_SIZE, rng);
    if rng.random_bool(0.5) {
        imageops::flip_horizontal_in_place(&mut out);
    }
    out
}

/// Deterministic evaluation transform: resize to 224.
pub fn val_transform(img: &RgbImage) -> RgbImage {
    resize_square(img, INPUT_SIZE)
}

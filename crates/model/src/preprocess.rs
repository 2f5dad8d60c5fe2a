//! Image preprocessing into the classifier's input layout.
//!
//! Output is an NCHW `f32` array of shape `[1, 3, 224, 224]`, scaled to
//! `[0, 1]` and normalized with the ImageNet channel statistics.

use image::imageops::FilterType;
use image::RgbImage;
use tract_onnx::prelude::tract_ndarray::Array4;
use tract_onnx::prelude::Tensor;

use crate::error::ModelError;

/// Square input resolution expected by the model.
pub const INPUT_SIZE: u32 = 224;

/// Per-channel mean (RGB).
pub const CHANNEL_MEAN: [f32; 3] = [0.485, 0.456, 0.406];

/// Per-channel standard deviation (RGB).
pub const CHANNEL_STD: [f32; 3] = [0.229, 0.224, 0.225];

/// Decode encoded image bytes into an RGB buffer.
pub fn decode_rgb(bytes: &[u8]) -> Result<RgbImage, ModelError> {
    image::load_from_memory(bytes)
        .map(|img| img.to_rgb8())
        .map_err(|e| ModelError::Decode(e.to_string()))
}

/// Bilinear resize to a `size`×`size` square, ignoring aspect ratio.
pub fn resize_square(img: &RgbImage, size: u32) -> RgbImage {
    image::imageops::resize(img, size, size, FilterType::Triangle)
}

/// Normalize an RGB image into a `[1, 3, H, W]` array.
pub fn to_nchw(img: &RgbImage) -> Array4<f32> {
    let (width, height) = img.dimensions();
    Array4::from_shape_fn((1, 3, height as usize, width as usize), |(_, c, y, x)| {
        let value = f32::from(img.get_pixel(x as u32, y as u32)[c]) / 255.0;
        (value - CHANNEL_MEAN[c]) / CHANNEL_STD[c]
    })
}

/// Full pipeline: decode, resize to [`INPUT_SIZE`], normalize.
pub fn preprocess(bytes: &[u8]) -> Result<Tensor, ModelError> {
    let rgb = decode_rgb(bytes)?;
    Ok(image_to_tensor(&rgb))
}

/// Resize and normalize an already-decoded image.
pub fn image_to_tensor(img: &RgbImage) -> Tensor {
    let resized = if img.dimensions() == (INPUT_SIZE, INPUT_SIZE) {
        img.clone()
    } else {
        resize_square(img, INPUT_SIZE)
    };
    Tensor::from(to_nchw(&resized))
}

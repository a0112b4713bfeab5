use candle_core::{DType, Device, Tensor};
use image::imageops::FilterType;

use super::error::EncoderError;

/// Decodes photo bytes and resizes to a square `image_size` RGB8 buffer.
///
/// Decode failure is the [`EncoderError::InvalidImage`] boundary for the
/// whole pipeline.
pub fn decode_to_rgb(image_bytes: &[u8], image_size: usize) -> Result<Vec<u8>, EncoderError> {
    let img = image::load_from_memory(image_bytes).map_err(|e| EncoderError::InvalidImage {
        reason: e.to_string(),
    })?;

    let side = image_size as u32;
    Ok(img
        .resize_to_fill(side, side, FilterType::Triangle)
        .to_rgb8()
        .into_raw())
}

/// Converts an RGB8 buffer into the `[1, 3, H, W]` f32 tensor CLIP expects,
/// scaled to `[-1, 1]`.
pub fn rgb_to_pixel_tensor(
    rgb: &[u8],
    image_size: usize,
    device: &Device,
) -> Result<Tensor, EncoderError> {
    let tensor = Tensor::from_vec(rgb.to_vec(), (image_size, image_size, 3), device)?
        .permute((2, 0, 1))?
        .to_dtype(DType::F32)?
        .affine(2.0 / 255.0, -1.0)?
        .unsqueeze(0)?;

    Ok(tensor)
}

use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;

use crate::error::{AppError, AppResult};

/// Output dimensions for project photos
pub const PHOTO_WIDTH: u32 = 500;
pub const PHOTO_HEIGHT: u32 = 300;

/// JPEG quality for re-encoded photos
pub const JPEG_QUALITY: u8 = 80;

/// Resize an uploaded photo to the fixed project-photo dimensions and
/// re-encode it as JPEG.
///
/// The input may be any decodable raster format; the output is always a
/// 500x300 JPEG. An undecodable payload is a validation error so that the
/// request aborts before any upload or database write.
pub fn process_project_photo(input: &[u8]) -> AppResult<Vec<u8>> {
    let img = image::load_from_memory(input)
        .map_err(|e| AppError::Validation(format!("Unreadable image: {}", e)))?;

    // Fill semantics: scale to cover the target box, then center-crop
    let resized = img.resize_to_fill(PHOTO_WIDTH, PHOTO_HEIGHT, FilterType::Lanczos3);

    let mut out = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut out, JPEG_QUALITY);
    encoder
        .encode_image(&resized)
        .map_err(|e| AppError::Internal(format!("JPEG encoding failed: {}", e)))?;

    Ok(out)
}

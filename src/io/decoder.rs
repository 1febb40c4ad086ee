//! Image decoding using `image`

use std::path::Path;

use crate::error::AnalysisError;
use crate::io::image_buffer::ImageBuffer;
use crate::preprocessing::resize::downscale;

/// Decode an encoded image (PNG, JPEG) into a downscaled RGBA buffer
///
/// # Arguments
///
/// * `bytes` - Encoded file contents
/// * `max_dimension` - Longest side of the output, in pixels
///
/// # Errors
///
/// Returns `AnalysisError::DecodingError` for non-image, corrupt or
/// unsupported data (DICOM included). Callers treat this as recoverable.
pub fn decode_image(bytes: &[u8], max_dimension: u32) -> Result<ImageBuffer, AnalysisError> {
    if bytes.is_empty() {
        return Err(AnalysisError::DecodingError("empty file".to_string()));
    }
    let img = image::load_from_memory(bytes)
        .map_err(|e| AnalysisError::DecodingError(e.to_string()))?;
    log::debug!("Decoded image: {}x{}", img.width(), img.height());

    let buffer = ImageBuffer::from(downscale(img, max_dimension).to_rgba8());
    if buffer.is_empty() {
        return Err(AnalysisError::DecodingError("image has no pixels".to_string()));
    }
    Ok(buffer)
}

/// Read and decode an image file
pub fn decode_image_file(path: &Path, max_dimension: u32) -> Result<ImageBuffer, AnalysisError> {
    log::debug!("Decoding image file: {}", path.display());
    let bytes = std::fs::read(path)?;
    decode_image(&bytes, max_dimension)
}

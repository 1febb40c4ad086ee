//! Immutable RGBA pixel buffer

use crate::error::AnalysisError;

/// Decoded image as a flat sequence of RGBA quadruples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl ImageBuffer {
    /// Create a buffer, checking that `data` holds exactly `width * height` pixels
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self, AnalysisError> {
        let expected = width as usize * height as usize * 4;
        if data.len() != expected {
            return Err(AnalysisError::InvalidInput(format!(
                "RGBA buffer of {} bytes does not match {}x{} ({} bytes)",
                data.len(),
                width,
                height,
                expected
            )));
        }
        Ok(Self { width, height, data })
    }

    /// Buffer where every pixel has the same colour
    pub fn filled(width: u32, height: u32, rgba: [u8; 4]) -> Self {
        let data = rgba.repeat(width as usize * height as usize);
        Self { width, height, data }
    }

    /// Width in pixels
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Number of pixels
    pub fn pixel_count(&self) -> usize {
        self.data.len() / 4
    }

    /// True when the buffer has no pixels
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Iterate pixels as `[r, g, b, a]`
    pub fn pixels(&self) -> impl Iterator<Item = [u8; 4]> + '_ {
        self.data
            .chunks_exact(4)
            .map(|px| [px[0], px[1], px[2], px[3]])
    }
}

impl From<image::RgbaImage> for ImageBuffer {
    fn from(img: image::RgbaImage) -> Self {
        let (width, height) = img.dimensions();
        Self {
            width,
            height,
            data: img.into_raw(),
        }
    }
}

//! Pixel statistics feature extraction
//!
//! Computes coarse whole-image statistics in one pass over an RGBA buffer.
//!
//! Algorithm (per pixel, alpha ignored):
//! 1. Brightness `b = (R + G + B) / 3` on the 0-255 scale
//! 2. Accumulate mean and variance of `b` (Welford update)
//! 3. Count pixels with `b` below the dark threshold
//! 4. Accumulate channel disagreement `|R-G| + |G-B| + |R-B|`
//!
//! Outputs are normalized and clamped to [0, 1].
//!
//! # Example
//!
//! ```
//! use pancrescan::features::pixel_stats::extract_features;
//! use pancrescan::io::image_buffer::ImageBuffer;
//! use pancrescan::AnalysisConfig;
//!
//! let black = ImageBuffer::filled(10, 10, [0, 0, 0, 255]);
//! let features = extract_features(&black, &AnalysisConfig::default())?;
//! assert_eq!(features.brightness, 0.0);
//! assert_eq!(features.dark_regions, 1.0);
//! # Ok::<(), pancrescan::AnalysisError>(())
//! ```

use serde::{Deserialize, Serialize};

use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::image_buffer::ImageBuffer;

/// Aggregate image statistics, each in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageFeatures {
    /// Mean brightness
    pub brightness: f32,

    /// Standard deviation of brightness, scaled by `contrast_scale`
    pub contrast: f32,

    /// Fraction of dark pixels
    pub dark_regions: f32,

    /// Mean channel disagreement, scaled by `irregularity_scale`
    ///
    /// Zero for any grayscale image.
    pub irregular_patterns: f32,
}

/// Extract brightness, contrast, dark-region and irregularity statistics
///
/// # Arguments
///
/// * `buffer` - Decoded RGBA pixels
/// * `config` - Supplies the dark threshold and normalization scales
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer.
pub fn extract_features(
    buffer: &ImageBuffer,
    config: &AnalysisConfig,
) -> Result<ImageFeatures, AnalysisError> {
    if buffer.is_empty() {
        return Err(AnalysisError::InvalidInput("Empty pixel buffer".to_string()));
    }

    let mut count = 0u64;
    let mut mean = 0.0f64;
    let mut m2 = 0.0f64;
    let mut dark = 0u64;
    let mut irregularity = 0.0f64;
    let dark_threshold = config.dark_pixel_threshold as f64;

    for [r, g, b, _] in buffer.pixels() {
        let (r, g, b) = (r as f64, g as f64, b as f64);
        let brightness = (r + g + b) / 3.0;

        count += 1;
        let delta = brightness - mean;
        mean += delta / count as f64;
        m2 += delta * (brightness - mean);

        if brightness < dark_threshold {
            dark += 1;
        }

        irregularity += (r - g).abs() + (g - b).abs() + (r - b).abs();
    }

    let n = buffer.pixel_count() as f64;
    let std_dev = (m2 / n).max(0.0).sqrt();

    let features = ImageFeatures {
        brightness: unit(mean / 255.0),
        contrast: unit(std_dev / config.contrast_scale as f64),
        dark_regions: unit(dark as f64 / n),
        irregular_patterns: unit(irregularity / n / config.irregularity_scale as f64),
    };

    log::debug!(
        "Image features over {} pixels: brightness={:.3}, contrast={:.3}, dark={:.3}, irregular={:.3}",
        buffer.pixel_count(),
        features.brightness,
        features.contrast,
        features.dark_regions,
        features.irregular_patterns
    );

    Ok(features)
}

fn unit(value: f64) -> f32 {
    value.clamp(0.0, 1.0) as f32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features_of(buffer: &ImageBuffer) -> ImageFeatures {
        extract_features(buffer, &AnalysisConfig::default()).unwrap()
    }

    #[test]
    fn test_black_image() {
        let f = features_of(&ImageBuffer::filled(10, 10, [0, 0, 0, 255]));
        assert_eq!(f.brightness, 0.0);
        assert_eq!(f.dark_regions, 1.0);
        assert_eq!(f.contrast, 0.0);
        assert_eq!(f.irregular_patterns, 0.0);
    }

    #[test]
    fn test_white_image() {
        let f = features_of(&ImageBuffer::filled(10, 10, [255, 255, 255, 255]));
        assert_eq!(f.brightness, 1.0);
        assert_eq!(f.dark_regions, 0.0);
        assert_eq!(f.contrast, 0.0);
    }

    #[test]
    fn test_uniform_gray_has_no_contrast_or_irregularity() {
        for level in [1u8, 79, 80, 128, 254] {
            let f = features_of(&ImageBuffer::filled(7, 13, [level, level, level, 255]));
            assert_eq!(f.irregular_patterns, 0.0, "level {}", level);
            assert_eq!(f.contrast, 0.0, "level {}", level);
        }
    }

    #[test]
    fn test_dark_threshold_is_strict() {
        let below = features_of(&ImageBuffer::filled(2, 2, [79, 79, 79, 255]));
        let at = features_of(&ImageBuffer::filled(2, 2, [80, 80, 80, 255]));
        assert_eq!(below.dark_regions, 1.0);
        assert_eq!(at.dark_regions, 0.0);
    }

    #[test]
    fn test_half_black_half_white() {
        let mut data = Vec::new();
        for i in 0..100 {
            let v = if i % 2 == 0 { 0 } else { 255 };
            data.extend_from_slice(&[v, v, v, 255]);
        }
        let f = features_of(&ImageBuffer::new(10, 10, data).unwrap());

        assert!((f.brightness - 0.5).abs() < 1e-6);
        assert!((f.dark_regions - 0.5).abs() < 1e-6);
        // std dev = 127.5 -> clamped at 1.0
        assert_eq!(f.contrast, 1.0);
    }

    #[test]
    fn test_pure_red_irregularity() {
        // |255-0| + |0-0| + |255-0| = 510 -> 510 / 300 clamps to 1
        let f = features_of(&ImageBuffer::filled(4, 4, [255, 0, 0, 255]));
        assert_eq!(f.irregular_patterns, 1.0);

        // |60-0| + 0 + |60-0| = 120 -> 0.4
        let f = features_of(&ImageBuffer::filled(4, 4, [60, 0, 0, 255]));
        assert!((f.irregular_patterns - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_alpha_is_ignored() {
        let opaque = features_of(&ImageBuffer::filled(3, 3, [100, 150, 200, 255]));
        let clear = features_of(&ImageBuffer::filled(3, 3, [100, 150, 200, 0]));
        assert_eq!(opaque, clear);
    }

    #[test]
    fn test_outputs_in_unit_range() {
        let data: Vec<u8> = (0..64u32 * 4).map(|i| (i * 37 % 256) as u8).collect();
        let f = features_of(&ImageBuffer::new(8, 8, data).unwrap());
        for v in [f.brightness, f.contrast, f.dark_regions, f.irregular_patterns] {
            assert!((0.0..=1.0).contains(&v));
        }
    }

    #[test]
    fn test_empty_buffer_rejected() {
        let empty = ImageBuffer::new(0, 0, vec![]).unwrap();
        assert!(matches!(
            extract_features(&empty, &AnalysisConfig::default()),
            Err(AnalysisError::InvalidInput(_))
        ));
    }
}

//! Aspect-preserving downscaling
//!
//! Both the analysis loader (square cap, 200 px by default) and the heatmap
//! overlay (400x300 box) shrink images the same way: scale by the tightest
//! of the two axis ratios, never enlarge.
//!
//! # Example
//!
//! ```
//! use pancrescan::preprocessing::resize::fit_within;
//!
//! assert_eq!(fit_within(800, 400, 200, 200), (200, 100));
//! assert_eq!(fit_within(50, 80, 200, 200), (50, 80));
//! ```

use image::imageops::FilterType;
use image::DynamicImage;

/// Target dimensions for `width`x`height` inside a `max_width`x`max_height` box
///
/// Returns the input unchanged when it already fits. Each output side is at
/// least 1 pixel.
pub fn fit_within(width: u32, height: u32, max_width: u32, max_height: u32) -> (u32, u32) {
    if width == 0 || height == 0 {
        return (width, height);
    }
    if width <= max_width && height <= max_height {
        return (width, height);
    }

    let scale = (max_width as f64 / width as f64).min(max_height as f64 / height as f64);
    let w = ((width as f64 * scale).round() as u32).clamp(1, max_width.max(1));
    let h = ((height as f64 * scale).round() as u32).clamp(1, max_height.max(1));
    (w, h)
}

/// Downscale so neither side exceeds `max_dimension`
pub fn downscale(img: DynamicImage, max_dimension: u32) -> DynamicImage {
    let (width, height) = (img.width(), img.height());
    let (w, h) = fit_within(width, height, max_dimension, max_dimension);
    if (w, h) == (width, height) {
        return img;
    }
    log::debug!("Downscaling {}x{} -> {}x{}", width, height, w, h);
    img.resize_exact(w, h, FilterType::Triangle)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_caps_width() {
        assert_eq!(fit_within(1000, 500, 200, 200), (200, 100));
    }

    #[test]
    fn test_portrait_caps_height() {
        assert_eq!(fit_within(300, 600, 200, 200), (100, 200));
    }

    #[test]
    fn test_small_image_untouched() {
        assert_eq!(fit_within(10, 10, 200, 200), (10, 10));
    }

    #[test]
    fn test_extreme_aspect_keeps_one_pixel() {
        assert_eq!(fit_within(10_000, 2, 200, 200), (200, 1));
    }

    #[test]
    fn test_rectangular_box() {
        // 800x800 into 400x300: height is the binding side
        assert_eq!(fit_within(800, 800, 400, 300), (300, 300));
    }

    #[test]
    fn test_downscale_image() {
        let img = DynamicImage::new_rgba8(400, 100);
        let out = downscale(img, 200);
        assert_eq!((out.width(), out.height()), (200, 50));
    }
}

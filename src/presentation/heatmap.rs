//! Heatmap overlay rendering
//!
//! Draws a static red radial gradient over a disease-keyed region of the
//! displayed scan. The position is a fixed fraction of the image size; it is
//! not derived from the pixel analysis.

use std::io::Cursor;

use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, Rgba, RgbaImage};

use crate::analysis::disease::Disease;
use crate::error::AnalysisError;
use crate::io::upload::decode_data_url;
use crate::preprocessing::resize::fit_within;

/// Overlay colour (RGB)
const OVERLAY_COLOR: [f32; 3] = [220.0, 38.0, 38.0];

/// Gradient alpha stops as `(distance / radius, alpha)`
const ALPHA_STOPS: [(f32, f32); 4] = [(0.0, 0.95), (0.3, 0.85), (0.6, 0.75), (1.0, 0.0)];

/// Display box for the scan view
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OverlayConfig {
    /// Maximum displayed width (default: 400)
    pub max_width: u32,
    /// Maximum displayed height (default: 300)
    pub max_height: u32,
}

impl Default for OverlayConfig {
    fn default() -> Self {
        Self {
            max_width: 400,
            max_height: 300,
        }
    }
}

/// Highlighted region as fractions of the image width/height
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HeatmapRegion {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Width
    pub w: f32,
    /// Height
    pub h: f32,
}

impl HeatmapRegion {
    /// Region for a disease; `None` gives the central default
    pub fn for_disease(disease: Option<Disease>) -> Self {
        let (x, y, w, h) = match disease {
            Some(Disease::AcutePancreatitis) => (0.2, 0.3, 0.18, 0.18),
            Some(Disease::ChronicPancreatitis) => (0.6, 0.5, 0.18, 0.18),
            Some(Disease::PancreaticCysts) => (0.35, 0.7, 0.18, 0.18),
            Some(Disease::PancreaticCancer) => (0.55, 0.2, 0.18, 0.18),
            None => (0.45, 0.35, 0.2, 0.15),
        };
        Self { x, y, w, h }
    }

    /// Gradient centre in pixels for a `width`x`height` canvas
    pub fn center(&self, width: u32, height: u32) -> (f32, f32) {
        let (w, h) = (width as f32, height as f32);
        (w * (self.x + self.w / 2.0), h * (self.y + self.h / 2.0))
    }
}

/// Gradient alpha at `t = distance / radius`
fn gradient_alpha(t: f32) -> f32 {
    if t >= 1.0 {
        return 0.0;
    }
    for pair in ALPHA_STOPS.windows(2) {
        let ((t0, a0), (t1, a1)) = (pair[0], pair[1]);
        if t <= t1 {
            return a0 + (a1 - a0) * (t - t0) / (t1 - t0);
        }
    }
    0.0
}

/// Fit the scan into the display box and optionally draw the overlay
pub fn render_overlay(
    source: &DynamicImage,
    disease: Option<Disease>,
    show_heatmap: bool,
    config: OverlayConfig,
) -> RgbaImage {
    let (w, h) = fit_within(source.width(), source.height(), config.max_width, config.max_height);
    let mut canvas = if (w, h) == (source.width(), source.height()) {
        source.to_rgba8()
    } else {
        source.resize_exact(w, h, FilterType::Triangle).to_rgba8()
    };

    if show_heatmap && w > 0 && h > 0 {
        draw_gradient(&mut canvas, HeatmapRegion::for_disease(disease));
    }
    canvas
}

/// Render the overlay for an image handed over as a `data:` URL
pub fn render_overlay_from_data_url(
    data_url: &str,
    disease: Option<Disease>,
    show_heatmap: bool,
    config: OverlayConfig,
) -> Result<RgbaImage, AnalysisError> {
    let (_, bytes) = decode_data_url(data_url)?;
    let source = image::load_from_memory(&bytes)
        .map_err(|e| AnalysisError::DecodingError(e.to_string()))?;
    Ok(render_overlay(&source, disease, show_heatmap, config))
}

/// Encode an overlay as PNG
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>, AnalysisError> {
    let mut out = Cursor::new(Vec::new());
    image
        .write_to(&mut out, ImageFormat::Png)
        .map_err(|e| AnalysisError::ProcessingError(format!("PNG encoding failed: {}", e)))?;
    Ok(out.into_inner())
}

fn draw_gradient(canvas: &mut RgbaImage, region: HeatmapRegion) {
    let (width, height) = canvas.dimensions();
    let (cx, cy) = region.center(width, height);
    let radius = width.min(height) as f32 * 0.1;
    if radius <= 0.0 {
        return;
    }
    log::debug!("Drawing heatmap at ({:.1}, {:.1}), radius {:.1}", cx, cy, radius);

    let x0 = (cx - radius).floor().max(0.0) as u32;
    let y0 = (cy - radius).floor().max(0.0) as u32;
    let x1 = ((cx + radius).ceil() as u32).min(width);
    let y1 = ((cy + radius).ceil() as u32).min(height);

    for y in y0..y1 {
        for x in x0..x1 {
            let dx = x as f32 + 0.5 - cx;
            let dy = y as f32 + 0.5 - cy;
            let alpha = gradient_alpha((dx * dx + dy * dy).sqrt() / radius);
            if alpha > 0.0 {
                let px = canvas.get_pixel_mut(x, y);
                *px = blend(*px, alpha);
            }
        }
    }
}

fn blend(px: Rgba<u8>, alpha: f32) -> Rgba<u8> {
    let Rgba([r, g, b, a]) = px;
    let mix = |c: u8, o: f32| (c as f32 * (1.0 - alpha) + o * alpha).round() as u8;
    let out_a = (alpha * 255.0 + a as f32 * (1.0 - alpha)).round() as u8;
    Rgba([
        mix(r, OVERLAY_COLOR[0]),
        mix(g, OVERLAY_COLOR[1]),
        mix(b, OVERLAY_COLOR[2]),
        out_a,
    ])
}

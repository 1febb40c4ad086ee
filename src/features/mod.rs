//! Feature extraction modules
//!
//! This module contains the image feature extraction steps:
//! - Pixel statistics (brightness, contrast, dark regions, irregularity)
//! - Dominant feature classification

pub mod dominant;
pub mod pixel_stats;

pub use dominant::{classify, DominantFeature};
pub use pixel_stats::{extract_features, ImageFeatures};

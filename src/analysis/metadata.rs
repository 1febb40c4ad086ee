//! Analysis metadata structures

use serde::{Deserialize, Serialize};

use crate::features::{DominantFeature, ImageFeatures};

/// How an analysis was produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisMetadata {
    /// Analysed image width after downscaling (absent on fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_width: Option<u32>,

    /// Analysed image height after downscaling (absent on fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_height: Option<u32>,

    /// Processing time in milliseconds, excluding simulated latency
    pub processing_time_ms: f32,

    /// Algorithm version
    pub algorithm_version: String,

    /// Extracted statistics (absent on fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<ImageFeatures>,

    /// Rule that fired (absent on fallback)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dominant_feature: Option<DominantFeature>,

    /// True when the image could not be decoded and scores were synthesized
    pub fallback: bool,

    /// Warnings (decode failures etc.)
    pub warnings: Vec<String>,
}

impl Default for AnalysisMetadata {
    fn default() -> Self {
        Self {
            image_width: None,
            image_height: None,
            processing_time_ms: 0.0,
            algorithm_version: env!("CARGO_PKG_VERSION").to_string(),
            features: None,
            dominant_feature: None,
            fallback: false,
            warnings: vec![],
        }
    }
}

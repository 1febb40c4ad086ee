//! Dominant feature classification
//!
//! Maps coarse image statistics to the single disease pattern they most
//! resemble. Rules are checked in a fixed priority order and the first match
//! wins:
//!
//! 1. Cancer-like: dark and irregular
//! 2. Cyst-like: bright with contrast
//! 3. Acute: mostly dark
//! 4. Chronic: irregular or high contrast
//! 5. Otherwise normal

use serde::{Deserialize, Serialize};

use super::pixel_stats::ImageFeatures;
use crate::analysis::disease::Disease;
use crate::config::AnalysisConfig;

/// Categorical outcome of the threshold rules
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DominantFeature {
    /// Dark regions with irregular texture
    CancerLike,
    /// Bright, high-contrast regions
    CystLike,
    /// Large dark area
    AcuteLike,
    /// Irregular texture or strong contrast
    ChronicLike,
    /// No rule matched
    Normal,
}

impl DominantFeature {
    /// Disease this pattern points to, `None` for normal
    pub fn disease(&self) -> Option<Disease> {
        match self {
            DominantFeature::CancerLike => Some(Disease::PancreaticCancer),
            DominantFeature::CystLike => Some(Disease::PancreaticCysts),
            DominantFeature::AcuteLike => Some(Disease::AcutePancreatitis),
            DominantFeature::ChronicLike => Some(Disease::ChronicPancreatitis),
            DominantFeature::Normal => None,
        }
    }
}

/// Select the dominant feature for a set of image statistics
pub fn classify(features: &ImageFeatures, config: &AnalysisConfig) -> DominantFeature {
    let dominant = if features.dark_regions > config.cancer_dark_threshold
        && features.irregular_patterns > config.cancer_irregularity_threshold
    {
        DominantFeature::CancerLike
    } else if features.brightness > config.cyst_brightness_threshold
        && features.contrast > config.cyst_contrast_threshold
    {
        DominantFeature::CystLike
    } else if features.dark_regions > config.acute_dark_threshold {
        DominantFeature::AcuteLike
    } else if features.irregular_patterns > config.chronic_irregularity_threshold
        || features.contrast > config.chronic_contrast_threshold
    {
        DominantFeature::ChronicLike
    } else {
        DominantFeature::Normal
    };

    log::debug!("Dominant feature: {:?}", dominant);
    dominant
}

#[cfg(test)]
mod tests {
    use super::*;

    fn features(brightness: f32, contrast: f32, dark: f32, irregular: f32) -> ImageFeatures {
        ImageFeatures {
            brightness,
            contrast,
            dark_regions: dark,
            irregular_patterns: irregular,
        }
    }

    fn classify_default(f: ImageFeatures) -> DominantFeature {
        classify(&f, &AnalysisConfig::default())
    }

    #[test]
    fn test_black_is_acute() {
        assert_eq!(classify_default(features(0.0, 0.0, 1.0, 0.0)), DominantFeature::AcuteLike);
    }

    #[test]
    fn test_white_is_normal() {
        assert_eq!(classify_default(features(1.0, 0.0, 0.0, 0.0)), DominantFeature::Normal);
    }

    #[test]
    fn test_cancer_checked_before_acute() {
        // Matches both the cancer and acute rules
        assert_eq!(classify_default(features(0.2, 0.1, 0.9, 0.5)), DominantFeature::CancerLike);
    }

    #[test]
    fn test_cyst_checked_before_chronic() {
        // Contrast 0.5 also satisfies the chronic rule
        assert_eq!(classify_default(features(0.8, 0.5, 0.0, 0.0)), DominantFeature::CystLike);
    }

    #[test]
    fn test_chronic_by_irregularity_or_contrast() {
        assert_eq!(classify_default(features(0.5, 0.1, 0.1, 0.3)), DominantFeature::ChronicLike);
        assert_eq!(classify_default(features(0.5, 0.5, 0.1, 0.0)), DominantFeature::ChronicLike);
    }

    #[test]
    fn test_thresholds_are_strict() {
        // Exactly at the acute threshold does not trigger
        assert_eq!(classify_default(features(0.5, 0.0, 0.4, 0.0)), DominantFeature::Normal);
    }

    #[test]
    fn test_disease_mapping() {
        assert_eq!(DominantFeature::CancerLike.disease(), Some(Disease::PancreaticCancer));
        assert_eq!(DominantFeature::CystLike.disease(), Some(Disease::PancreaticCysts));
        assert_eq!(DominantFeature::AcuteLike.disease(), Some(Disease::AcutePancreatitis));
        assert_eq!(DominantFeature::ChronicLike.disease(), Some(Disease::ChronicPancreatitis));
        assert_eq!(DominantFeature::Normal.disease(), None);
    }
}

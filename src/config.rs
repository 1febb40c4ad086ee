//! Configuration parameters for scan analysis

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Analysis configuration parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    // Image loading
    /// Longest side after downscaling, in pixels (default: 200)
    pub max_dimension: u32,

    // Feature extraction
    /// Per-pixel brightness (0-255) below which a pixel counts as dark (default: 80.0)
    pub dark_pixel_threshold: f32,

    /// Divisor normalizing summed channel differences (default: 300.0)
    pub irregularity_scale: f32,

    /// Divisor normalizing brightness standard deviation (default: 100.0)
    pub contrast_scale: f32,

    // Dominant feature rules
    /// Dark-region fraction required for the cancer-like pattern (default: 0.25)
    pub cancer_dark_threshold: f32,

    /// Irregularity required for the cancer-like pattern (default: 0.15)
    pub cancer_irregularity_threshold: f32,

    /// Brightness required for the cyst-like pattern (default: 0.6)
    pub cyst_brightness_threshold: f32,

    /// Contrast required for the cyst-like pattern (default: 0.3)
    pub cyst_contrast_threshold: f32,

    /// Dark-region fraction required for the acute pattern (default: 0.4)
    pub acute_dark_threshold: f32,

    /// Irregularity that alone triggers the chronic pattern (default: 0.25)
    pub chronic_irregularity_threshold: f32,

    /// Contrast that alone triggers the chronic pattern (default: 0.45)
    pub chronic_contrast_threshold: f32,

    // Service
    /// Lower bound of the simulated latency in milliseconds (default: 2000)
    pub min_delay_ms: u64,

    /// Upper bound of the simulated latency in milliseconds (default: 4000)
    pub max_delay_ms: u64,

    /// Seed for the random source; `None` seeds from entropy
    pub seed: Option<u64>,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_dimension: 200,
            dark_pixel_threshold: 80.0,
            irregularity_scale: 300.0,
            contrast_scale: 100.0,
            cancer_dark_threshold: 0.25,
            cancer_irregularity_threshold: 0.15,
            cyst_brightness_threshold: 0.6,
            cyst_contrast_threshold: 0.3,
            acute_dark_threshold: 0.4,
            chronic_irregularity_threshold: 0.25,
            chronic_contrast_threshold: 0.45,
            min_delay_ms: 2000,
            max_delay_ms: 4000,
            seed: None,
        }
    }
}

impl AnalysisConfig {
    /// Same defaults, no simulated latency
    pub fn without_delay() -> Self {
        Self {
            min_delay_ms: 0,
            max_delay_ms: 0,
            ..Self::default()
        }
    }

    /// Load a JSON config file; missing fields fall back to defaults
    pub fn from_json_file(path: &Path) -> Result<Self, AnalysisError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)
            .map_err(|e| AnalysisError::Config(format!("{}: {}", path.display(), e)))?;
        config.validate()?;
        log::debug!("Loaded analysis config from {}", path.display());
        Ok(config)
    }

    /// Reject values the pipeline cannot work with
    pub fn validate(&self) -> Result<(), AnalysisError> {
        if self.max_dimension == 0 {
            return Err(AnalysisError::Config("max_dimension must be positive".to_string()));
        }
        if self.irregularity_scale <= 0.0 || self.contrast_scale <= 0.0 {
            return Err(AnalysisError::Config("normalization scales must be positive".to_string()));
        }
        if self.min_delay_ms > self.max_delay_ms {
            return Err(AnalysisError::Config(format!(
                "min_delay_ms ({}) exceeds max_delay_ms ({})",
                self.min_delay_ms, self.max_delay_ms
            )));
        }
        Ok(())
    }
}

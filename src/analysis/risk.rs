//! Risk levels and result summary
//!
//! Buckets each score into a display risk level and summarizes a result into
//! its highest and lowest findings.
//!
//! # Example
//!
//! ```
//! use pancrescan::analysis::risk::RiskLevel;
//!
//! assert_eq!(RiskLevel::from_probability(0.85), RiskLevel::High);
//! assert_eq!(RiskLevel::from_probability(0.05).label(), "Very Low Risk");
//! ```

use serde::{Deserialize, Serialize};

use super::disease::Disease;
use super::result::AnalysisResult;

/// Highest score above which a finding is flagged for follow-up
pub const SIGNIFICANT_FINDING_THRESHOLD: f32 = 0.5;

/// Notice shown with every result and report
pub const MEDICAL_NOTICE: &str = "This AI analysis is provided as a screening tool to assist healthcare providers. It should not replace professional medical evaluation. Please consult with a qualified healthcare provider to discuss these results and determine appropriate next steps. Early detection and proper medical evaluation are essential for optimal outcomes.";

/// Display risk bucket for a single score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskLevel {
    /// <= 0.1
    VeryLow,
    /// (0.1, 0.3]
    Low,
    /// (0.3, 0.5]
    Moderate,
    /// (0.5, 0.7]
    Elevated,
    /// > 0.7
    High,
}

impl RiskLevel {
    /// Bucket a probability
    pub fn from_probability(probability: f32) -> Self {
        if probability > 0.7 {
            RiskLevel::High
        } else if probability > 0.5 {
            RiskLevel::Elevated
        } else if probability > 0.3 {
            RiskLevel::Moderate
        } else if probability > 0.1 {
            RiskLevel::Low
        } else {
            RiskLevel::VeryLow
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            RiskLevel::High => "High Risk",
            RiskLevel::Elevated => "Elevated Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::VeryLow => "Very Low Risk",
        }
    }

    /// Bar colour (hex)
    pub fn color_hex(&self) -> &'static str {
        match self {
            RiskLevel::High => "#FF4757",
            RiskLevel::Elevated => "#FF6348",
            RiskLevel::Moderate => "#FFB142",
            RiskLevel::Low => "#26DE81",
            RiskLevel::VeryLow => "#2ED573",
        }
    }

    /// Bar colour as RGB
    pub fn color_rgb(&self) -> [u8; 3] {
        let hex = self.color_hex().trim_start_matches('#');
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).unwrap_or(0);
        [channel(0), channel(2), channel(4)]
    }
}

/// Highest/lowest findings of a result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskSummary {
    /// Disease with the highest score
    pub highest: Disease,
    /// Highest score
    pub highest_probability: f32,
    /// Disease with the lowest score
    pub lowest: Disease,
    /// Lowest score
    pub lowest_probability: f32,
    /// Highest score exceeds [`SIGNIFICANT_FINDING_THRESHOLD`]
    pub significant_finding: bool,
}

impl RiskSummary {
    /// Summarize a result; `None` if it carries no scores
    pub fn from_result(result: &AnalysisResult) -> Option<Self> {
        let (highest, highest_probability) = result.highest()?;
        let (lowest, lowest_probability) = result.lowest()?;
        Some(Self {
            highest,
            highest_probability,
            lowest,
            lowest_probability,
            significant_finding: highest_probability > SIGNIFICANT_FINDING_THRESHOLD,
        })
    }

    /// Risk level of the top finding
    pub fn highest_risk(&self) -> RiskLevel {
        RiskLevel::from_probability(self.highest_probability)
    }

    /// Follow-up text for a significant finding
    pub fn finding_notice(&self) -> Option<String> {
        self.significant_finding.then(|| {
            format!(
                "Analysis indicates elevated probability for {}. This finding requires professional medical evaluation. Please consult a healthcare provider to discuss these results and determine appropriate next steps.",
                self.highest.display_name()
            )
        })
    }
}

/// Format a probability as a one-decimal percentage, e.g. `87.3%`
pub fn format_percent(probability: f32) -> String {
    format!("{:.1}%", probability * 100.0)
}

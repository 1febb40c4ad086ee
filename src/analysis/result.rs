//! Analysis result types

use std::collections::BTreeMap;

use chrono::Utc;
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::disease::Disease;
use super::metadata::AnalysisMetadata;
use super::probability::{top_disease, DiseaseProbabilities};

/// Complete analysis result, handed from the upload step to the results view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// `analysis_<unix-millis>_<suffix>`
    pub analysis_id: String,

    /// Score per disease, each in [0.01, 0.99], not normalized
    pub probabilities: DiseaseProbabilities,

    /// Static explanation per disease
    pub explanations: BTreeMap<Disease, String>,

    /// Analysis metadata
    pub metadata: AnalysisMetadata,
}

impl AnalysisResult {
    /// Build a result with the standard explanations attached
    pub fn new(
        analysis_id: String,
        probabilities: DiseaseProbabilities,
        metadata: AnalysisMetadata,
    ) -> Self {
        let explanations = Disease::ALL
            .into_iter()
            .map(|d| (d, d.explanation().to_string()))
            .collect();
        Self {
            analysis_id,
            probabilities,
            explanations,
            metadata,
        }
    }

    /// Disease with the highest score
    pub fn highest(&self) -> Option<(Disease, f32)> {
        top_disease(&self.probabilities)
    }

    /// Disease with the lowest score
    pub fn lowest(&self) -> Option<(Disease, f32)> {
        self.probabilities
            .iter()
            .min_by(|a, b| a.1.total_cmp(b.1))
            .map(|(d, p)| (*d, *p))
    }

    /// Explanation text for one disease
    pub fn explanation(&self, disease: Disease) -> Option<&str> {
        self.explanations.get(&disease).map(String::as_str)
    }
}

/// Generate `analysis_<unix-millis>_<9 lowercase alphanumerics>`
pub fn generate_analysis_id<R: Rng + ?Sized>(rng: &mut R) -> String {
    let suffix: String = (0..9)
        .map(|_| char::from(rng.sample(Alphanumeric)).to_ascii_lowercase())
        .collect();
    format!("analysis_{}_{}", Utc::now().timestamp_millis(), suffix)
}

/// Id used for results synthesized after a decode failure
pub fn fallback_analysis_id() -> String {
    format!("analysis_{}_fallback", Utc::now().timestamp_millis())
}

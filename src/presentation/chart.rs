//! Probability bar chart model
//!
//! Bars are sorted by descending probability; each carries its percentage
//! label, a height proportional to the probability (0-100) and a risk bucket.

use serde::{Deserialize, Serialize};

use crate::analysis::disease::Disease;
use crate::analysis::probability::DiseaseProbabilities;
use crate::analysis::risk::{format_percent, RiskLevel};

/// One bar of the chart
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartBar {
    /// Disease key
    pub disease: Disease,
    /// Raw score
    pub probability: f32,
    /// One-decimal percentage label, e.g. `87.3%`
    pub label: String,
    /// Bar height as a percentage of the chart height
    pub height_percent: f32,
    /// Risk bucket
    pub risk: RiskLevel,
    /// Bar colour (RGB) for the risk bucket
    pub color: [u8; 3],
}

/// Build chart bars, highest probability first
pub fn build_chart(probabilities: &DiseaseProbabilities) -> Vec<ChartBar> {
    let mut bars: Vec<ChartBar> = probabilities
        .iter()
        .map(|(disease, &probability)| {
            let risk = RiskLevel::from_probability(probability);
            ChartBar {
                disease: *disease,
                probability,
                label: format_percent(probability),
                height_percent: probability * 100.0,
                risk,
                color: risk.color_rgb(),
            }
        })
        .collect();
    bars.sort_by(|a, b| b.probability.total_cmp(&a.probability));
    bars
}

/// Render bars as horizontal text rows `width` characters wide
///
/// ```
/// use pancrescan::presentation::chart::{build_chart, render_text};
/// use pancrescan::Disease;
///
/// let scores = Disease::ALL.into_iter().zip([0.9, 0.1, 0.05, 0.02]).collect();
/// let text = render_text(&build_chart(&scores), 20);
/// assert!(text.lines().next().unwrap().starts_with("Acute Pancreatitis"));
/// ```
pub fn render_text(bars: &[ChartBar], width: usize) -> String {
    let name_width = bars
        .iter()
        .map(|b| b.disease.display_name().len())
        .max()
        .unwrap_or(0);

    let mut out = String::new();
    for bar in bars {
        let filled = ((bar.probability * width as f32).round() as usize).min(width);
        out.push_str(&format!(
            "{:<name_width$}  {}{}  {:>6}  {}\n",
            bar.disease.display_name(),
            "#".repeat(filled),
            ".".repeat(width - filled),
            bar.label,
            bar.risk.label(),
        ));
    }
    out
}

//! # PancreScan
//!
//! An offline demo engine for pancreatic scan "analysis". A pixel heuristic
//! (not a trained model) scores four conditions, and the results feed a
//! chart, a decorative heatmap overlay, a PDF report and an FAQ chatbot.
//!
//! ## Features
//!
//! - **Image loading**: JPEG/PNG decoding with aspect-preserving downscaling
//! - **Feature extraction**: brightness, contrast, dark regions and colour irregularity
//! - **Probability mapping**: threshold rules plus a seedable random source
//! - **Presentation**: bar chart model, heatmap overlay, PDF/text report, chatbot
//!
//! ## Quick Start
//!
//! ```no_run
//! use pancrescan::{analyze_image, AnalysisConfig};
//! use rand::{rngs::StdRng, SeedableRng};
//!
//! let bytes = std::fs::read("scan.png")?;
//! let mut rng = StdRng::seed_from_u64(7);
//! let result = analyze_image(&bytes, &AnalysisConfig::default(), &mut rng)?;
//!
//! for (disease, p) in &result.probabilities {
//!     println!("{}: {:.1}%", disease, p * 100.0);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Upload → Decode + Downscale → Pixel Statistics → Dominant Feature → Probabilities → Presentation
//! ```
//!
//! Scores are clamped independently to [0.01, 0.99] and are not a probability
//! distribution. Repeated runs with an entropy-seeded source give different
//! scores for the same image.

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod analysis;
pub mod config;
pub mod error;
pub mod features;
pub mod io;
pub mod preprocessing;
pub mod presentation;
pub mod service;

// Re-export main types
pub use analysis::disease::Disease;
pub use analysis::metadata::AnalysisMetadata;
pub use analysis::result::AnalysisResult;
pub use analysis::risk::{RiskLevel, RiskSummary};
pub use config::AnalysisConfig;
pub use error::AnalysisError;
pub use io::image_buffer::ImageBuffer;
pub use service::AnalysisService;

use std::time::Instant;

use rand::Rng;

use analysis::probability::{fallback_probabilities, map_probabilities};
use analysis::result::{fallback_analysis_id, generate_analysis_id};
use features::{classify, extract_features};

/// Main analysis function
///
/// Decodes an uploaded image and scores it. A file that cannot be decoded
/// does not fail the analysis: it produces a fallback result (see
/// [`fallback_result`]) with `metadata.fallback` set.
///
/// # Arguments
///
/// * `bytes` - Encoded image file contents
/// * `config` - Analysis configuration parameters
/// * `rng` - Random source for the heuristic
///
/// # Errors
///
/// Returns `AnalysisError` only for an invalid configuration.
///
/// # Example
///
/// ```no_run
/// use pancrescan::{analyze_image, AnalysisConfig};
///
/// let result = analyze_image(b"not an image", &AnalysisConfig::default(), &mut rand::thread_rng())?;
/// assert!(result.metadata.fallback);
/// # Ok::<(), pancrescan::AnalysisError>(())
/// ```
pub fn analyze_image<R: Rng + ?Sized>(
    bytes: &[u8],
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    config.validate()?;
    log::debug!("Starting image analysis: {} bytes", bytes.len());

    match io::decoder::decode_image(bytes, config.max_dimension) {
        Ok(buffer) => analyze_buffer(&buffer, config, rng),
        Err(e) if e.is_recoverable() => {
            log::warn!("Image analysis failed, using fallback scores: {}", e);
            Ok(fallback_result(&e.to_string(), rng))
        }
        Err(e) => Err(e),
    }
}

/// Score an already decoded pixel buffer
///
/// # Errors
///
/// Returns `AnalysisError::InvalidInput` for an empty buffer.
pub fn analyze_buffer<R: Rng + ?Sized>(
    buffer: &ImageBuffer,
    config: &AnalysisConfig,
    rng: &mut R,
) -> Result<AnalysisResult, AnalysisError> {
    let start_time = Instant::now();

    let features = extract_features(buffer, config)?;
    let dominant = classify(&features, config);
    let probabilities = map_probabilities(dominant, rng);

    let metadata = AnalysisMetadata {
        image_width: Some(buffer.width()),
        image_height: Some(buffer.height()),
        processing_time_ms: start_time.elapsed().as_secs_f32() * 1000.0,
        features: Some(features),
        dominant_feature: Some(dominant),
        ..AnalysisMetadata::default()
    };

    let result = AnalysisResult::new(generate_analysis_id(rng), probabilities, metadata);
    log::debug!("Analysis {} complete: {:?}", result.analysis_id, result.probabilities);
    Ok(result)
}

/// Randomized but plausible result for an image that could not be analysed
///
/// Exactly one disease scores above 0.8.
pub fn fallback_result<R: Rng + ?Sized>(reason: &str, rng: &mut R) -> AnalysisResult {
    let (disease, probabilities) = fallback_probabilities(rng);
    log::debug!("Fallback result favours {}", disease.key());

    let metadata = AnalysisMetadata {
        fallback: true,
        warnings: vec![format!("Image could not be analysed: {}", reason)],
        ..AnalysisMetadata::default()
    };
    AnalysisResult::new(fallback_analysis_id(), probabilities, metadata)
}

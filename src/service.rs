//! Asynchronous analysis service
//!
//! Wraps [`analyze_image`](crate::analyze_image) with the simulated network
//! latency of the upload flow and owns the random source. There is no remote
//! call: the latency is a plain `tokio` sleep.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::analysis::result::AnalysisResult;
use crate::config::AnalysisConfig;
use crate::error::AnalysisError;
use crate::io::upload::UploadedFile;

/// Result of analysing an upload, plus the preview image for the results view
#[derive(Debug, Clone)]
pub struct UploadAnalysis {
    /// Scores and explanations
    pub result: AnalysisResult,
    /// Source image as a `data:` URL, `None` when no preview exists (DICOM)
    pub image_data_url: Option<String>,
}

/// Local analysis service with simulated latency
#[derive(Debug)]
pub struct AnalysisService {
    config: AnalysisConfig,
    rng: StdRng,
}

impl AnalysisService {
    /// Create a service; seeds from `config.seed` or from entropy
    pub fn new(config: AnalysisConfig) -> Result<Self, AnalysisError> {
        config.validate()?;
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Ok(Self { config, rng })
    }

    /// Draw the next simulated latency
    pub fn next_delay(&mut self) -> Duration {
        let (min, max) = (self.config.min_delay_ms, self.config.max_delay_ms);
        let ms = if max > min { self.rng.gen_range(min..=max) } else { min };
        Duration::from_millis(ms)
    }

    /// Analyse encoded image bytes after the simulated latency
    ///
    /// Undecodable data yields a fallback result, not an error.
    pub async fn analyze(&mut self, bytes: &[u8]) -> Result<AnalysisResult, AnalysisError> {
        let delay = self.next_delay();
        if !delay.is_zero() {
            log::debug!("Simulating {} ms of analysis latency", delay.as_millis());
            tokio::time::sleep(delay).await;
        }
        crate::analyze_image(bytes, &self.config, &mut self.rng)
    }

    /// Validate and analyse an upload
    ///
    /// The preview is dropped when the image could not be decoded, so the
    /// results view never tries to render undecodable bytes.
    ///
    /// # Errors
    ///
    /// `AnalysisError::UnsupportedFileType` when the upload is not JPEG, PNG
    /// or DICOM. This is the only error surfaced to the user.
    pub async fn analyze_upload(
        &mut self,
        upload: &UploadedFile,
    ) -> Result<UploadAnalysis, AnalysisError> {
        let mut image_data_url = upload.preview_data_url()?;
        log::info!("Analysing upload {} ({} bytes)", upload.name, upload.bytes.len());
        let result = self.analyze(&upload.bytes).await?;
        if result.metadata.fallback && image_data_url.take().is_some() {
            log::warn!("Preview for {} dropped: image could not be decoded", upload.name);
        }
        Ok(UploadAnalysis {
            result,
            image_data_url,
        })
    }
}

//! Results view state
//!
//! Holds one analysis result together with the view toggles, the chat
//! transcript and the report download flag.

use std::path::Path;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::chart::{build_chart, ChartBar};
use super::chatbot::{respond, APOLOGY, WELCOME};
use super::heatmap::{encode_png, render_overlay_from_data_url, OverlayConfig};
use super::report::generate_pdf_report;
use crate::analysis::result::AnalysisResult;
use crate::error::AnalysisError;

/// Author of a chat message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sender {
    /// Person asking
    User,
    /// Assistant
    Bot,
}

/// One transcript entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique within a session
    pub id: String,
    /// Message text
    pub text: String,
    /// Author
    pub sender: Sender,
    /// Creation time
    pub timestamp: DateTime<Utc>,
}

/// State behind the results view
#[derive(Debug, Clone)]
pub struct ResultsSession {
    result: AnalysisResult,
    image_data_url: Option<String>,
    show_heatmap: bool,
    generating_report: bool,
    messages: Vec<ChatMessage>,
    next_message: u64,
}

impl ResultsSession {
    /// Open a session; the transcript starts with the welcome message
    pub fn new(result: AnalysisResult, image_data_url: Option<String>) -> Self {
        let mut session = Self {
            result,
            image_data_url,
            show_heatmap: false,
            generating_report: false,
            messages: Vec::new(),
            next_message: 0,
        };
        session.push(WELCOME.to_string(), Sender::Bot);
        session
    }

    /// Result on display
    pub fn result(&self) -> &AnalysisResult {
        &self.result
    }

    /// Source image, if the upload had a preview
    pub fn image_data_url(&self) -> Option<&str> {
        self.image_data_url.as_deref()
    }

    /// Whether the overlay is drawn
    pub fn show_heatmap(&self) -> bool {
        self.show_heatmap
    }

    /// Flip the overlay toggle and return the new state
    pub fn toggle_heatmap(&mut self) -> bool {
        self.show_heatmap = !self.show_heatmap;
        self.show_heatmap
    }

    /// True while a report is being written
    pub fn is_generating_report(&self) -> bool {
        self.generating_report
    }

    /// Chat transcript, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Chart bars for the result
    pub fn chart(&self) -> Vec<ChartBar> {
        build_chart(&self.result.probabilities)
    }

    /// Send a chat message and return the reply
    ///
    /// Blank input is ignored and returns `None`. A failed reply is logged and
    /// replaced by an apology in the transcript.
    pub fn send_message(&mut self, text: &str) -> Option<&ChatMessage> {
        let text = text.trim();
        if text.is_empty() {
            return None;
        }
        self.push(text.to_string(), Sender::User);

        let reply = match respond(text, Some(&self.result)) {
            Ok(reply) => reply,
            Err(e) => {
                log::error!("Chat reply failed: {}", e);
                APOLOGY.to_string()
            }
        };
        self.push(reply, Sender::Bot);
        self.messages.last()
    }

    /// Render the scan view as PNG, honouring the overlay toggle
    ///
    /// Returns `Ok(None)` when there is no preview image (DICOM uploads) or the
    /// preview cannot be decoded.
    pub fn heatmap_png(&self, config: OverlayConfig) -> Result<Option<Vec<u8>>, AnalysisError> {
        let Some(url) = self.image_data_url.as_deref() else {
            return Ok(None);
        };
        let top = self.result.highest().map(|(d, _)| d);
        let overlay = match render_overlay_from_data_url(url, top, self.show_heatmap, config) {
            Ok(overlay) => overlay,
            Err(e) => {
                log::warn!("Scan view unavailable: {}", e);
                return Ok(None);
            }
        };
        encode_png(&overlay).map(Some)
    }

    /// Generate the PDF report and write it to `path`
    ///
    /// The generating flag is cleared whether or not this succeeds, so a
    /// failed download can be retried.
    pub fn download_report(&mut self, path: &Path) -> Result<(), AnalysisError> {
        self.generating_report = true;
        let outcome = generate_pdf_report(&self.result, self.image_data_url.as_deref())
            .and_then(|pdf| std::fs::write(path, pdf).map_err(AnalysisError::from));
        self.generating_report = false;

        match &outcome {
            Ok(()) => log::info!("Report written to {}", path.display()),
            Err(e) => log::error!("Report generation failed: {}", e),
        }
        outcome
    }

    fn push(&mut self, text: String, sender: Sender) {
        self.next_message += 1;
        let timestamp = Utc::now();
        self.messages.push(ChatMessage {
            id: format!("msg_{}_{}", timestamp.timestamp_millis(), self.next_message),
            text,
            sender,
            timestamp,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::disease::Disease;
    use crate::analysis::metadata::AnalysisMetadata;
    use crate::io::upload::to_data_url;
    use image::{Rgba, RgbaImage};

    fn result() -> AnalysisResult {
        let probabilities = Disease::ALL.into_iter().zip([0.05, 0.84, 0.09, 0.02]).collect();
        AnalysisResult::new("analysis_2_session".to_string(), probabilities, AnalysisMetadata::default())
    }

    fn png_url() -> String {
        let img = RgbaImage::from_pixel(40, 30, Rgba([90, 90, 90, 255]));
        to_data_url(&encode_png(&img).unwrap(), "image/png")
    }

    #[test]
    fn test_starts_with_welcome() {
        let session = ResultsSession::new(result(), None);
        assert_eq!(session.messages().len(), 1);
        assert_eq!(session.messages()[0].text, WELCOME);
        assert_eq!(session.messages()[0].sender, Sender::Bot);
        assert!(!session.show_heatmap());
    }

    #[test]
    fn test_send_message_appends_pair() {
        let mut session = ResultsSession::new(result(), None);
        let reply = session.send_message("what is most likely?").unwrap().text.clone();
        assert!(reply.contains("Chronic Pancreatitis shows the highest probability at 84.0%"));
        assert_eq!(session.messages().len(), 3);
        assert_eq!(session.messages()[1].sender, Sender::User);

        let ids: std::collections::HashSet<_> = session.messages().iter().map(|m| &m.id).collect();
        assert_eq!(ids.len(), 3);
        assert!(session.messages()[2].id.ends_with("_3"));
    }

    #[test]
    fn test_blank_message_ignored() {
        let mut session = ResultsSession::new(result(), None);
        assert!(session.send_message("   ").is_none());
        assert_eq!(session.messages().len(), 1);
    }

    #[test]
    fn test_chat_failure_becomes_apology() {
        let mut broken = result();
        broken.explanations.clear();
        let mut session = ResultsSession::new(broken, None);
        let reply = session.send_message("biggest concern").unwrap();
        assert_eq!(reply.text, APOLOGY);
    }

    #[test]
    fn test_toggle_heatmap() {
        let mut session = ResultsSession::new(result(), Some(png_url()));
        let hidden = session.heatmap_png(OverlayConfig::default()).unwrap().unwrap();
        assert!(session.toggle_heatmap());
        let shown = session.heatmap_png(OverlayConfig::default()).unwrap().unwrap();
        assert_ne!(shown, hidden);
        assert!(!session.toggle_heatmap());
    }

    #[test]
    fn test_no_preview_no_heatmap() {
        let session = ResultsSession::new(result(), None);
        assert!(session.heatmap_png(OverlayConfig::default()).unwrap().is_none());
    }

    #[test]
    fn test_undecodable_preview_degrades() {
        let url = to_data_url(b"\x89PNG\r\n\x1a\n cut short", "image/png");
        let mut session = ResultsSession::new(result(), Some(url));
        session.toggle_heatmap();
        assert!(session.heatmap_png(OverlayConfig::default()).unwrap().is_none());

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.pdf");
        session.download_report(&path).unwrap();
        session.download_report(&path).unwrap();
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }

    #[test]
    fn test_download_report_and_retry() {
        let dir = tempfile::tempdir().unwrap();
        let mut session = ResultsSession::new(result(), Some(png_url()));

        let missing = dir.path().join("no_such_dir").join("report.pdf");
        assert!(session.download_report(&missing).is_err());
        assert!(!session.is_generating_report());

        let path = dir.path().join("report.pdf");
        session.download_report(&path).unwrap();
        assert!(!session.is_generating_report());
        assert!(std::fs::read(&path).unwrap().starts_with(b"%PDF"));
    }
}

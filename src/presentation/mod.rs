//! Presentation modules
//!
//! Everything the results view shows for an [`AnalysisResult`](crate::AnalysisResult):
//! - Probability bar chart
//! - Heatmap overlay
//! - PDF and text report
//! - FAQ chatbot
//! - Session state tying them together

pub mod chart;
pub mod chatbot;
pub mod heatmap;
pub mod report;
pub mod session;

pub use chart::{build_chart, ChartBar};
pub use chatbot::{respond, ChatError};
pub use session::{ChatMessage, ResultsSession, Sender};

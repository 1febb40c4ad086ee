//! Error types for the scan analysis engine

use thiserror::Error;

/// Errors that can occur during scan analysis
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Invalid input parameters
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Upload rejected before decoding (wrong MIME type / extension)
    #[error("Unsupported file type: {0}")]
    UnsupportedFileType(String),

    /// Image decoding error
    #[error("Decoding error: {0}")]
    DecodingError(String),

    /// Processing error during analysis
    #[error("Processing error: {0}")]
    ProcessingError(String),

    /// Report generation error
    #[error("Report error: {0}")]
    ReportError(String),

    /// Configuration could not be parsed
    #[error("Config error: {0}")]
    Config(String),

    /// Filesystem error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl AnalysisError {
    /// Whether the pipeline may recover from this error with a fallback result
    pub fn is_recoverable(&self) -> bool {
        matches!(self, AnalysisError::DecodingError(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_messages() {
        let err = AnalysisError::DecodingError("bad header".to_string());
        assert_eq!(err.to_string(), "Decoding error: bad header");

        let err = AnalysisError::UnsupportedFileType("text/plain".to_string());
        assert_eq!(err.to_string(), "Unsupported file type: text/plain");
    }

    #[test]
    fn test_only_decoding_is_recoverable() {
        assert!(AnalysisError::DecodingError(String::new()).is_recoverable());
        assert!(!AnalysisError::InvalidInput(String::new()).is_recoverable());
        assert!(!AnalysisError::UnsupportedFileType(String::new()).is_recoverable());
    }
}

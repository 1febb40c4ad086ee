//! Upload validation and data URL handoff
//!
//! The results view receives the source image as a `data:` URL alongside the
//! analysis result. Only JPEG, PNG and DICOM uploads are accepted; DICOM passes
//! validation but cannot be previewed or decoded, so it ends up on the fallback
//! path.

use std::path::Path;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::AnalysisError;

/// Accepted upload kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UploadKind {
    /// JPEG photo or export
    Jpeg,
    /// PNG screenshot or export
    Png,
    /// DICOM (.dcm) scan
    Dicom,
}

impl UploadKind {
    /// Canonical MIME type
    pub fn mime(&self) -> &'static str {
        match self {
            UploadKind::Jpeg => "image/jpeg",
            UploadKind::Png => "image/png",
            UploadKind::Dicom => "application/dicom",
        }
    }

    /// Whether a preview image can be produced
    pub fn has_preview(&self) -> bool {
        !matches!(self, UploadKind::Dicom)
    }
}

/// A file picked by the user
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// Original file name
    pub name: String,
    /// MIME type reported by the picker, if any
    pub mime: Option<String>,
    /// File contents
    pub bytes: Vec<u8>,
}

impl UploadedFile {
    /// Read a file from disk; the MIME type is inferred from its extension
    pub fn from_path(path: &Path) -> Result<Self, AnalysisError> {
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        let mime = mime_from_extension(&name).map(str::to_string);
        Ok(Self { name, mime, bytes })
    }

    /// Validate the upload's type
    pub fn kind(&self) -> Result<UploadKind, AnalysisError> {
        validate_upload(&self.name, self.mime.as_deref())
    }

    /// Preview `data:` URL, `None` for DICOM
    pub fn preview_data_url(&self) -> Result<Option<String>, AnalysisError> {
        let kind = self.kind()?;
        Ok(kind
            .has_preview()
            .then(|| to_data_url(&self.bytes, kind.mime())))
    }
}

/// MIME type implied by a file name's extension
pub fn mime_from_extension(name: &str) -> Option<&'static str> {
    let ext = name.rsplit_once('.')?.1.to_ascii_lowercase();
    match ext.as_str() {
        "jpg" | "jpeg" => Some("image/jpeg"),
        "png" => Some("image/png"),
        "dcm" => Some("application/dicom"),
        "gif" => Some("image/gif"),
        "bmp" => Some("image/bmp"),
        "webp" => Some("image/webp"),
        "txt" => Some("text/plain"),
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

/// Check an upload's MIME type (or, failing that, its extension)
///
/// # Errors
///
/// `AnalysisError::UnsupportedFileType` for anything other than JPEG, PNG or
/// DICOM.
pub fn validate_upload(name: &str, mime: Option<&str>) -> Result<UploadKind, AnalysisError> {
    let mime = mime.or_else(|| mime_from_extension(name)).unwrap_or("");
    let kind = match mime {
        "image/jpeg" => Some(UploadKind::Jpeg),
        "image/png" => Some(UploadKind::Png),
        "image/dicom" | "application/dicom" => Some(UploadKind::Dicom),
        _ if name.to_ascii_lowercase().ends_with(".dcm") => Some(UploadKind::Dicom),
        _ => None,
    };
    kind.ok_or_else(|| {
        log::warn!("Rejected upload {} ({})", name, mime);
        AnalysisError::UnsupportedFileType(format!(
            "{}: please upload a valid image file (JPG, PNG, or DICOM)",
            name
        ))
    })
}

/// Encode file contents as a `data:` URL
pub fn to_data_url(bytes: &[u8], mime: &str) -> String {
    format!("data:{};base64,{}", mime, STANDARD.encode(bytes))
}

/// Split a base64 `data:` URL into its MIME type and decoded payload
pub fn decode_data_url(url: &str) -> Result<(String, Vec<u8>), AnalysisError> {
    let rest = url
        .strip_prefix("data:")
        .ok_or_else(|| AnalysisError::InvalidInput("not a data URL".to_string()))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| AnalysisError::InvalidInput("data URL has no payload".to_string()))?;
    let mime = header
        .strip_suffix(";base64")
        .ok_or_else(|| AnalysisError::InvalidInput("data URL is not base64".to_string()))?;
    let bytes = STANDARD
        .decode(payload)
        .map_err(|e| AnalysisError::InvalidInput(format!("bad base64 payload: {}", e)))?;
    Ok((mime.to_string(), bytes))
}

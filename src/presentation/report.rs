//! Downloadable analysis report
//!
//! The report is laid out once as a list of [`ReportLine`]s and then rendered
//! either as an A4 PDF (`printpdf`, built-in Helvetica) or as plain text for
//! the terminal.

use std::io::BufWriter;

use chrono::{DateTime, Local};
use printpdf::{BuiltinFont, Mm, PdfDocument};

use crate::analysis::result::AnalysisResult;
use crate::analysis::risk::{format_percent, RiskLevel, RiskSummary, MEDICAL_NOTICE};
use crate::error::AnalysisError;
use crate::io::upload::decode_data_url;

/// Report title
pub const REPORT_TITLE: &str = "PancreScan AI Analysis Report";

const PAGE_WIDTH: Mm = Mm(210.0);
const PAGE_HEIGHT: Mm = Mm(297.0);
const TOP: f32 = 280.0;
const BOTTOM: f32 = 20.0;
const LEFT: f32 = 20.0;
const WRAP_CHARS: usize = 95;

/// Visual weight of a report line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineStyle {
    /// Document title
    Title,
    /// Section heading
    Heading,
    /// Body text
    Body,
    /// Small print
    Note,
}

impl LineStyle {
    fn font_size(self) -> f32 {
        match self {
            LineStyle::Title => 16.0,
            LineStyle::Heading => 12.0,
            LineStyle::Body => 10.0,
            LineStyle::Note => 8.5,
        }
    }

    fn advance(self) -> f32 {
        match self {
            LineStyle::Title => 10.0,
            LineStyle::Heading => 7.0,
            LineStyle::Body => 5.0,
            LineStyle::Note => 4.5,
        }
    }
}

/// One laid-out line
#[derive(Debug, Clone, PartialEq)]
pub struct ReportLine {
    /// Text, already wrapped
    pub text: String,
    /// Weight
    pub style: LineStyle,
    /// Left indent in millimetres
    pub indent: f32,
}

impl ReportLine {
    fn new(text: impl Into<String>, style: LineStyle, indent: f32) -> Self {
        Self {
            text: text.into(),
            style,
            indent,
        }
    }
}

/// Lay out the report for a result
///
/// # Arguments
///
/// * `result` - Analysis to report on
/// * `image_size` - Source image dimensions, if known
/// * `generated_at` - Timestamp printed in the header
pub fn layout_report(
    result: &AnalysisResult,
    image_size: Option<(u32, u32)>,
    generated_at: DateTime<Local>,
) -> Vec<ReportLine> {
    let mut lines = vec![
        ReportLine::new(REPORT_TITLE, LineStyle::Title, 0.0),
        ReportLine::new(
            format!("Date: {}", generated_at.format("%Y-%m-%d %H:%M")),
            LineStyle::Body,
            0.0,
        ),
        ReportLine::new(format!("Analysis ID: {}", result.analysis_id), LineStyle::Body, 0.0),
    ];
    if let Some((w, h)) = image_size {
        lines.push(ReportLine::new(format!("Scan: {} x {} px", w, h), LineStyle::Body, 0.0));
    }
    if result.metadata.fallback {
        lines.push(ReportLine::new(
            "The scan could not be decoded; scores are a fallback estimate.",
            LineStyle::Note,
            0.0,
        ));
    }

    lines.push(ReportLine::new("Analysis Results", LineStyle::Heading, 0.0));
    let mut ranked: Vec<_> = result.probabilities.iter().collect();
    ranked.sort_by(|a, b| b.1.total_cmp(a.1));
    for (disease, &p) in ranked {
        lines.push(ReportLine::new(
            format!(
                "{}: {} ({})",
                disease.display_name(),
                format_percent(p),
                RiskLevel::from_probability(p).label()
            ),
            LineStyle::Body,
            5.0,
        ));
    }

    if let Some(summary) = RiskSummary::from_result(result) {
        lines.push(ReportLine::new("Summary of Findings", LineStyle::Heading, 0.0));
        lines.push(ReportLine::new(
            format!(
                "Highest probability: {} ({})",
                summary.highest.display_name(),
                format_percent(summary.highest_probability)
            ),
            LineStyle::Body,
            5.0,
        ));
        lines.push(ReportLine::new(
            format!(
                "Lowest probability: {} ({})",
                summary.lowest.display_name(),
                format_percent(summary.lowest_probability)
            ),
            LineStyle::Body,
            5.0,
        ));
        if let Some(notice) = summary.finding_notice() {
            push_wrapped(&mut lines, &notice, LineStyle::Body, 5.0);
        }

        if let Some(explanation) = result.explanation(summary.highest) {
            lines.push(ReportLine::new(
                format!("About {}", summary.highest.display_name()),
                LineStyle::Heading,
                0.0,
            ));
            push_wrapped(&mut lines, explanation, LineStyle::Body, 5.0);
        }
    }

    lines.push(ReportLine::new("Important Notice", LineStyle::Heading, 0.0));
    push_wrapped(&mut lines, MEDICAL_NOTICE, LineStyle::Note, 0.0);
    lines
}

fn push_wrapped(lines: &mut Vec<ReportLine>, text: &str, style: LineStyle, indent: f32) {
    for line in wrap_text(text, WRAP_CHARS) {
        lines.push(ReportLine::new(line, style, indent));
    }
}

/// Greedy word wrap at `max_chars`
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        if !current.is_empty() && current.len() + word.len() + 1 > max_chars {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Plain-text rendition of the report
///
/// Takes the same inputs as [`generate_pdf_report`], so both print the same
/// source image dimensions.
pub fn render_text_report(result: &AnalysisResult, image_data_url: Option<&str>) -> String {
    let image_size = image_data_url.and_then(preview_dimensions);
    let mut out = String::new();
    for line in layout_report(result, image_size, Local::now()) {
        if line.style == LineStyle::Heading {
            out.push('\n');
        }
        let indent = if line.indent > 0.0 { "  " } else { "" };
        out.push_str(indent);
        out.push_str(&line.text);
        out.push('\n');
        if line.style == LineStyle::Title {
            out.push_str(&"=".repeat(line.text.len()));
            out.push('\n');
        }
    }
    out
}

/// Generate the PDF report
///
/// # Arguments
///
/// * `result` - Analysis to report on
/// * `image_data_url` - Source image handed over from the upload view; only
///   its dimensions are printed
///
/// # Returns
///
/// PDF file contents
///
/// # Errors
///
/// `AnalysisError::ReportError` if the document cannot be written. An
/// unreadable image only drops the dimensions line.
pub fn generate_pdf_report(
    result: &AnalysisResult,
    image_data_url: Option<&str>,
) -> Result<Vec<u8>, AnalysisError> {
    let image_size = image_data_url.and_then(preview_dimensions);
    let lines = layout_report(result, image_size, Local::now());
    log::debug!(
        "Rendering PDF report for {} ({} lines)",
        result.analysis_id,
        lines.len()
    );
    render_pdf(&lines)
}

/// Source image dimensions, `None` (with a warning) if the URL cannot be decoded
pub fn preview_dimensions(data_url: &str) -> Option<(u32, u32)> {
    let decoded = decode_data_url(data_url).and_then(|(_, bytes)| {
        image::load_from_memory(&bytes).map_err(|e| AnalysisError::DecodingError(e.to_string()))
    });
    match decoded {
        Ok(img) => Some((img.width(), img.height())),
        Err(e) => {
            log::warn!("Report image dimensions unavailable: {}", e);
            None
        }
    }
}

fn render_pdf(lines: &[ReportLine]) -> Result<Vec<u8>, AnalysisError> {
    let (doc, page1, layer1) = PdfDocument::new(REPORT_TITLE, PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
    let font = doc
        .add_builtin_font(BuiltinFont::Helvetica)
        .map_err(|e| AnalysisError::ReportError(format!("font error: {}", e)))?;
    let bold = doc
        .add_builtin_font(BuiltinFont::HelveticaBold)
        .map_err(|e| AnalysisError::ReportError(format!("font error: {}", e)))?;

    let mut layer = doc.get_page(page1).get_layer(layer1);
    let mut y = TOP;

    for line in lines {
        if line.style == LineStyle::Heading {
            y -= 4.0;
        }
        if y < BOTTOM {
            let (page, layer_idx) = doc.add_page(PAGE_WIDTH, PAGE_HEIGHT, "Layer 1");
            layer = doc.get_page(page).get_layer(layer_idx);
            y = TOP;
        }
        let face = match line.style {
            LineStyle::Title | LineStyle::Heading => &bold,
            LineStyle::Body | LineStyle::Note => &font,
        };
        layer.use_text(
            line.text.as_str(),
            line.style.font_size(),
            Mm(LEFT + line.indent),
            Mm(y),
            face,
        );
        y -= line.style.advance();
    }

    let mut buf = BufWriter::new(Vec::new());
    doc.save(&mut buf)
        .map_err(|e| AnalysisError::ReportError(format!("PDF save error: {}", e)))?;
    buf.into_inner()
        .map_err(|e| AnalysisError::ReportError(format!("PDF buffer error: {}", e)))
}

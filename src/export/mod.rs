//! Export: plain-text projection, Unicode styling, and clipboard payloads.
//!
//! Provides the `Exporter` trait and format-specific implementations, plus
//! string-level helpers that take editor content with its [`SourceFormat`].
//!
//! # Architecture
//!
//! The `Exporter` trait uses a builder pattern:
//! - `new()` creates an exporter with default configuration
//! - `with_config()` allows customization
//! - `export()` renders a sanitized [`Document`] to a string
//!
//! # Example
//!
//! ```
//! use postglyph::Document;
//! use postglyph::export::{Exporter, StyledTextExporter};
//!
//! let doc = Document::parse("<p><strong>Hi</strong> there</p>");
//! let styled = StyledTextExporter::new().export(&doc).unwrap();
//! assert_eq!(styled, "𝗛𝗶 there");
//! ```

mod clipboard;
mod format;
pub mod glyphs;
mod plain;
mod styled;

pub use clipboard::{
    ClipboardPayload, ClipboardSink, CopyOutcome, Delivery, build_payload, copy_to_clipboard,
};
pub use format::{ExportFormat, SourceFormat};
pub use plain::{LengthReport, PLATFORM_CHAR_LIMIT, char_count, project};
pub use styled::to_styled_text;

use crate::dom::Document;
use crate::error::Result;
use crate::markdown::{self, MarkdownConfig};

/// Trait for exporting documents to a specific text representation.
///
/// Exporters hold their configuration; `export` never mutates the document.
pub trait Exporter {
    /// Render the document.
    fn export(&self, doc: &Document) -> Result<String>;
}

/// Bare text, for length accounting and the plain clipboard fallback.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlainTextExporter;

impl PlainTextExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for PlainTextExporter {
    fn export(&self, doc: &Document) -> Result<String> {
        Ok(project(doc))
    }
}

/// Unicode-styled text for the platform's paste target.
#[derive(Debug, Clone, Copy, Default)]
pub struct StyledTextExporter;

impl StyledTextExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for StyledTextExporter {
    fn export(&self, doc: &Document) -> Result<String> {
        Ok(to_styled_text(doc))
    }
}

/// Sanitized, canonical HTML.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlExporter;

impl HtmlExporter {
    pub fn new() -> Self {
        Self
    }
}

impl Exporter for HtmlExporter {
    fn export(&self, doc: &Document) -> Result<String> {
        Ok(doc.to_html())
    }
}

/// Markdown exporter.
#[derive(Debug, Clone, Default)]
pub struct MarkdownExporter {
    config: MarkdownConfig,
}

impl MarkdownExporter {
    /// Create a new exporter with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the exporter with custom settings.
    pub fn with_config(mut self, config: MarkdownConfig) -> Self {
        self.config = config;
        self
    }
}

impl Exporter for MarkdownExporter {
    fn export(&self, doc: &Document) -> Result<String> {
        markdown::render_markdown(doc, &self.config)
    }
}

/// The exporter for a target format.
pub fn exporter_for(format: ExportFormat) -> Box<dyn Exporter> {
    match format {
        ExportFormat::Plain => Box::new(PlainTextExporter::new()),
        ExportFormat::Styled => Box::new(StyledTextExporter::new()),
        ExportFormat::Rich => Box::new(HtmlExporter::new()),
        ExportFormat::Markdown => Box::new(MarkdownExporter::new()),
    }
}

// ============================================================================
// String-level helpers
// ============================================================================

/// Parse editor content into a sanitized document.
///
/// Markdown that fails to parse becomes one unstyled paragraph.
pub fn to_document(content: &str, source: SourceFormat) -> Document {
    match source {
        SourceFormat::Html => Document::parse(content),
        SourceFormat::Markdown => {
            if content.trim().is_empty() {
                return Document::new();
            }
            markdown::parse_markdown(content).unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Markdown parsing failed, using plain paragraph");
                Document::plain_paragraph(content)
            })
        }
    }
}

/// Convert content for an editor mode toggle.
///
/// Identity when the modes match; otherwise the same conversions as
/// [`markdown::html_to_markdown`] and [`markdown::markdown_to_html`].
pub fn switch_mode(content: &str, from: SourceFormat, to: SourceFormat) -> String {
    match (from, to) {
        (SourceFormat::Html, SourceFormat::Markdown) => markdown::html_to_markdown(content),
        (SourceFormat::Markdown, SourceFormat::Html) => markdown::markdown_to_html(content),
        _ => content.to_string(),
    }
}

/// Strip all markup, for plain-text export.
pub fn to_plain_text(content: &str, source: SourceFormat) -> String {
    project(&to_document(content, source))
}

/// Plain-text length in characters, the number compared against
/// [`PLATFORM_CHAR_LIMIT`]. Identical for both editing surfaces.
pub fn plain_text_length(content: &str, source: SourceFormat) -> usize {
    char_count(&to_plain_text(content, source))
}

/// Whether content fits the platform limit.
pub fn is_within_limit(content: &str, source: SourceFormat) -> bool {
    plain_text_length(content, source) <= PLATFORM_CHAR_LIMIT
}

pub fn length_report(content: &str, source: SourceFormat) -> LengthReport {
    LengthReport::new(plain_text_length(content, source))
}

/// Unicode-styled text for pasting into the platform.
pub fn format_styled(content: &str, source: SourceFormat) -> String {
    if content.trim().is_empty() {
        return String::new();
    }
    to_styled_text(&to_document(content, source))
}

/// Render content in the target format.
///
/// Markdown content exported as Markdown comes back as written.
pub fn export_content(content: &str, source: SourceFormat, format: ExportFormat) -> Result<String> {
    if source == SourceFormat::Markdown && format == ExportFormat::Markdown {
        return Ok(content.to_string());
    }
    exporter_for(format).export(&to_document(content, source))
}

//! Clipboard hand-off.
//!
//! The OS clipboard sits behind [`ClipboardSink`]. A copy makes exactly one
//! attempt with the requested payload and, if that write is refused, exactly
//! one plain-text write. There is no retry loop.

use crate::dom::Document;
use crate::error::Result;
use crate::util;

use super::format::{ExportFormat, SourceFormat};
use super::plain::{LengthReport, char_count, project};
use super::{exporter_for, to_document};

/// Destination for clipboard writes.
pub trait ClipboardSink {
    /// Write a `text/plain` payload.
    fn write_text(&mut self, text: &str) -> Result<()>;

    /// Write a `text/html` payload together with its `text/plain` shadow.
    fn write_rich(&mut self, html: &str, plain: &str) -> Result<()>;
}

/// What gets written for one copy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ClipboardPayload {
    Text(String),
    Rich { html: String, plain: String },
}

impl ClipboardPayload {
    /// The `text/plain` part of the payload.
    pub fn plain(&self) -> &str {
        match self {
            ClipboardPayload::Text(text) => text,
            ClipboardPayload::Rich { plain, .. } => plain,
        }
    }

    fn write_to(&self, sink: &mut impl ClipboardSink) -> Result<()> {
        match self {
            ClipboardPayload::Text(text) => sink.write_text(text),
            ClipboardPayload::Rich { html, plain } => sink.write_rich(html, plain),
        }
    }
}

/// Which write, if any, reached the clipboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The requested payload was written.
    Primary,
    /// The requested payload was refused; plain text was written instead.
    Fallback,
    /// Both writes were refused.
    Failed,
}

/// Result of a copy, with the metadata analytics collaborators receive.
///
/// Never carries the content itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CopyOutcome {
    pub delivery: Delivery,
    pub format: ExportFormat,
    pub source: SourceFormat,
    pub chars_total: usize,
    pub over_limit: bool,
    pub duration_ms: u64,
}

impl CopyOutcome {
    pub fn succeeded(&self) -> bool {
        self.delivery != Delivery::Failed
    }
}

/// Build the payload for `format` from an already parsed document.
fn payload_for(
    content: &str,
    doc: &Document,
    plain: &str,
    source: SourceFormat,
    format: ExportFormat,
) -> Result<ClipboardPayload> {
    let payload = match format {
        ExportFormat::Plain => ClipboardPayload::Text(plain.to_string()),
        ExportFormat::Rich => ClipboardPayload::Rich {
            html: doc.to_html(),
            plain: plain.to_string(),
        },
        ExportFormat::Markdown if source == SourceFormat::Markdown => {
            ClipboardPayload::Text(content.to_string())
        }
        ExportFormat::Styled | ExportFormat::Markdown => {
            ClipboardPayload::Text(exporter_for(format).export(doc)?)
        }
    };
    Ok(payload)
}

/// Build the clipboard payload for content in the given format.
pub fn build_payload(
    content: &str,
    source: SourceFormat,
    format: ExportFormat,
) -> Result<ClipboardPayload> {
    let doc = to_document(content, source);
    let plain = project(&doc);
    payload_for(content, &doc, &plain, source, format)
}

/// Copy content to the clipboard in the requested format.
///
/// If building or writing the requested payload fails, the plain-text
/// projection is written once instead. The outcome reports which write
/// landed; failure is a value, never a panic.
pub fn copy_to_clipboard(
    sink: &mut impl ClipboardSink,
    content: &str,
    source: SourceFormat,
    format: ExportFormat,
) -> CopyOutcome {
    let start = util::now_millis();
    let doc = to_document(content, source);
    let plain = project(&doc);
    let report = LengthReport::new(char_count(&plain));

    let primary = payload_for(content, &doc, &plain, source, format)
        .and_then(|payload| payload.write_to(sink));

    let delivery = match primary {
        Ok(()) => Delivery::Primary,
        Err(e) => {
            tracing::warn!(error = %e, %format, "clipboard write failed, falling back to plain text");
            match sink.write_text(&plain) {
                Ok(()) => Delivery::Fallback,
                Err(e) => {
                    tracing::warn!(error = %e, "plain-text clipboard fallback failed");
                    Delivery::Failed
                }
            }
        }
    };

    let outcome = CopyOutcome {
        delivery,
        format,
        source,
        chars_total: report.chars,
        over_limit: report.over_limit,
        duration_ms: util::elapsed_millis(start),
    };
    tracing::info!(
        delivery = ?outcome.delivery,
        format = %outcome.format,
        source = %outcome.source,
        chars_total = outcome.chars_total,
        over_limit = outcome.over_limit,
        duration_ms = outcome.duration_ms,
        "copy finished"
    );
    outcome
}

//! # postglyph
//!
//! A conversion engine for composing social posts in a rich editor or in
//! Markdown and exporting them to a platform that renders no markup.
//!
//! ## Features
//!
//! - Sanitize untrusted HTML down to a fixed tag and attribute allow-list
//! - Convert between structured HTML and Markdown for editor mode toggles
//! - Project either form to plain text for the 3000-character limit
//! - Render bold, italic and underline as Unicode letter variants, with
//!   bullets, quote marks and link suffixes for block structure
//! - Build clipboard payloads with a single plain-text fallback
//!
//! ## Quick Start
//!
//! ```
//! use postglyph::{SourceFormat, format_styled, plain_text_length, sanitize};
//!
//! let clean = sanitize("<script>alert(1)</script><p>ok</p>");
//! assert_eq!(clean, "<p>ok</p>");
//!
//! let styled = format_styled("**Big** news", SourceFormat::Markdown);
//! assert_eq!(styled, "𝗕𝗶𝗴 news");
//!
//! assert_eq!(plain_text_length("<p><b>Big</b> news</p>", SourceFormat::Html), 8);
//! ```
//!
//! ## Working with Documents
//!
//! The [`Document`] type is the sanitized structured form every conversion
//! passes through. Build one by parsing, or directly:
//!
//! ```
//! use postglyph::{Document, Element, Tag};
//! use postglyph::export::{Exporter, MarkdownExporter};
//!
//! let doc = Document::new().with_child(
//!     Element::new(Tag::P)
//!         .with_child(Element::new(Tag::Strong).with_text("Hello"))
//!         .with_text(" world"),
//! );
//! assert_eq!(MarkdownExporter::new().export(&doc).unwrap(), "**Hello** world\n");
//! ```

pub mod dom;
pub mod error;
pub mod export;
pub mod markdown;
pub mod sanitize;
pub(crate) mod util;

#[cfg(feature = "wasm")]
pub mod wasm;

pub use dom::{Attr, Document, Element, Node, Tag};
pub use error::{Error, Result};
pub use export::{
    ClipboardPayload, ClipboardSink, CopyOutcome, Delivery, ExportFormat, Exporter,
    LengthReport, PLATFORM_CHAR_LIMIT, SourceFormat, copy_to_clipboard, export_content, format_styled,
    is_within_limit, length_report, plain_text_length, switch_mode, to_document, to_plain_text,
    to_styled_text,
};
pub use markdown::{html_to_markdown, markdown_to_html};
pub use sanitize::sanitize;
pub use util::decode_text;

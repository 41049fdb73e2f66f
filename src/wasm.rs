//! WASM bindings for the browser editor.
//!
//! This module exposes the conversion functions to JavaScript via
//! wasm-bindgen. Formats cross the boundary as strings (`"html"`,
//! `"markdown"`; `"plain"`, `"styled"`, `"rich"`). The clipboard write itself
//! stays in JavaScript, which owns the async browser clipboard API.

use wasm_bindgen::prelude::*;

use crate::export::{self, ExportFormat, SourceFormat};
use crate::markdown;

/// Initialize panic hook for better error messages in the browser console.
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "wasm")]
    console_error_panic_hook::set_once();
}

fn source_format(name: &str) -> Result<SourceFormat, JsValue> {
    name.parse().map_err(|e: crate::Error| JsValue::from_str(&e.to_string()))
}

fn export_format(name: &str) -> Result<ExportFormat, JsValue> {
    name.parse().map_err(|e: crate::Error| JsValue::from_str(&e.to_string()))
}

/// Sanitize pasted or external HTML.
#[wasm_bindgen]
pub fn sanitize_html(html: &str) -> String {
    crate::sanitize(html)
}

/// Convert rich-editor HTML to Markdown (mode toggle).
#[wasm_bindgen]
pub fn html_to_markdown(html: &str) -> String {
    markdown::html_to_markdown(html)
}

/// Convert Markdown to sanitized HTML (mode toggle).
#[wasm_bindgen]
pub fn markdown_to_html(md: &str) -> String {
    markdown::markdown_to_html(md)
}

/// Plain-text length for the character counter.
#[wasm_bindgen]
pub fn plain_text_length(content: &str, source: &str) -> Result<usize, JsValue> {
    Ok(export::plain_text_length(content, source_format(source)?))
}

#[wasm_bindgen]
pub fn is_within_limit(content: &str, source: &str) -> Result<bool, JsValue> {
    Ok(export::is_within_limit(content, source_format(source)?))
}

/// Unicode-styled text for pasting into the platform.
#[wasm_bindgen]
pub fn format_styled(content: &str, source: &str) -> Result<String, JsValue> {
    Ok(export::format_styled(content, source_format(source)?))
}

/// Render content in any export format.
#[wasm_bindgen]
pub fn export_content(content: &str, source: &str, format: &str) -> Result<String, JsValue> {
    export::export_content(content, source_format(source)?, export_format(format)?)
        .map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Plain-text shadow written alongside a rich clipboard payload, and the
/// fallback when a rich write is refused.
#[wasm_bindgen]
pub fn plain_fallback(content: &str, source: &str) -> Result<String, JsValue> {
    Ok(export::to_plain_text(content, source_format(source)?))
}

/// MIME type of the primary clipboard payload for a format.
#[wasm_bindgen]
pub fn clipboard_mime_type(format: &str) -> Result<String, JsValue> {
    Ok(export_format(format)?.mime_type().to_string())
}

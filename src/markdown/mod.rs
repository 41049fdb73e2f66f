//! Conversion between structured HTML and Markdown.
//!
//! - [`escape`]: pure string transformation utilities for Markdown escaping
//! - [`render`]: structured [`Document`] → Markdown
//! - [`parse`]: Markdown → sanitized HTML, via pulldown-cmark
//!
//! The infallible entry points ([`html_to_markdown`], [`markdown_to_html`])
//! never fail the caller: a parser failure is logged and the input comes back
//! in a safe degraded form.
//!
//! ## Design Notes
//!
//! - **Text escaping**: special Markdown characters are escaped so literal
//!   text never turns into formatting on the way back
//! - **Tight/loose list detection**: lists with single-paragraph items render
//!   without blank lines between items
//! - **Dynamic code fence length**: code blocks and inline code use the
//!   shortest backtick run that does not conflict with the content
//! - **Line breaks**: a `br` renders as a backslash hard break, and single
//!   newlines in Markdown read back as line breaks
//! - **Emphasis**: `*`, `**` and `~~` are used only where they parse back as
//!   the same span; other emphasis is kept as inline HTML

mod escape;
mod parse;
mod render;

pub use escape::{calculate_fence_length, calculate_inline_code_ticks, escape_markdown};
pub use parse::{parse_markdown, try_markdown_to_html};
pub use render::{MarkdownConfig, RenderContext, render_markdown};

use crate::dom::{Document, escape_html};
use crate::error::Result;
use crate::util;

/// Convert untrusted HTML to Markdown, reporting parser failures.
pub fn try_html_to_markdown(html: &str, config: &MarkdownConfig) -> Result<String> {
    let doc = util::guard("HTML parsing", || Document::parse(html))?;
    render_markdown(&doc, config)
}

/// Convert untrusted HTML to Markdown.
///
/// The input is sanitized first. Blank input gives an empty string; if
/// conversion fails the input is returned unchanged.
///
/// # Examples
///
/// ```
/// use postglyph::markdown::html_to_markdown;
///
/// assert_eq!(html_to_markdown("<ul><li>One</li><li>Two</li></ul>"), "- One\n- Two\n");
/// ```
pub fn html_to_markdown(html: &str) -> String {
    if html.trim().is_empty() {
        return String::new();
    }
    match try_html_to_markdown(html, &MarkdownConfig::default()) {
        Ok(markdown) => markdown,
        Err(e) => {
            tracing::warn!(error = %e, "HTML to Markdown conversion failed, keeping input");
            html.to_string()
        }
    }
}

/// Convert Markdown to sanitized HTML.
///
/// Blank input gives an empty string; if conversion fails the input is
/// returned as one escaped paragraph, so no markup ever leaks through.
///
/// # Examples
///
/// ```
/// use postglyph::markdown::markdown_to_html;
///
/// assert_eq!(markdown_to_html("**hi**").trim_end(), "<p><strong>hi</strong></p>");
/// ```
pub fn markdown_to_html(markdown: &str) -> String {
    if markdown.trim().is_empty() {
        return String::new();
    }
    match try_markdown_to_html(markdown) {
        Ok(html) => html,
        Err(e) => {
            tracing::warn!(error = %e, "Markdown to HTML conversion failed, escaping input");
            format!("<p>{}</p>", escape_html(markdown, false))
        }
    }
}

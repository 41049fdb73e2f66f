//! Editor modes and export targets.

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use crate::error::Error;

/// The editing surface a piece of content came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceFormat {
    /// Structured markup from the rich editor.
    Html,
    /// Lightweight markup from the Markdown editor.
    Markdown,
}

impl SourceFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            SourceFormat::Html => "html",
            SourceFormat::Markdown => "markdown",
        }
    }

    /// Detect the source format from a file extension.
    pub fn from_path(path: impl AsRef<Path>) -> Option<Self> {
        let ext = path.as_ref().extension()?.to_str()?.to_ascii_lowercase();
        match ext.as_str() {
            "md" | "markdown" | "mdown" | "mkd" => Some(SourceFormat::Markdown),
            "html" | "htm" | "xhtml" => Some(SourceFormat::Html),
            _ => None,
        }
    }
}

impl fmt::Display for SourceFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "html" | "rich" | "wysiwyg" | "structured" => Ok(SourceFormat::Html),
            "markdown" | "md" | "lightweight" => Ok(SourceFormat::Markdown),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

/// What a copy or export produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExportFormat {
    /// Bare text, no styling.
    Plain,
    /// Unicode-styled text for the platform's paste target.
    Styled,
    /// Sanitized HTML with its plain-text shadow.
    Rich,
    /// Markdown source.
    Markdown,
}

impl ExportFormat {
    pub const ALL: [ExportFormat; 4] = [
        ExportFormat::Plain,
        ExportFormat::Styled,
        ExportFormat::Rich,
        ExportFormat::Markdown,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            ExportFormat::Plain => "plain",
            ExportFormat::Styled => "styled",
            ExportFormat::Rich => "rich",
            ExportFormat::Markdown => "markdown",
        }
    }

    /// MIME type of the primary clipboard payload.
    pub fn mime_type(self) -> &'static str {
        match self {
            ExportFormat::Rich => "text/html",
            ExportFormat::Plain | ExportFormat::Styled | ExportFormat::Markdown => "text/plain",
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "plain" | "text" | "txt" => Ok(ExportFormat::Plain),
            "styled" | "unicode" => Ok(ExportFormat::Styled),
            "rich" | "html" => Ok(ExportFormat::Rich),
            "markdown" | "md" => Ok(ExportFormat::Markdown),
            _ => Err(Error::UnknownFormat(s.to_string())),
        }
    }
}

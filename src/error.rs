//! Error types for postglyph operations.

use thiserror::Error;

/// Errors that can occur while converting or exporting content.
///
/// None of these are fatal: the public string-level conversions catch them,
/// log a warning, and fall back to a less-styled result.
#[derive(Error, Debug)]
pub enum Error {
    #[error("formatting error: {0}")]
    Fmt(#[from] std::fmt::Error),

    #[error("{stage} failed: {message}")]
    Converter {
        stage: &'static str,
        message: String,
    },

    #[error("clipboard write failed: {0}")]
    Clipboard(String),

    #[error("unknown format: {0}")]
    UnknownFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

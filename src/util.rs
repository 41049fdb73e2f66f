//! Utility functions with platform-specific implementations.

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use crate::error::{Error, Result};

// ============================================================================
// Timing
// ============================================================================

/// Milliseconds since the Unix epoch, for measuring export duration.
///
/// On native platforms, uses `SystemTime::now()`.
/// On WASM, uses `js_sys::Date::now()`.
#[cfg(not(target_arch = "wasm32"))]
pub fn now_millis() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(target_arch = "wasm32")]
pub fn now_millis() -> f64 {
    js_sys::Date::now()
}

/// Whole milliseconds elapsed since `start` (a [`now_millis`] reading).
pub fn elapsed_millis(start: f64) -> u64 {
    let elapsed = now_millis() - start;
    if elapsed.is_finite() && elapsed > 0.0 {
        elapsed.round() as u64
    } else {
        0
    }
}

// ============================================================================
// Failure Containment
// ============================================================================

/// Run a third-party parsing stage, turning a panic into [`Error::Converter`].
///
/// The conversion entry points promise a usable string for any input, so a
/// parser bug must not take the caller down with it.
pub fn guard<T>(stage: &'static str, f: impl FnOnce() -> T) -> Result<T> {
    panic::catch_unwind(AssertUnwindSafe(f)).map_err(|payload| Error::Converter {
        stage,
        message: panic_message(payload.as_ref()),
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}

// ============================================================================
// Text Decoding
// ============================================================================

/// Decode bytes to a string, handling various encodings.
///
/// This function:
/// 1. First tries UTF-8 (handles BOM automatically via encoding_rs)
/// 2. If malformed, tries the charset declared in an HTML `<meta>` tag
/// 3. Falls back to Windows-1252 (what clipboard HTML from old tools uses)
///
/// Uses `Cow<str>` to avoid allocation when the input is valid UTF-8.
pub fn decode_text(bytes: &[u8]) -> Cow<'_, str> {
    let (result, _encoding, malformed) = encoding_rs::UTF_8.decode(bytes);

    if !malformed {
        return result;
    }

    if let Some(name) = extract_meta_charset(bytes)
        && let Some(encoding) = encoding_rs::Encoding::for_label(name.as_bytes())
    {
        tracing::debug!(charset = encoding.name(), "decoding input with declared charset");
        let (result, _, _) = encoding.decode(bytes);
        return result;
    }

    let (result, _, _) = encoding_rs::WINDOWS_1252.decode(bytes);
    result
}

/// Extract the `charset` of an HTML `<meta>` declaration.
///
/// Only the first kilobyte is checked, matching where browsers look.
pub fn extract_meta_charset(bytes: &[u8]) -> Option<&str> {
    let prefix = &bytes[..bytes.len().min(1024)];

    let meta_pos = prefix
        .windows(5)
        .position(|w| w.eq_ignore_ascii_case(b"<meta"))?;
    let after_meta = &prefix[meta_pos..];

    let charset_pos = after_meta
        .windows(8)
        .position(|w| w.eq_ignore_ascii_case(b"charset="))?;
    let mut value = &after_meta[charset_pos + 8..];

    if let Some(&quote) = value.first()
        && (quote == b'"' || quote == b'\'')
    {
        value = &value[1..];
    }
    let end = value
        .iter()
        .position(|&b| matches!(b, b'"' | b'\'' | b'>' | b';' | b'/') || b.is_ascii_whitespace())
        .unwrap_or(value.len());

    std::str::from_utf8(&value[..end]).ok().filter(|s| !s.is_empty())
}

// ============================================================================
// Tests
// ============================================================================

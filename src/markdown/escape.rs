//! Keeping literal text literal when it is written out as Markdown.
//!
//! Editor text can contain any character; a stray `*` or a line that happens
//! to start with `1.` must not turn into markup after a mode switch.

/// Backslash-escape text so CommonMark reads it back verbatim.
///
/// Anywhere on a line:
/// - Backslash: `\\`
/// - Emphasis and strikethrough: `*`, `_`, `~`
/// - Links: `[`, `]`
/// - Code: `` ` ``
/// - Tables: `|`
/// - HTML: `<`, `>`
/// - Images: `!` (when followed by `[`)
/// - Entities: `&` (when followed by a name or `#`)
///
/// When `line_start` is set the text begins a line, so block markers are
/// escaped too: `#`, `-`, `+`, `=`, and a leading number followed by `.` or
/// `)`.
///
/// # Examples
///
/// ```
/// use postglyph::markdown::escape_markdown;
///
/// assert_eq!(escape_markdown("*bold*", false), "\\*bold\\*");
/// assert_eq!(escape_markdown("1. first", true), "1\\. first");
/// assert_eq!(escape_markdown("1. first", false), "1. first");
/// ```
pub fn escape_markdown(text: &str, line_start: bool) -> String {
    let mut result = String::with_capacity(text.len() + text.len() / 10);
    let mut chars = text.char_indices().peekable();

    if line_start {
        escape_line_start(text, &mut result, &mut chars);
    }

    while let Some((i, c)) = chars.next() {
        match c {
            '\\' => result.push_str("\\\\"),
            '*' | '_' | '~' | '[' | ']' | '`' | '|' | '<' | '>' => {
                result.push('\\');
                result.push(c);
            }
            '!' if chars.peek().map(|&(_, n)| n) == Some('[') => {
                result.push('\\');
                result.push(c);
            }
            '&' if starts_entity(&text[i + 1..]) => {
                result.push('\\');
                result.push(c);
            }
            _ => result.push(c),
        }
    }

    result
}

/// Escape a block marker at the start of `text`, consuming what it wrote.
fn escape_line_start(
    text: &str,
    result: &mut String,
    chars: &mut std::iter::Peekable<std::str::CharIndices<'_>>,
) {
    let Some(&(_, first)) = chars.peek() else {
        return;
    };
    match first {
        '#' | '-' | '+' | '=' => {
            result.push('\\');
            result.push(first);
            chars.next();
        }
        '0'..='9' => {
            let digits = text.chars().take_while(char::is_ascii_digit).count();
            let rest = &text[digits..];
            let is_marker = matches!(rest, "." | ")")
                || rest.starts_with(". ")
                || rest.starts_with(") ");
            if digits <= 9 && is_marker {
                result.push_str(&text[..digits]);
                result.push('\\');
                for _ in 0..digits {
                    chars.next();
                }
                if let Some((_, marker)) = chars.next() {
                    result.push(marker);
                }
            }
        }
        _ => {}
    }
}

/// Whether `rest` would turn a preceding `&` into an entity reference.
fn starts_entity(rest: &str) -> bool {
    let rest = rest.strip_prefix('#').unwrap_or(rest);
    let name_len = rest
        .chars()
        .take_while(char::is_ascii_alphanumeric)
        .count();
    name_len > 0 && rest[name_len..].starts_with(';')
}

/// Fence width for a code block: one longer than the longest run of
/// `fence_char` in the content, and never below three.
///
/// # Examples
///
/// ```
/// use postglyph::markdown::calculate_fence_length;
///
/// assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
/// assert_eq!(calculate_fence_length("```rust\ncode\n```", '`'), 4);
/// ```
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    longest_run(content, fence_char).max(2) + 1
}

/// Backtick count for a code span around `content`.
///
/// # Examples
///
/// ```
/// use postglyph::markdown::calculate_inline_code_ticks;
///
/// assert_eq!(calculate_inline_code_ticks("code"), 1);
/// assert_eq!(calculate_inline_code_ticks("code with ` backtick"), 2);
/// ```
pub fn calculate_inline_code_ticks(content: &str) -> usize {
    longest_run(content, '`') + 1
}

fn longest_run(content: &str, target: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;
    for c in content.chars() {
        if c == target {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }
    max_run
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_backslash() {
        assert_eq!(escape_markdown("a\\b", false), "a\\\\b");
    }

    #[test]
    fn test_escape_emphasis() {
        assert_eq!(escape_markdown("*bold*", false), "\\*bold\\*");
        assert_eq!(escape_markdown("_italic_", false), "\\_italic\\_");
        assert_eq!(escape_markdown("~~gone~~", false), "\\~\\~gone\\~\\~");
    }

    #[test]
    fn test_escape_links() {
        assert_eq!(escape_markdown("[link]", false), "\\[link\\]");
        assert_eq!(escape_markdown("![alt]", false), "\\!\\[alt\\]");
        assert_eq!(escape_markdown("wow! ok", false), "wow! ok");
    }

    #[test]
    fn test_escape_heading_only_at_line_start() {
        assert_eq!(escape_markdown("# heading", true), "\\# heading");
        assert_eq!(escape_markdown("not # heading", true), "not # heading");
        assert_eq!(escape_markdown("# mid-line", false), "# mid-line");
    }

    #[test]
    fn test_escape_list_markers() {
        assert_eq!(escape_markdown("- item", true), "\\- item");
        assert_eq!(escape_markdown("+ item", true), "\\+ item");
        assert_eq!(escape_markdown("2024. A year", true), "2024\\. A year");
        assert_eq!(escape_markdown("3) three", true), "3\\) three");
        assert_eq!(escape_markdown("3.5 kg", true), "3.5 kg");
        assert_eq!(escape_markdown("42", true), "42");
    }

    #[test]
    fn test_escape_setext_underline() {
        assert_eq!(escape_markdown("===", true), "\\===");
    }

    #[test]
    fn test_escape_html_and_pipes() {
        assert_eq!(escape_markdown("<tag> | x", false), "\\<tag\\> \\| x");
    }

    #[test]
    fn test_escape_entities() {
        assert_eq!(escape_markdown("&amp;", false), "\\&amp;");
        assert_eq!(escape_markdown("&#42;", false), "\\&#42;");
        assert_eq!(escape_markdown("Q&A", false), "Q&A");
        assert_eq!(escape_markdown("a & b", false), "a & b");
    }

    #[test]
    fn test_fence_length() {
        assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
        assert_eq!(calculate_fence_length("``", '`'), 3);
        assert_eq!(calculate_fence_length("```", '`'), 4);
        assert_eq!(calculate_fence_length("`` and ````", '`'), 5);
    }

    #[test]
    fn test_inline_code_ticks() {
        assert_eq!(calculate_inline_code_ticks("code"), 1);
        assert_eq!(calculate_inline_code_ticks("`"), 2);
        assert_eq!(calculate_inline_code_ticks("``"), 3);
    }
}

//! Unicode letter-variant tables.
//!
//! The target platform renders no markup, so styling travels inside the
//! characters themselves: Latin letters and digits map onto the Mathematical
//! Alphanumeric Symbols block (sans-serif bold and sans-serif italic), and
//! underline is a combining low line after each character other than a line
//! break. The sans-serif
//! ranges have no reserved holes, so every mapping is a fixed offset.

/// Combining low line, drawn under the preceding character.
pub const COMBINING_LOW_LINE: char = '\u{0332}';

const BOLD_UPPER_A: u32 = 0x1D5D4;
const BOLD_LOWER_A: u32 = 0x1D5EE;
const BOLD_DIGIT_ZERO: u32 = 0x1D7EC;
const ITALIC_UPPER_A: u32 = 0x1D608;
const ITALIC_LOWER_A: u32 = 0x1D622;

fn offset(base: u32, from: char, c: char) -> Option<char> {
    char::from_u32(base + (c as u32 - from as u32))
}

/// Bold variant of `c`; characters outside `A-Z a-z 0-9` are returned as is.
pub fn bold(c: char) -> char {
    let mapped = match c {
        'A'..='Z' => offset(BOLD_UPPER_A, 'A', c),
        'a'..='z' => offset(BOLD_LOWER_A, 'a', c),
        '0'..='9' => offset(BOLD_DIGIT_ZERO, '0', c),
        _ => None,
    };
    mapped.unwrap_or(c)
}

/// Italic variant of `c`; only `A-Z a-z` have one.
pub fn italic(c: char) -> char {
    let mapped = match c {
        'A'..='Z' => offset(ITALIC_UPPER_A, 'A', c),
        'a'..='z' => offset(ITALIC_LOWER_A, 'a', c),
        _ => None,
    };
    mapped.unwrap_or(c)
}

pub fn to_bold(text: &str) -> String {
    text.chars().map(bold).collect()
}

pub fn to_italic(text: &str) -> String {
    text.chars().map(italic).collect()
}

/// Put a combining low line after every character except `\n`.
///
/// Unlike bold and italic, which map every character, underline leaves line
/// breaks bare.
pub fn to_underline(text: &str) -> String {
    let mut out = String::with_capacity(text.len() * 3);
    for c in text.chars() {
        out.push(c);
        if c != '\n' {
            out.push(COMBINING_LOW_LINE);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOLD_UPPER: &str = "𝗔𝗕𝗖𝗗𝗘𝗙𝗚𝗛𝗜𝗝𝗞𝗟𝗠𝗡𝗢𝗣𝗤𝗥𝗦𝗧𝗨𝗩𝗪𝗫𝗬𝗭";
    const BOLD_LOWER: &str = "𝗮𝗯𝗰𝗱𝗲𝗳𝗴𝗵𝗶𝗷𝗸𝗹𝗺𝗻𝗼𝗽𝗾𝗿𝘀𝘁𝘂𝘃𝘄𝘅𝘆𝘇";
    const BOLD_DIGITS: &str = "𝟬𝟭𝟮𝟯𝟰𝟱𝟲𝟳𝟴𝟵";
    const ITALIC_UPPER: &str = "𝘈𝘉𝘊𝘋𝘌𝘍𝘎𝘏𝘐𝘑𝘒𝘓𝘔𝘕𝘖𝘗𝘘𝘙𝘚𝘛𝘜𝘝𝘞𝘟𝘠𝘡";
    const ITALIC_LOWER: &str = "𝘢𝘣𝘤𝘥𝘦𝘧𝘨𝘩𝘪𝘫𝘬𝘭𝘮𝘯𝘰𝘱𝘲𝘳𝘴𝘵𝘶𝘷𝘸𝘹𝘺𝘻";

    #[test]
    fn test_bold_table() {
        assert_eq!(to_bold("ABCDEFGHIJKLMNOPQRSTUVWXYZ"), BOLD_UPPER);
        assert_eq!(to_bold("abcdefghijklmnopqrstuvwxyz"), BOLD_LOWER);
        assert_eq!(to_bold("0123456789"), BOLD_DIGITS);
    }

    #[test]
    fn test_italic_table() {
        assert_eq!(to_italic("ABCDEFGHIJKLMNOPQRSTUVWXYZ"), ITALIC_UPPER);
        assert_eq!(to_italic("abcdefghijklmnopqrstuvwxyz"), ITALIC_LOWER);
    }

    #[test]
    fn test_italic_has_no_digits() {
        assert_eq!(to_italic("42"), "42");
    }

    #[test]
    fn test_unmapped_pass_through() {
        assert_eq!(to_bold("é, ß! 中"), "é, ß! 中");
        assert_eq!(to_italic("?-_"), "?-_");
    }

    #[test]
    fn test_underline_every_character() {
        assert_eq!(to_underline("ab"), "a\u{332}b\u{332}");
        assert_eq!(to_underline("é 中"), "é\u{332} \u{332}中\u{332}");
    }

    #[test]
    fn test_underline_leaves_line_breaks_bare() {
        assert_eq!(to_underline("a\nb"), "a\u{332}\nb\u{332}");
        assert_eq!(to_underline("\n\n"), "\n\n");
    }
}

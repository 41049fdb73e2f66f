//! URL policy for anchor targets.

/// Schemes an `href` may use. Scheme-less URLs (relative paths, fragments,
/// queries) are always allowed.
const ALLOWED_SCHEMES: &[&str] = &["http", "https", "mailto", "tel"];

/// Return the cleaned `href`, or `None` if it must be dropped.
///
/// Cleaned the way a browser's URL parser does before resolving a scheme:
/// leading and trailing C0 controls and spaces are trimmed, and tabs and
/// newlines are removed everywhere (`java\tscript:` is `javascript:`).
pub fn safe_href(href: &str) -> Option<String> {
    let cleaned: String = href
        .trim_matches(|c: char| c <= ' ')
        .chars()
        .filter(|c| !matches!(c, '\t' | '\n' | '\r'))
        .collect();

    match scheme(&cleaned) {
        None => Some(cleaned),
        Some(s) if ALLOWED_SCHEMES.iter().any(|a| a.eq_ignore_ascii_case(s)) => Some(cleaned),
        Some(_) => None,
    }
}

/// The scheme of `url`, if it has one.
///
/// A colon only introduces a scheme when it comes before any `/`, `?` or
/// `#`; `a/b:c` is a relative path.
fn scheme(url: &str) -> Option<&str> {
    let end = url.find([':', '/', '?', '#'])?;
    if url.as_bytes()[end] != b':' {
        return None;
    }
    Some(&url[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_schemes() {
        assert_eq!(
            safe_href("https://x.example").as_deref(),
            Some("https://x.example")
        );
        assert!(safe_href("http://x.example").is_some());
        assert!(safe_href("MAILTO:me@x.example").is_some());
        assert!(safe_href("tel:+15551234").is_some());
    }

    #[test]
    fn test_relative_urls() {
        assert_eq!(safe_href("/about").as_deref(), Some("/about"));
        assert_eq!(safe_href("#top").as_deref(), Some("#top"));
        assert_eq!(safe_href("a/b:c").as_deref(), Some("a/b:c"));
        assert_eq!(safe_href("?q=1:2").as_deref(), Some("?q=1:2"));
    }

    #[test]
    fn test_script_schemes_rejected() {
        assert_eq!(safe_href("javascript:alert(1)"), None);
        assert_eq!(safe_href("JaVaScRiPt:alert(1)"), None);
        assert_eq!(safe_href(" javascript:alert(1)"), None);
        assert_eq!(safe_href("java\tscript:alert(1)"), None);
        assert_eq!(safe_href("java\nscript:alert(1)"), None);
        assert_eq!(safe_href("vbscript:msgbox"), None);
        assert_eq!(safe_href("data:text/html;base64,PHNjcmlwdD4="), None);
    }

    #[test]
    fn test_interior_spaces_kept() {
        assert_eq!(
            safe_href("  https://x.example/a b ").as_deref(),
            Some("https://x.example/a b")
        );
    }

    #[test]
    fn test_empty_scheme_rejected() {
        assert_eq!(safe_href(":foo"), None);
    }
}

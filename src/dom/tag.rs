//! The closed tag and attribute alphabets, and the policy for everything else.

use std::fmt;

/// Every element a [`Document`](super::Document) may contain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tag {
    P,
    Br,
    Strong,
    B,
    Em,
    I,
    U,
    S,
    Del,
    Strike,
    H1,
    H2,
    H3,
    H4,
    H5,
    H6,
    Ul,
    Ol,
    Li,
    A,
    Code,
    Pre,
    Blockquote,
}

impl Tag {
    pub const ALL: [Tag; 23] = [
        Tag::P,
        Tag::Br,
        Tag::Strong,
        Tag::B,
        Tag::Em,
        Tag::I,
        Tag::U,
        Tag::S,
        Tag::Del,
        Tag::Strike,
        Tag::H1,
        Tag::H2,
        Tag::H3,
        Tag::H4,
        Tag::H5,
        Tag::H6,
        Tag::Ul,
        Tag::Ol,
        Tag::Li,
        Tag::A,
        Tag::Code,
        Tag::Pre,
        Tag::Blockquote,
    ];

    pub fn from_name(name: &str) -> Option<Tag> {
        let tag = match name {
            "p" => Tag::P,
            "br" => Tag::Br,
            "strong" => Tag::Strong,
            "b" => Tag::B,
            "em" => Tag::Em,
            "i" => Tag::I,
            "u" => Tag::U,
            "s" => Tag::S,
            "del" => Tag::Del,
            "strike" => Tag::Strike,
            "h1" => Tag::H1,
            "h2" => Tag::H2,
            "h3" => Tag::H3,
            "h4" => Tag::H4,
            "h5" => Tag::H5,
            "h6" => Tag::H6,
            "ul" => Tag::Ul,
            "ol" => Tag::Ol,
            "li" => Tag::Li,
            "a" => Tag::A,
            "code" => Tag::Code,
            "pre" => Tag::Pre,
            "blockquote" => Tag::Blockquote,
            _ => return None,
        };
        Some(tag)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Tag::P => "p",
            Tag::Br => "br",
            Tag::Strong => "strong",
            Tag::B => "b",
            Tag::Em => "em",
            Tag::I => "i",
            Tag::U => "u",
            Tag::S => "s",
            Tag::Del => "del",
            Tag::Strike => "strike",
            Tag::H1 => "h1",
            Tag::H2 => "h2",
            Tag::H3 => "h3",
            Tag::H4 => "h4",
            Tag::H5 => "h5",
            Tag::H6 => "h6",
            Tag::Ul => "ul",
            Tag::Ol => "ol",
            Tag::Li => "li",
            Tag::A => "a",
            Tag::Code => "code",
            Tag::Pre => "pre",
            Tag::Blockquote => "blockquote",
        }
    }

    /// Heading level 1-6, or `None` for non-headings.
    pub fn heading_level(self) -> Option<u8> {
        match self {
            Tag::H1 => Some(1),
            Tag::H2 => Some(2),
            Tag::H3 => Some(3),
            Tag::H4 => Some(4),
            Tag::H5 => Some(5),
            Tag::H6 => Some(6),
            _ => None,
        }
    }

    /// Block-level tags start and end on their own line in every output.
    pub fn is_block(self) -> bool {
        matches!(
            self,
            Tag::P
                | Tag::H1
                | Tag::H2
                | Tag::H3
                | Tag::H4
                | Tag::H5
                | Tag::H6
                | Tag::Ul
                | Tag::Ol
                | Tag::Li
                | Tag::Blockquote
                | Tag::Pre
        )
    }

    /// Void elements never have children.
    pub fn is_void(self) -> bool {
        self == Tag::Br
    }
}

impl fmt::Display for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Attributes that survive sanitization (on anchors only).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Attr {
    Href,
    Target,
    Rel,
}

impl Attr {
    pub fn from_name(name: &str) -> Option<Attr> {
        match name {
            "href" => Some(Attr::Href),
            "target" => Some(Attr::Target),
            "rel" => Some(Attr::Rel),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Attr::Href => "href",
            Attr::Target => "target",
            Attr::Rel => "rel",
        }
    }
}

/// What the sanitizer does with an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    /// Allowed: keep the element as this tag.
    Keep(Tag),
    /// Not allowed: discard the tag, keep its cleaned children in place.
    Unwrap,
    /// Not allowed and its content is not text: discard the whole subtree.
    DropSubtree,
}

/// Sanitizer policy for an HTML element by local name.
///
/// Anything not listed here unwraps.
pub fn disposition(local_name: &str) -> Disposition {
    if let Some(tag) = Tag::from_name(local_name) {
        return Disposition::Keep(tag);
    }
    match local_name {
        // Executable or embedded content
        "script" | "style" | "template" | "iframe" | "frame" | "frameset" | "object"
        | "embed" | "applet" | "noscript" | "noembed" | "noframes" | "svg" | "math"
        | "canvas" | "audio" | "video" | "img" | "picture" | "source" | "track" | "param" => {
            Disposition::DropSubtree
        }

        // Form controls and raw-text holders whose text is not document text
        "textarea" | "select" | "option" | "optgroup" | "input" | "button" | "xmp"
        | "plaintext" => Disposition::DropSubtree,

        // Document metadata
        "head" | "title" | "meta" | "link" | "base" => Disposition::DropSubtree,

        _ => Disposition::Unwrap,
    }
}

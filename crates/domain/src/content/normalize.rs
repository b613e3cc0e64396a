//! Content normalization.
//!
//! Rendered HTML is reduced to a canonical form before any matching, so
//! template indentation, line wrapping and quote escaping do not leak into
//! assertions. Expected values go through the same functions, which keeps
//! both sides comparable. Every function here is idempotent.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// Elements that never carry a closing tag.
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "source", "track",
    "wbr",
];

#[allow(clippy::expect_used)]
fn pattern(source: &str) -> Regex {
    Regex::new(source).expect("normalization patterns are valid")
}

static NBSP: LazyLock<Regex> = LazyLock::new(|| pattern(r"(?i)&nbsp;|&#0*160;|&#x0*a0;"));
static WHITESPACE_RUN: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s+"));
static QUOTE_ENTITY: LazyLock<Regex> =
    LazyLock::new(|| pattern(r"(?i)&(?:quot|apos|#0*34|#0*39|#x0*22|#x0*27);"));
static BEFORE_SELF_CLOSE: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s*/\s*>"));
static AFTER_CLOSE_SLASH: LazyLock<Regex> = LazyLock::new(|| pattern(r"</\s+"));
static AROUND_BRACKET: LazyLock<Regex> = LazyLock::new(|| pattern(r"\s*([<>])\s*"));
static VOID_SELF_CLOSE: LazyLock<Regex> = LazyLock::new(|| {
    pattern(&format!(
        r"(?i)<({})(\s[^<>]*?)?/>",
        VOID_ELEMENTS.join("|")
    ))
});

/// Returns true if the tag name is an HTML void element.
#[must_use]
pub fn is_void_element(name: &str) -> bool {
    VOID_ELEMENTS
        .iter()
        .any(|void| void.eq_ignore_ascii_case(name))
}

/// Collapses whitespace runs (including non-breaking spaces) to single spaces.
///
/// ```
/// use expanse_domain::content::normalize_whitespace;
///
/// assert_eq!(normalize_whitespace("  a\n\t b&nbsp;c "), "a b c");
/// ```
#[must_use]
pub fn normalize_whitespace(content: &str) -> String {
    let spaced = NBSP.replace_all(content, " ");
    WHITESPACE_RUN
        .replace_all(&spaced, " ")
        .trim()
        .to_string()
}

/// Strips whitespace touching `<` or `>`, and drops the self-closing slash
/// from void elements.
///
/// Text directly inside a tag loses its padding as well, so
/// `<h1> Title </h1>` and `<h1>Title</h1>` compare equal.
#[must_use]
pub fn normalize_tags(content: &str) -> String {
    let content = BEFORE_SELF_CLOSE.replace_all(content, "/>");
    let content = AFTER_CLOSE_SLASH.replace_all(&content, "</");
    let content = AROUND_BRACKET.replace_all(&content, "$1");
    VOID_SELF_CLOSE
        .replace_all(&content, "<${1}${2}>")
        .into_owned()
}

/// Decodes the quote and apostrophe entity family.
///
/// `&lt;`, `&gt;` and `&amp;` stay encoded, so text can never turn into
/// markup and repeated decoding is a no-op.
#[must_use]
pub fn decode_entities(content: &str) -> String {
    QUOTE_ENTITY
        .replace_all(content, |caps: &Captures<'_>| {
            let entity = caps[0].to_ascii_lowercase();
            match entity.as_str() {
                "&quot;" => "\"",
                "&apos;" => "'",
                other if other.ends_with("22;") || other.ends_with("34;") => "\"",
                _ => "'",
            }
        })
        .into_owned()
}

/// Full normalization applied to response content and expected values.
///
/// ```
/// use expanse_domain::content::normalize;
///
/// let html = "<ul>\n  <li >One</li>\n  <li>Two&#x27;s</li>\n</ul>";
/// assert_eq!(normalize(html), "<ul><li>One</li><li>Two's</li></ul>");
/// ```
#[must_use]
pub fn normalize(content: &str) -> String {
    normalize_tags(&normalize_whitespace(&decode_entities(content)))
}

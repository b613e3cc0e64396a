//! Low-level search helpers shared by the matchers.

use std::ops::Range;

use regex::RegexBuilder;

/// Finds the first case-insensitive occurrence of `needle`, returning its
/// byte range in `haystack`.
pub(crate) fn find_case_insensitive(haystack: &str, needle: &str) -> Option<Range<usize>> {
    if needle.is_empty() {
        return None;
    }
    RegexBuilder::new(&regex::escape(needle))
        .case_insensitive(true)
        .build()
        .ok()?
        .find(haystack)
        .map(|m| m.range())
}

/// Renders `range` of `content` with up to `context_chars` characters on
/// either side, marking truncation with `...`.
pub(crate) fn snippet(content: &str, range: Range<usize>, context_chars: usize) -> String {
    let before = &content[..range.start];
    let after = &content[range.end..];

    let start = before
        .char_indices()
        .rev()
        .nth(context_chars.saturating_sub(1))
        .map_or(0, |(index, _)| index);
    let start = if context_chars == 0 { range.start } else { start };

    let end = after
        .char_indices()
        .nth(context_chars)
        .map_or(content.len(), |(index, _)| range.end + index);

    let mut rendered = String::new();
    if start > 0 {
        rendered.push_str("...");
    }
    rendered.push_str(&content[start..end]);
    if end < content.len() {
        rendered.push_str("...");
    }
    rendered
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_find_case_insensitive() {
        assert_eq!(find_case_insensitive("Hello World", "world"), Some(6..11));
        assert_eq!(find_case_insensitive("Hello", "bye"), None);
        assert_eq!(find_case_insensitive("Hello", ""), None);
        // Regex metacharacters are matched literally.
        assert_eq!(find_case_insensitive("a (b) c", "(B)"), Some(2..5));
    }

    #[test]
    fn test_snippet_truncates_both_sides() {
        let content = "0123456789abcdefghij";
        assert_eq!(snippet(content, 10..11, 3), "...789abcd...");
    }

    #[test]
    fn test_snippet_at_edges() {
        assert_eq!(snippet("abc", 0..1, 5), "abc");
        assert_eq!(snippet("abcdef", 4..6, 2), "...cdef");
    }

    #[test]
    fn test_snippet_respects_char_boundaries() {
        let content = "ééé<b>x</b>ééé";
        let start = content.find("<b>").unwrap_or_default();
        assert_eq!(snippet(content, start..start + 3, 2), "...éé<b>x<...");
    }
}

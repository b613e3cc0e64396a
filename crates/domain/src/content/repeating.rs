//! Repeating element counting.
//!
//! Counts opening and closing tags of one element type so tests can assert
//! how many list items, table rows or cards a page renders, and tell a short
//! page apart from one with an unterminated element.

use super::normalize::is_void_element;
use super::window::ContentWindow;
use crate::error::{AssertionError, AssertionResult};

/// Opening and closing tag counts for one element type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ElementTally {
    /// Opening tags (`<li>`, `<li class="x">`, `<br/>`).
    pub open: usize,
    /// Closing tags (`</li>`). Always zero for void elements.
    pub close: usize,
}

/// Reduces `li`, `<li>`, `</li>` or `<li class="x">` to `li`.
///
/// # Errors
///
/// Returns [`AssertionError::Configuration`] if no valid tag name remains.
pub fn element_name(element: &str) -> AssertionResult<String> {
    let trimmed = element
        .trim()
        .trim_start_matches('<')
        .trim_start_matches('/')
        .trim_end_matches('>')
        .trim_end_matches('/');
    let name = trimmed.split_whitespace().next().unwrap_or_default();

    let valid = name
        .chars()
        .next()
        .is_some_and(|first| first.is_ascii_alphabetic())
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == ':');
    if !valid {
        return Err(AssertionError::Configuration(format!(
            "invalid element name: {element:?}"
        )));
    }
    Ok(name.to_ascii_lowercase())
}

/// Counts opening and closing tags of `element` in `content`.
///
/// Matching ignores ASCII case. `<li` only counts when followed by `>`, `/`
/// or whitespace, so `<link>` is never mistaken for `<li>`.
///
/// # Errors
///
/// Returns [`AssertionError::Configuration`] for an invalid element name.
pub fn count_element(content: &str, element: &str) -> AssertionResult<ElementTally> {
    let name = element_name(element)?;
    let lowered = content.to_ascii_lowercase();

    let open = count_tags(&lowered, &format!("<{name}"), |next| {
        next == b'>' || next == b'/' || next.is_ascii_whitespace()
    });
    let close = if is_void_element(&name) {
        0
    } else {
        count_tags(&lowered, &format!("</{name}"), |next| {
            next == b'>' || next.is_ascii_whitespace()
        })
    };

    Ok(ElementTally { open, close })
}

fn count_tags(content: &str, prefix: &str, boundary: impl Fn(u8) -> bool) -> usize {
    let bytes = content.as_bytes();
    content
        .match_indices(prefix)
        .filter(|(index, _)| {
            bytes
                .get(index + prefix.len())
                .is_some_and(|next| boundary(*next))
        })
        .count()
}

/// Asserts that `element` appears exactly `expected` times, fully closed.
///
/// # Errors
///
/// - [`AssertionError::Configuration`] if `expected` is zero or the name is invalid.
/// - [`AssertionError::ElementCount`] if the opening tag count differs.
/// - [`AssertionError::UnbalancedElement`] if the opening count matches but
///   closing tags are missing or extra.
pub fn assert_repeating_element(
    window: &ContentWindow,
    element: &str,
    expected: usize,
) -> AssertionResult {
    if expected < 1 {
        return Err(AssertionError::Configuration(
            "expected repeat count must be at least 1".to_string(),
        ));
    }

    let name = element_name(element)?;
    let tally = count_element(window.as_str(), &name)?;

    if tally.open != expected {
        return Err(AssertionError::ElementCount {
            element: name,
            expected,
            found: tally.open,
        });
    }
    if !is_void_element(&name) && tally.close != tally.open {
        return Err(AssertionError::UnbalancedElement {
            element: name,
            open: tally.open,
            close: tally.close,
        });
    }
    Ok(())
}

//! Sequential substring matching.
//!
//! Expected values are located one after another inside a [`ContentWindow`].
//! In ordered mode a cursor moves past every match, so each value must appear
//! after the previous one. When a value cannot be found the failure is
//! classified so the test author sees *why*: wrong order, wrong casing,
//! outside the narrowed window, or simply absent.

use std::ops::Range;

use super::normalize::normalize;
use super::search::{find_case_insensitive, snippet};
use super::window::ContentWindow;
use crate::error::{AssertionError, AssertionResult, MatchDiagnostics};
use crate::expectation::ExpectedContent;
use crate::settings::AssertionSettings;

/// Knobs for content matching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchOptions {
    /// Search the whole window for every value instead of enforcing order.
    pub ignore_ordering: bool,
    /// How many neighbouring expected values to list on failure.
    pub diagnostic_window: usize,
    /// Characters of surrounding content shown on failure.
    pub context_chars: usize,
}

impl Default for MatchOptions {
    fn default() -> Self {
        Self {
            ignore_ordering: false,
            diagnostic_window: 3,
            context_chars: 40,
        }
    }
}

impl MatchOptions {
    /// Creates options with ordering enforced.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Derives diagnostic sizes from settings.
    #[must_use]
    pub const fn from_settings(settings: &AssertionSettings) -> Self {
        Self {
            ignore_ordering: false,
            diagnostic_window: settings.diagnostic_window,
            context_chars: settings.context_chars,
        }
    }

    /// Sets whether ordering is ignored.
    #[must_use]
    pub const fn with_ignore_ordering(mut self, ignore_ordering: bool) -> Self {
        self.ignore_ordering = ignore_ordering;
        self
    }
}

/// Asserts that every expected value appears in the window.
///
/// ```
/// use expanse_domain::content::{assert_content, ContentWindow, MatchOptions};
/// use expanse_domain::ExpectedContent;
///
/// let window = ContentWindow::new("<h1>Home Page Header</h1><p>Pretend this is the project landing page.</p>");
/// let expected = ExpectedContent::from(["<h1>Home Page Header</h1>", "project landing"]);
/// assert!(assert_content(&window, &expected, MatchOptions::new()).is_ok());
/// ```
///
/// # Errors
///
/// Returns the first failing value as [`AssertionError::OrderingViolation`],
/// [`AssertionError::CaseMismatch`] or [`AssertionError::NotFound`], or
/// [`AssertionError::Configuration`] for an empty value.
pub fn assert_content(
    window: &ContentWindow,
    expected: &ExpectedContent,
    options: MatchOptions,
) -> AssertionResult {
    let values = normalized_values(expected)?;
    let haystack = window.as_str();
    let mut cursor = 0;

    for (index, value) in values.iter().enumerate() {
        let from = if options.ignore_ordering { 0 } else { cursor };
        if let Some(offset) = haystack[from..].find(value.as_str()) {
            if !options.ignore_ordering {
                cursor = from + offset + value.len();
            }
            continue;
        }

        let context = FailureContext {
            window,
            expected,
            values: &values,
            index,
            options,
        };
        return Err(context.classify());
    }

    Ok(())
}

/// Asserts that none of the values appear in the window.
///
/// Matching is exact and case-sensitive; ordering does not apply.
///
/// # Errors
///
/// Returns [`AssertionError::UnexpectedContent`] for the first value present,
/// or [`AssertionError::Configuration`] for an empty value.
pub fn assert_not_content(
    window: &ContentWindow,
    expected: &ExpectedContent,
    options: MatchOptions,
) -> AssertionResult {
    let values = normalized_values(expected)?;
    let haystack = window.as_str();

    for (index, value) in values.iter().enumerate() {
        if let Some(offset) = haystack.find(value.as_str()) {
            let context = FailureContext {
                window,
                expected,
                values: &values,
                index,
                options,
            };
            return Err(AssertionError::UnexpectedContent {
                value: value.clone(),
                diagnostics: context.diagnostics(Some(offset..offset + value.len()), None),
            });
        }
    }

    Ok(())
}

fn normalized_values(expected: &ExpectedContent) -> AssertionResult<Vec<String>> {
    if expected.is_empty() {
        return Err(AssertionError::Configuration(
            "at least one expected content value is required".to_string(),
        ));
    }
    expected
        .iter()
        .map(|value| {
            let normalized = normalize(&value.text);
            if normalized.is_empty() {
                Err(AssertionError::Configuration(
                    "expected content values must not be empty".to_string(),
                ))
            } else {
                Ok(normalized)
            }
        })
        .collect()
}

/// Everything needed to explain a failed lookup.
struct FailureContext<'a> {
    window: &'a ContentWindow,
    expected: &'a ExpectedContent,
    values: &'a [String],
    index: usize,
    options: MatchOptions,
}

impl FailureContext<'_> {
    fn classify(&self) -> AssertionError {
        let value = self.values[self.index].clone();
        let haystack = self.window.as_str();

        // Exact match exists, so it must sit before the cursor.
        if !self.options.ignore_ordering {
            if let Some(offset) = haystack.find(value.as_str()) {
                return AssertionError::OrderingViolation {
                    diagnostics: self.diagnostics(Some(offset..offset + value.len()), None),
                    value,
                };
            }
        }

        if let Some(found) = find_case_insensitive(haystack, &value) {
            return AssertionError::CaseMismatch {
                found: haystack[found.clone()].to_string(),
                diagnostics: self.diagnostics(
                    Some(found),
                    Some("content values are matched case-sensitively".to_string()),
                ),
                value,
            };
        }

        let hint = (self.window.is_narrowed() && self.window.full().contains(value.as_str()))
            .then(|| {
                "value exists in the response, but outside the content_starts_after/content_ends_before window"
                    .to_string()
            });

        AssertionError::NotFound {
            diagnostics: self.diagnostics(None, hint),
            value,
        }
    }

    fn diagnostics(&self, location: Option<Range<usize>>, hint: Option<String>) -> MatchDiagnostics {
        let width = self.options.diagnostic_window;
        let preceding_start = self.index.saturating_sub(width);
        let following_end = (self.index + 1 + width).min(self.values.len());

        MatchDiagnostics {
            preceding: self.values[preceding_start..self.index].to_vec(),
            following: self.values[self.index + 1..following_end].to_vec(),
            snippet: location
                .map(|range| snippet(self.window.as_str(), range, self.options.context_chars)),
            note: self.expected.as_slice()[self.index].note.clone(),
            hint,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::expectation::ExpectedValue;
    use pretty_assertions::assert_eq;

    const HOME: &str =
        "<h1>Home Page Header</h1><p>Pretend this is the project landing page.</p>";

    fn window(content: &str) -> ContentWindow {
        ContentWindow::new(content)
    }

    #[test]
    fn test_ordered_values_pass() {
        let expected = ExpectedContent::from(["<h1>Home Page Header</h1>", "project landing"]);
        assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap();
    }

    #[test]
    fn test_reversed_values_fail_with_ordering_error() {
        let expected = ExpectedContent::from(["project landing", "<h1>Home Page Header</h1>"]);
        let err = assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap_err();
        match err {
            AssertionError::OrderingViolation { value, diagnostics } => {
                assert_eq!(value, "<h1>Home Page Header</h1>");
                assert_eq!(diagnostics.preceding, vec!["project landing".to_string()]);
                assert!(diagnostics.following.is_empty());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_ignore_ordering_accepts_any_order() {
        let expected = ExpectedContent::from(["project landing", "<h1>Home Page Header</h1>"]);
        let options = MatchOptions::new().with_ignore_ordering(true);
        assert_content(&window(HOME), &expected, options).unwrap();
    }

    #[test]
    fn test_repeated_value_needs_repeated_occurrence() {
        let expected = ExpectedContent::from(["Home", "Home"]);
        let err = assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap_err();
        assert!(matches!(err, AssertionError::OrderingViolation { .. }));

        let twice = window("<p>Home</p><p>Home</p>");
        assert_content(&twice, &expected, MatchOptions::new()).unwrap();
    }

    #[test]
    fn test_casing_mismatch_is_reported_distinctly() {
        let expected = ExpectedContent::from("PROJECT LANDING");
        let err = assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap_err();
        match err {
            AssertionError::CaseMismatch {
                value,
                found,
                diagnostics,
            } => {
                assert_eq!(value, "PROJECT LANDING");
                assert_eq!(found, "project landing");
                assert!(diagnostics.snippet.unwrap().contains("project landing"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_value() {
        let expected = ExpectedContent::from(["Home", "Nowhere to be seen", "landing"]);
        let err = assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap_err();
        match err {
            AssertionError::NotFound { value, diagnostics } => {
                assert_eq!(value, "Nowhere to be seen");
                assert_eq!(diagnostics.preceding, vec!["Home".to_string()]);
                assert_eq!(diagnostics.following, vec!["landing".to_string()]);
                assert!(diagnostics.hint.is_none());
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_diagnostic_window_bounds_neighbours() {
        let expected = ExpectedContent::from(["a", "b", "c", "d", "missing", "e", "f"]);
        let page = window("a b c d e f");
        let options = MatchOptions {
            diagnostic_window: 2,
            ..MatchOptions::new()
        };
        let err = assert_content(&page, &expected, options).unwrap_err();
        match err {
            AssertionError::NotFound { diagnostics, .. } => {
                assert_eq!(diagnostics.preceding, vec!["c".to_string(), "d".to_string()]);
                assert_eq!(diagnostics.following, vec!["e".to_string(), "f".to_string()]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_note_is_carried_into_failure() {
        let expected = ExpectedContent::from(ExpectedValue::new("absent").with_note("sidebar link"));
        let err = assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap_err();
        assert!(err.to_string().contains("note: sidebar link"));
    }

    #[test]
    fn test_expected_values_are_normalized() {
        let expected = ExpectedContent::from("<h1>\n    Home   Page Header\n</h1>");
        assert_content(&window(HOME), &expected, MatchOptions::new()).unwrap();
    }

    #[test]
    fn test_value_outside_window_gets_hint() {
        let page = ContentWindow::narrow(HOME, Some("</h1>"), None).unwrap();
        let expected = ExpectedContent::from("Home Page Header");
        let err = assert_content(&page, &expected, MatchOptions::new()).unwrap_err();
        match err {
            AssertionError::NotFound { diagnostics, .. } => {
                assert!(diagnostics.hint.unwrap().contains("outside"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_starts_after_then_match() {
        let page = ContentWindow::narrow(HOME, Some("<h1>"), None).unwrap();
        assert_content(&page, &ExpectedContent::from("landing"), MatchOptions::new()).unwrap();

        // Overlapping the marker is not "after" it.
        let page = ContentWindow::narrow(HOME, Some("Home Page"), None).unwrap();
        let err = assert_content(&page, &ExpectedContent::from("<h1>Home"), MatchOptions::new())
            .unwrap_err();
        assert!(matches!(err, AssertionError::NotFound { .. }));
    }

    #[test]
    fn test_empty_values_are_rejected() {
        let err = assert_content(&window(HOME), &ExpectedContent::new(), MatchOptions::new())
            .unwrap_err();
        assert!(matches!(err, AssertionError::Configuration(_)));

        let err = assert_content(&window(HOME), &ExpectedContent::from("  \n "), MatchOptions::new())
            .unwrap_err();
        assert!(matches!(err, AssertionError::Configuration(_)));
    }

    #[test]
    fn test_not_content() {
        let options = MatchOptions::new();
        assert_not_content(&window(HOME), &ExpectedContent::from(["Login", "Logout"]), options)
            .unwrap();

        let err = assert_not_content(&window(HOME), &ExpectedContent::from(["Login", "landing"]), options)
            .unwrap_err();
        match err {
            AssertionError::UnexpectedContent { value, diagnostics } => {
                assert_eq!(value, "landing");
                assert!(diagnostics.snippet.is_some());
            }
            other => panic!("unexpected error: {other:?}"),
        }

        // Different casing does not count as present.
        assert_not_content(&window(HOME), &ExpectedContent::from("HOME PAGE"), options).unwrap();
    }
}

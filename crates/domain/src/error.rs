//! Domain error types

use std::fmt;

use thiserror::Error;

/// Domain-level errors that can occur while parsing or validating values.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The HTTP method is not supported.
    #[error("unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// The message level name is unknown.
    #[error("unknown message level: {0}")]
    UnknownMessageLevel(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Which window marker an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Marker {
    /// The `content_starts_after` marker.
    StartsAfter,
    /// The `content_ends_before` marker.
    EndsBefore,
}

impl fmt::Display for Marker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartsAfter => f.write_str("content_starts_after"),
            Self::EndsBefore => f.write_str("content_ends_before"),
        }
    }
}

/// Extra context attached to content matching failures.
///
/// Rendered after the headline of the error, one item per line, so a failing
/// test shows which neighbouring expected values matched and where in the
/// page the problem sits.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MatchDiagnostics {
    /// Expected values that come right before the failing one.
    pub preceding: Vec<String>,
    /// Expected values that come right after the failing one.
    pub following: Vec<String>,
    /// Content surrounding the relevant location.
    pub snippet: Option<String>,
    /// Auxiliary text supplied with the expected value.
    pub note: Option<String>,
    /// Additional explanation produced by the matcher.
    pub hint: Option<String>,
}

impl MatchDiagnostics {
    /// Returns true if no diagnostic information is present.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.preceding.is_empty()
            && self.following.is_empty()
            && self.snippet.is_none()
            && self.note.is_none()
            && self.hint.is_none()
    }
}

impl fmt::Display for MatchDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(note) = &self.note {
            write!(f, "\n  note: {note}")?;
        }
        if let Some(hint) = &self.hint {
            write!(f, "\n  hint: {hint}")?;
        }
        if !self.preceding.is_empty() {
            write!(f, "\n  preceding expected values: {:?}", self.preceding)?;
        }
        if !self.following.is_empty() {
            write!(f, "\n  following expected values: {:?}", self.following)?;
        }
        if let Some(snippet) = &self.snippet {
            write!(f, "\n  context: {snippet}")?;
        }
        Ok(())
    }
}

/// Failure raised by an assertion helper.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AssertionError {
    /// An expected content value is absent.
    #[error("could not find expected content value in response: {value:?}{diagnostics}")]
    NotFound {
        /// The normalized expected value.
        value: String,
        /// Surrounding context.
        diagnostics: MatchDiagnostics,
    },

    /// An expected content value exists, but not after the values before it.
    #[error(
        "expected content value was found, but ordering of values does not match: {value:?}{diagnostics}"
    )]
    OrderingViolation {
        /// The value found out of sequence.
        value: String,
        /// Surrounding context.
        diagnostics: MatchDiagnostics,
    },

    /// An expected value exists only with different letter casing.
    #[error(
        "expected content value {value:?} was only found with different letter casing as {found:?}{diagnostics}"
    )]
    CaseMismatch {
        /// The normalized expected value.
        value: String,
        /// The text actually present in the response.
        found: String,
        /// Surrounding context.
        diagnostics: MatchDiagnostics,
    },

    /// A value that must be absent was found.
    #[error("found content value which should be absent from response: {value:?}{diagnostics}")]
    UnexpectedContent {
        /// The normalized value.
        value: String,
        /// Surrounding context.
        diagnostics: MatchDiagnostics,
    },

    /// A window marker is absent.
    #[error("could not find {marker} value in response content: {value:?}")]
    MarkerNotFound {
        /// Which marker failed.
        marker: Marker,
        /// The normalized marker value.
        value: String,
    },

    /// The end marker only occurs before the start marker.
    #[error(
        "content_ends_before value {ends_before:?} was only found before content_starts_after value {starts_after:?}"
    )]
    MarkerOrder {
        /// The normalized start marker.
        starts_after: String,
        /// The normalized end marker.
        ends_before: String,
    },

    /// Opening tag count does not equal the expected repeat count.
    #[error("expected {expected} <{element}> element(s) in response, found {found}")]
    ElementCount {
        /// Tag name.
        element: String,
        /// Expected count.
        expected: usize,
        /// Opening tags found.
        found: usize,
    },

    /// Opening and closing tag counts disagree.
    #[error(
        "found {open} opening <{element}> tag(s) but {close} closing </{element}> tag(s); element is unterminated or partial"
    )]
    UnbalancedElement {
        /// Tag name.
        element: String,
        /// Opening tags found.
        open: usize,
        /// Closing tags found.
        close: usize,
    },

    /// No element matched a lookup.
    #[error("could not find any element matching {query}")]
    ElementNotFound {
        /// Description of the lookup.
        query: String,
    },

    /// More than one element matched a lookup that required exactly one.
    #[error("expected exactly one element matching {query}, found {count}")]
    Ambiguous {
        /// Description of the lookup.
        query: String,
        /// Number of elements found.
        count: usize,
    },

    /// Unexpected status code.
    #[error("expected status code {expected}, got {actual}")]
    StatusMismatch {
        /// Description of the expectation.
        expected: String,
        /// Actual status code.
        actual: u16,
    },

    /// Redirect target differs or no redirect occurred.
    #[error("expected redirect to {expected:?}, {actual}")]
    RedirectMismatch {
        /// Expected target url.
        expected: String,
        /// What happened instead.
        actual: String,
    },

    /// Response url differs.
    #[error("expected response url {expected:?}, got {actual:?}")]
    UrlMismatch {
        /// Expected url.
        expected: String,
        /// Actual url.
        actual: String,
    },

    /// Page title differs.
    #[error("expected page title {expected:?}, got {actual:?}")]
    TitleMismatch {
        /// Expected title.
        expected: String,
        /// Actual normalized title.
        actual: String,
    },

    /// Page header differs.
    #[error("expected page header {expected:?}, got {actual:?}")]
    HeaderMismatch {
        /// Expected header.
        expected: String,
        /// Actual normalized header.
        actual: String,
    },

    /// A context message is missing.
    #[error("could not find context message {expected:?}; messages present: {actual:?}")]
    MessageNotFound {
        /// Expected message text.
        expected: String,
        /// Messages present in the response.
        actual: Vec<String>,
    },

    /// A context message that must be absent was found.
    #[error("found context message which should be absent: {message:?}")]
    UnexpectedMessage {
        /// The offending message text.
        message: String,
    },

    /// JSON body differs.
    #[error("response JSON does not match\n  expected: {expected}\n  actual: {actual}")]
    JsonMismatch {
        /// Expected value, serialized.
        expected: String,
        /// Actual value, serialized.
        actual: String,
    },

    /// The assertion was called with conflicting or invalid arguments.
    #[error("invalid assertion arguments: {0}")]
    Configuration(String),
}

/// Result type alias for assertion helpers.
pub type AssertionResult<T = ()> = Result<T, AssertionError>;

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_diagnostics_render_each_part() {
        let diagnostics = MatchDiagnostics {
            preceding: vec!["a".to_string()],
            following: vec!["c".to_string()],
            snippet: Some("...a b c...".to_string()),
            note: Some("from sidebar".to_string()),
            hint: None,
        };
        let rendered = diagnostics.to_string();
        assert!(rendered.contains("note: from sidebar"));
        assert!(rendered.contains(r#"preceding expected values: ["a"]"#));
        assert!(rendered.contains(r#"following expected values: ["c"]"#));
        assert!(rendered.contains("context: ...a b c..."));
    }

    #[test]
    fn test_empty_diagnostics_render_nothing() {
        let diagnostics = MatchDiagnostics::default();
        assert!(diagnostics.is_empty());
        assert_eq!(diagnostics.to_string(), "");
    }

    #[test]
    fn test_marker_display() {
        assert_eq!(Marker::StartsAfter.to_string(), "content_starts_after");
        assert_eq!(Marker::EndsBefore.to_string(), "content_ends_before");
    }

    #[test]
    fn test_error_messages_name_the_value() {
        let error = AssertionError::OrderingViolation {
            value: "<h1>Home</h1>".to_string(),
            diagnostics: MatchDiagnostics::default(),
        };
        assert_eq!(
            error.to_string(),
            r#"expected content value was found, but ordering of values does not match: "<h1>Home</h1>""#
        );
    }
}

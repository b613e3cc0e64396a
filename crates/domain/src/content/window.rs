//! Search window narrowing.
//!
//! A [`ContentWindow`] owns the normalized response content together with the
//! byte range that assertions are allowed to look at. The range starts as the
//! whole document and can be cut down with a `content_starts_after` marker
//! and a `content_ends_before` marker.

use std::ops::Range;

use super::normalize::normalize;
use super::search::{find_case_insensitive, snippet};
use crate::error::{AssertionError, AssertionResult, Marker, MatchDiagnostics};

const MARKER_CONTEXT_CHARS: usize = 40;

/// Normalized content plus the region assertions search in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentWindow {
    content: String,
    range: Range<usize>,
    starts_after: Option<String>,
    ends_before: Option<String>,
}

impl ContentWindow {
    /// Normalizes raw content and spans the whole document.
    #[must_use]
    pub fn new(raw: &str) -> Self {
        Self::from_normalized(normalize(raw))
    }

    /// Wraps content that is already normalized.
    #[must_use]
    pub fn from_normalized(content: String) -> Self {
        let range = 0..content.len();
        Self {
            content,
            range,
            starts_after: None,
            ends_before: None,
        }
    }

    /// Normalizes raw content and applies both optional markers.
    ///
    /// The end marker is searched for after the start marker.
    ///
    /// # Errors
    ///
    /// Returns an error if a marker is empty, missing, only present with
    /// different casing, or (for the end marker) only present before or
    /// overlapping the start marker.
    pub fn narrow(
        raw: &str,
        starts_after: Option<&str>,
        ends_before: Option<&str>,
    ) -> AssertionResult<Self> {
        let mut window = Self::new(raw);
        if let Some(marker) = starts_after {
            window = window.starts_after(marker)?;
        }
        if let Some(marker) = ends_before {
            window = window.ends_before(marker)?;
        }
        Ok(window)
    }

    /// Restricts the window to the region strictly after the first
    /// occurrence of `marker`.
    ///
    /// # Errors
    ///
    /// See [`ContentWindow::narrow`].
    pub fn starts_after(mut self, marker: &str) -> AssertionResult<Self> {
        let marker = Self::normalized_marker(marker, Marker::StartsAfter)?;
        let found = self.locate(&marker, Marker::StartsAfter)?;
        self.range.start = found.end;
        self.starts_after = Some(marker);
        Ok(self)
    }

    /// Restricts the window to the region strictly before the first
    /// occurrence of `marker` inside the current window.
    ///
    /// # Errors
    ///
    /// See [`ContentWindow::narrow`].
    pub fn ends_before(mut self, marker: &str) -> AssertionResult<Self> {
        let marker = Self::normalized_marker(marker, Marker::EndsBefore)?;
        let found = self.locate(&marker, Marker::EndsBefore)?;
        self.range.end = found.start;
        self.ends_before = Some(marker);
        Ok(self)
    }

    /// The searchable region.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.content[self.range.clone()]
    }

    /// The whole normalized document, ignoring markers.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.content
    }

    /// Byte range of the searchable region within [`ContentWindow::full`].
    #[must_use]
    pub fn range(&self) -> Range<usize> {
        self.range.clone()
    }

    /// Returns true if any marker has been applied.
    #[must_use]
    pub const fn is_narrowed(&self) -> bool {
        self.starts_after.is_some() || self.ends_before.is_some()
    }

    /// Normalized start marker, if applied.
    #[must_use]
    pub fn starts_after_marker(&self) -> Option<&str> {
        self.starts_after.as_deref()
    }

    /// Normalized end marker, if applied.
    #[must_use]
    pub fn ends_before_marker(&self) -> Option<&str> {
        self.ends_before.as_deref()
    }

    fn normalized_marker(marker: &str, kind: Marker) -> AssertionResult<String> {
        let normalized = normalize(marker);
        if normalized.is_empty() {
            return Err(AssertionError::Configuration(format!(
                "{kind} value must not be empty"
            )));
        }
        Ok(normalized)
    }

    /// Finds `marker` in the current window and returns its absolute range.
    fn locate(&self, marker: &str, kind: Marker) -> AssertionResult<Range<usize>> {
        let window = self.as_str();
        if let Some(offset) = window.find(marker) {
            let start = self.range.start + offset;
            return Ok(start..start + marker.len());
        }

        if let Some(found) = find_case_insensitive(window, marker) {
            return Err(AssertionError::CaseMismatch {
                value: marker.to_string(),
                found: window[found.clone()].to_string(),
                diagnostics: MatchDiagnostics {
                    snippet: Some(snippet(window, found, MARKER_CONTEXT_CHARS)),
                    hint: Some(format!("{kind} values are matched case-sensitively")),
                    ..MatchDiagnostics::default()
                },
            });
        }

        if kind == Marker::EndsBefore {
            if let Some(starts_after) = &self.starts_after {
                if self.content.contains(marker) {
                    return Err(AssertionError::MarkerOrder {
                        starts_after: starts_after.clone(),
                        ends_before: marker.to_string(),
                    });
                }
            }
        }

        Err(AssertionError::MarkerNotFound {
            marker: kind,
            value: marker.to_string(),
        })
    }
}

//! Expected values for response assertions.
//!
//! These types describe what a test expects to see: a status code, or one or
//! more content values that must (or must not) appear in the page.

use serde::{Deserialize, Serialize};

/// A single expected content value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpectedValue {
    /// Text to search for.
    pub text: String,
    /// Auxiliary text echoed in failure messages.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl ExpectedValue {
    /// Creates an expected value without a note.
    #[must_use]
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            note: None,
        }
    }

    /// Attaches a note shown when this value fails to match.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }
}

impl From<&str> for ExpectedValue {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for ExpectedValue {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

impl From<&String> for ExpectedValue {
    fn from(text: &String) -> Self {
        Self::new(text.as_str())
    }
}

impl From<(&str, &str)> for ExpectedValue {
    fn from((text, note): (&str, &str)) -> Self {
        Self::new(text).with_note(note)
    }
}

impl From<(String, String)> for ExpectedValue {
    fn from((text, note): (String, String)) -> Self {
        Self::new(text).with_note(note)
    }
}

/// An ordered list of expected content values.
///
/// Built from a single string or from any list of values:
///
/// ```
/// use expanse_domain::ExpectedContent;
///
/// let single = ExpectedContent::from("Welcome");
/// let many = ExpectedContent::from(["<h1>Home</h1>", "Welcome"]);
/// let annotated = ExpectedContent::from(vec![("Welcome", "greeting banner")]);
/// assert_eq!(single.len(), 1);
/// assert_eq!(many.len(), 2);
/// assert_eq!(annotated.iter().next().and_then(|v| v.note.as_deref()), Some("greeting banner"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpectedContent {
    values: Vec<ExpectedValue>,
}

impl ExpectedContent {
    /// Creates an empty list.
    #[must_use]
    pub const fn new() -> Self {
        Self { values: Vec::new() }
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<ExpectedValue>) {
        self.values.push(value.into());
    }

    /// Appends a value (builder pattern).
    #[must_use]
    pub fn with(mut self, value: impl Into<ExpectedValue>) -> Self {
        self.push(value);
        self
    }

    /// Iterates over the values in order.
    pub fn iter(&self) -> std::slice::Iter<'_, ExpectedValue> {
        self.values.iter()
    }

    /// The values as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[ExpectedValue] {
        &self.values
    }

    /// Returns the number of values.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns true if there are no values.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

impl<'a> IntoIterator for &'a ExpectedContent {
    type Item = &'a ExpectedValue;
    type IntoIter = std::slice::Iter<'a, ExpectedValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.values.iter()
    }
}

impl<T: Into<ExpectedValue>> FromIterator<T> for ExpectedContent {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<ExpectedValue> for ExpectedContent {
    fn from(value: ExpectedValue) -> Self {
        Self {
            values: vec![value],
        }
    }
}

impl From<&str> for ExpectedContent {
    fn from(text: &str) -> Self {
        ExpectedValue::from(text).into()
    }
}

impl From<String> for ExpectedContent {
    fn from(text: String) -> Self {
        ExpectedValue::from(text).into()
    }
}

impl From<(&str, &str)> for ExpectedContent {
    fn from(pair: (&str, &str)) -> Self {
        ExpectedValue::from(pair).into()
    }
}

impl<T: Into<ExpectedValue>> From<Vec<T>> for ExpectedContent {
    fn from(values: Vec<T>) -> Self {
        values.into_iter().collect()
    }
}

impl<T: Into<ExpectedValue>, const N: usize> From<[T; N]> for ExpectedContent {
    fn from(values: [T; N]) -> Self {
        values.into_iter().collect()
    }
}

/// Expected status code value or range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum StatusExpectation {
    /// Exact status code.
    Exact(u16),
    /// Range of status codes (e.g., 200-299).
    Range {
        /// Minimum status code (inclusive).
        min: u16,
        /// Maximum status code (inclusive).
        max: u16,
    },
    /// One of multiple status codes.
    OneOf(Vec<u16>),
}

impl StatusExpectation {
    /// Check if a status code matches this expectation.
    #[must_use]
    pub fn matches(&self, status: u16) -> bool {
        match self {
            Self::Exact(expected) => status == *expected,
            Self::Range { min, max } => status >= *min && status <= *max,
            Self::OneOf(codes) => codes.contains(&status),
        }
    }

    /// Get description of the expectation.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Exact(code) => code.to_string(),
            Self::Range { min, max } => format!("in {min}-{max}"),
            Self::OneOf(codes) => {
                let codes_str: Vec<_> = codes.iter().map(ToString::to_string).collect();
                format!("in [{}]", codes_str.join(", "))
            }
        }
    }

    /// Create a "success" expectation (200-299).
    #[must_use]
    pub const fn success() -> Self {
        Self::Range { min: 200, max: 299 }
    }

    /// Create an exact status expectation.
    #[must_use]
    pub const fn exact(code: u16) -> Self {
        Self::Exact(code)
    }
}

impl Default for StatusExpectation {
    fn default() -> Self {
        Self::Exact(200)
    }
}

impl From<u16> for StatusExpectation {
    fn from(code: u16) -> Self {
        Self::Exact(code)
    }
}

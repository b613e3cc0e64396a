//! HTML inspector port
//!
//! Runs CSS selectors over page markup.

/// A matched element, captured as plain strings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSnapshot {
    /// Lowercase tag name.
    pub tag: String,
    /// Serialized element, including its children.
    pub html: String,
    /// All descendant text, concatenated.
    pub text: String,
    /// Text of the element's direct text nodes only.
    pub own_text: String,
}

/// Errors raised while inspecting markup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InspectError {
    /// The selector could not be parsed.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// Selector as given.
        selector: String,
        /// Parser message.
        reason: String,
    },
}

/// Port for querying HTML documents.
pub trait HtmlInspector {
    /// Returns every element matching `selector`, in document order.
    ///
    /// # Errors
    /// Returns `InspectError::InvalidSelector` if the selector is malformed.
    fn select(&self, html: &str, selector: &str) -> Result<Vec<ElementSnapshot>, InspectError>;
}

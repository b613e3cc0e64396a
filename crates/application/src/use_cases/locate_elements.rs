//! Element locators.
//!
//! Plural lookups (`find_elements_by_*`) fail when nothing matches; singular
//! lookups (`find_element_by_*`) also fail when more than one element
//! matches. Found elements are returned as serialized HTML.

use expanse_domain::content::{decode_entities, element_name, normalize_whitespace};
use expanse_domain::{AssertionError, AssertionResult};

use crate::ports::{ElementSnapshot, HtmlInspector, InspectError};

/// Runs element lookups through an [`HtmlInspector`].
#[derive(Debug, Clone, Default)]
pub struct ElementLocator<I: HtmlInspector> {
    inspector: I,
}

impl<I: HtmlInspector> ElementLocator<I> {
    /// Creates a locator.
    #[must_use]
    pub const fn new(inspector: I) -> Self {
        Self { inspector }
    }

    /// Returns the inspector.
    #[must_use]
    pub const fn inspector(&self) -> &I {
        &self.inspector
    }

    /// Runs a raw selector.
    ///
    /// # Errors
    /// Returns `AssertionError::Configuration` for an unparsable selector.
    pub fn select(&self, html: &str, selector: &str) -> AssertionResult<Vec<ElementSnapshot>> {
        self.inspector
            .select(html, selector)
            .map_err(|InspectError::InvalidSelector { selector, reason }| {
                AssertionError::Configuration(format!("invalid selector {selector:?}: {reason}"))
            })
    }

    /// Normalized text of the first `<title>`.
    ///
    /// # Errors
    /// Only fails if the inspector rejects the built-in selector.
    pub fn page_title(&self, html: &str) -> AssertionResult<Option<String>> {
        self.first_text(html, "title")
    }

    /// Normalized text of the first `<h1>`.
    ///
    /// # Errors
    /// Only fails if the inspector rejects the built-in selector.
    pub fn page_header(&self, html: &str) -> AssertionResult<Option<String>> {
        self.first_text(html, "h1")
    }

    fn first_text(&self, html: &str, selector: &str) -> AssertionResult<Option<String>> {
        Ok(self
            .select(html, selector)?
            .first()
            .map(|element| normalize_whitespace(&element.text)))
    }

    /// Elements with the given tag name.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Configuration` for an
    /// invalid tag name.
    pub fn find_elements_by_tag(&self, html: &str, tag: &str) -> AssertionResult<Vec<String>> {
        let name = element_name(tag)?;
        self.find_all(html, &name, format!("tag <{name}>"))
    }

    /// The single element with the given tag name.
    ///
    /// # Errors
    /// As [`Self::find_elements_by_tag`], plus `Ambiguous` on several matches.
    pub fn find_element_by_tag(&self, html: &str, tag: &str) -> AssertionResult<String> {
        let name = element_name(tag)?;
        self.find_one(html, &name, format!("tag <{name}>"))
    }

    /// Elements with the given `id`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_id(&self, html: &str, id: &str) -> AssertionResult<Vec<String>> {
        self.find_all(html, &attribute_selector("id", id), format!("id {id:?}"))
    }

    /// The single element with the given `id`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Ambiguous` on several matches.
    pub fn find_element_by_id(&self, html: &str, id: &str) -> AssertionResult<String> {
        self.find_one(html, &attribute_selector("id", id), format!("id {id:?}"))
    }

    /// Elements carrying the given CSS class.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_class(&self, html: &str, class: &str) -> AssertionResult<Vec<String>> {
        self.find_all(html, &class_selector(class), format!("class {class:?}"))
    }

    /// The single element carrying the given CSS class.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Ambiguous` on several matches.
    pub fn find_element_by_class(&self, html: &str, class: &str) -> AssertionResult<String> {
        self.find_one(html, &class_selector(class), format!("class {class:?}"))
    }

    /// Elements matching a CSS selector.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Configuration` for an
    /// unparsable selector.
    pub fn find_elements_by_css_selector(
        &self,
        html: &str,
        selector: &str,
    ) -> AssertionResult<Vec<String>> {
        self.find_all(html, selector, format!("selector {selector:?}"))
    }

    /// The single element matching a CSS selector.
    ///
    /// # Errors
    /// As [`Self::find_elements_by_css_selector`], plus `Ambiguous`.
    pub fn find_element_by_css_selector(
        &self,
        html: &str,
        selector: &str,
    ) -> AssertionResult<String> {
        self.find_one(html, selector, format!("selector {selector:?}"))
    }

    /// Elements whose `data-*` attribute equals `value`. The `data-`
    /// prefix on `name` is optional.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_data_attribute(
        &self,
        html: &str,
        name: &str,
        value: &str,
    ) -> AssertionResult<Vec<String>> {
        let attribute = data_attribute(name);
        let query = format!("{attribute}={value:?}");
        self.find_all(html, &attribute_selector(&attribute, value), query)
    }

    /// The single element whose `data-*` attribute equals `value`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Ambiguous` on several matches.
    pub fn find_element_by_data_attribute(
        &self,
        html: &str,
        name: &str,
        value: &str,
    ) -> AssertionResult<String> {
        let attribute = data_attribute(name);
        let query = format!("{attribute}={value:?}");
        self.find_one(html, &attribute_selector(&attribute, value), query)
    }

    /// Elements whose `name` attribute equals `name`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_name(&self, html: &str, name: &str) -> AssertionResult<Vec<String>> {
        self.find_all(html, &attribute_selector("name", name), format!("name {name:?}"))
    }

    /// The single element whose `name` attribute equals `name`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Ambiguous` on several matches.
    pub fn find_element_by_name(&self, html: &str, name: &str) -> AssertionResult<String> {
        self.find_one(html, &attribute_selector("name", name), format!("name {name:?}"))
    }

    /// Links whose text contains `text`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_link_text(
        &self,
        html: &str,
        text: &str,
    ) -> AssertionResult<Vec<String>> {
        require_any(format!("link text {text:?}"), self.links(html, text)?)
    }

    /// The single link whose text contains `text`.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Ambiguous` on several matches.
    pub fn find_element_by_link_text(&self, html: &str, text: &str) -> AssertionResult<String> {
        require_one(format!("link text {text:?}"), self.links(html, text)?)
    }

    /// Innermost elements whose own text contains `text`, optionally limited
    /// to one tag.
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches; `Configuration` for an
    /// invalid tag name.
    pub fn find_elements_by_text(
        &self,
        html: &str,
        text: &str,
        tag: Option<&str>,
    ) -> AssertionResult<Vec<String>> {
        let (found, query) = self.texts(html, text, tag)?;
        require_any(query, found)
    }

    /// The single innermost element whose own text contains `text`.
    ///
    /// # Errors
    /// As [`Self::find_elements_by_text`], plus `Ambiguous`.
    pub fn find_element_by_text(
        &self,
        html: &str,
        text: &str,
        tag: Option<&str>,
    ) -> AssertionResult<String> {
        let (found, query) = self.texts(html, text, tag)?;
        require_one(query, found)
    }

    fn find_all(&self, html: &str, selector: &str, query: String) -> AssertionResult<Vec<String>> {
        require_any(query, self.serialized(html, selector)?)
    }

    fn find_one(&self, html: &str, selector: &str, query: String) -> AssertionResult<String> {
        require_one(query, self.serialized(html, selector)?)
    }

    fn serialized(&self, html: &str, selector: &str) -> AssertionResult<Vec<String>> {
        Ok(self
            .select(html, selector)?
            .into_iter()
            .map(|element| element.html)
            .collect())
    }

    fn links(&self, html: &str, text: &str) -> AssertionResult<Vec<String>> {
        let needle = comparable(text);
        Ok(self
            .select(html, "a")?
            .into_iter()
            .filter(|link| normalize_whitespace(&link.text).contains(&needle))
            .map(|link| link.html)
            .collect())
    }

    fn texts(
        &self,
        html: &str,
        text: &str,
        tag: Option<&str>,
    ) -> AssertionResult<(Vec<String>, String)> {
        let (name, query) = match tag {
            Some(tag) => {
                let name = element_name(tag)?;
                let query = format!("text {text:?} in <{name}>");
                (Some(name), query)
            }
            None => (None, format!("text {text:?}")),
        };
        let needle = comparable(text);
        let matches: Vec<ElementSnapshot> = self
            .select(html, "*")?
            .into_iter()
            .filter(|element| {
                name.as_deref()
                    .is_none_or(|name| element.tag.eq_ignore_ascii_case(name))
            })
            .filter(|element| normalize_whitespace(&element.own_text).contains(&needle))
            .collect();
        Ok((innermost(&matches), query))
    }
}

/// Drops every match that has another match nested inside it.
///
/// Matches arrive in document order, so descendants always follow their
/// ancestors.
fn innermost(matches: &[ElementSnapshot]) -> Vec<String> {
    let has_nested_match = |index: usize| {
        let outer = &matches[index].html;
        matches[index + 1..]
            .iter()
            .any(|inner| inner.html.len() < outer.len() && outer.contains(inner.html.as_str()))
    };
    (0..matches.len())
        .filter(|&index| !has_nested_match(index))
        .map(|index| matches[index].html.clone())
        .collect()
}

fn comparable(text: &str) -> String {
    normalize_whitespace(&decode_entities(text))
}

fn require_any(query: String, found: Vec<String>) -> AssertionResult<Vec<String>> {
    if found.is_empty() {
        Err(AssertionError::ElementNotFound { query })
    } else {
        Ok(found)
    }
}

fn require_one(query: String, mut found: Vec<String>) -> AssertionResult<String> {
    match found.len() {
        0 => Err(AssertionError::ElementNotFound { query }),
        1 => Ok(found.remove(0)),
        count => Err(AssertionError::Ambiguous { query, count }),
    }
}

fn data_attribute(name: &str) -> String {
    let name = name.trim();
    if name.starts_with("data-") {
        name.to_string()
    } else {
        format!("data-{name}")
    }
}

fn attribute_selector(attribute: &str, value: &str) -> String {
    format!("[{attribute}=\"{}\"]", escape_css_string(value))
}

fn class_selector(class: &str) -> String {
    format!("[class~=\"{}\"]", escape_css_string(class.trim()))
}

fn escape_css_string(value: &str) -> String {
    value.replace('\\', "\\\\").replace('"', "\\\"")
}

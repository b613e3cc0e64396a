//! `HtmlInspector` implementation using scraper.

use expanse_application::ports::{ElementSnapshot, HtmlInspector, InspectError};
use scraper::{ElementRef, Html, Selector};

/// Parses markup with `scraper` and runs CSS selectors over it.
///
/// Input is parsed as a full document, so fragments are wrapped in
/// `<html><body>` before selection.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScraperInspector;

impl ScraperInspector {
    /// Creates an inspector.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn snapshot(element: ElementRef<'_>) -> ElementSnapshot {
        let own_text = element
            .children()
            .filter_map(|child| child.value().as_text().map(|text| &**text))
            .collect();
        ElementSnapshot {
            tag: element.value().name().to_ascii_lowercase(),
            html: element.html(),
            text: element.text().collect(),
            own_text,
        }
    }
}

impl HtmlInspector for ScraperInspector {
    fn select(&self, html: &str, selector: &str) -> Result<Vec<ElementSnapshot>, InspectError> {
        let parsed = Selector::parse(selector).map_err(|e| InspectError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })?;
        let document = Html::parse_document(html);
        Ok(document.select(&parsed).map(Self::snapshot).collect())
    }
}

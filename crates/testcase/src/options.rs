//! Assertion option bundles.

use expanse_domain::{AssertionResult, ContentWindow, ExpectedContent, StatusExpectation};

/// How page content is searched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContentOptions {
    /// Accept expected values in any order.
    pub ignore_ordering: bool,
    /// Only search after the first occurrence of this marker.
    pub content_starts_after: Option<String>,
    /// Only search before the first occurrence of this marker.
    pub content_ends_before: Option<String>,
}

impl ContentOptions {
    /// Ordered search over the whole page.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            ignore_ordering: false,
            content_starts_after: None,
            content_ends_before: None,
        }
    }

    /// Accepts expected values in any order.
    #[must_use]
    pub const fn ignore_ordering(mut self) -> Self {
        self.ignore_ordering = true;
        self
    }

    /// Starts the search after `marker`.
    #[must_use]
    pub fn starts_after(mut self, marker: impl Into<String>) -> Self {
        self.content_starts_after = Some(marker.into());
        self
    }

    /// Ends the search before `marker`.
    #[must_use]
    pub fn ends_before(mut self, marker: impl Into<String>) -> Self {
        self.content_ends_before = Some(marker.into());
        self
    }

    /// Narrows `content` to the configured window.
    ///
    /// # Errors
    /// Returns an error if a marker is missing, empty or out of order.
    pub fn window(&self, content: &str) -> AssertionResult<ContentWindow> {
        ContentWindow::narrow(
            content,
            self.content_starts_after.as_deref(),
            self.content_ends_before.as_deref(),
        )
    }
}

/// Everything `assert_response` can check. Unset fields are skipped; the
/// status defaults to `200`.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseExpectations {
    /// Expected status.
    pub status: Option<StatusExpectation>,
    /// Expected final url (literal, path or route name).
    pub url: Option<String>,
    /// Expected redirect target (literal, path or route name).
    pub redirect_url: Option<String>,
    /// Expected page title.
    pub title: Option<String>,
    /// Expected page header.
    pub header: Option<String>,
    /// Expected context messages.
    pub messages: Option<ExpectedContent>,
    /// Expected content.
    pub content: Option<ExpectedContent>,
    /// Content that must be absent.
    pub not_content: Option<ExpectedContent>,
    /// Elements with their expected counts.
    pub repeating: Vec<(String, usize)>,
    /// Expected JSON body.
    pub json: Option<serde_json::Value>,
    /// Window and ordering for content checks.
    pub content_options: ContentOptions,
}

impl Default for ResponseExpectations {
    fn default() -> Self {
        Self {
            status: Some(StatusExpectation::default()),
            url: None,
            redirect_url: None,
            title: None,
            header: None,
            messages: None,
            content: None,
            not_content: None,
            repeating: Vec::new(),
            json: None,
            content_options: ContentOptions::new(),
        }
    }
}

impl ResponseExpectations {
    /// Expects a `200` and nothing else.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the expected status.
    #[must_use]
    pub fn status(mut self, status: impl Into<StatusExpectation>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Skips the status check.
    #[must_use]
    pub fn any_status(mut self) -> Self {
        self.status = None;
        self
    }

    /// Sets the expected final url.
    #[must_use]
    pub fn url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Sets the expected redirect target.
    #[must_use]
    pub fn redirects_to(mut self, url: impl Into<String>) -> Self {
        self.redirect_url = Some(url.into());
        self
    }

    /// Sets the expected title.
    #[must_use]
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Sets the expected header.
    #[must_use]
    pub fn header(mut self, header: impl Into<String>) -> Self {
        self.header = Some(header.into());
        self
    }

    /// Sets the expected context messages.
    #[must_use]
    pub fn messages(mut self, messages: impl Into<ExpectedContent>) -> Self {
        self.messages = Some(messages.into());
        self
    }

    /// Sets the expected content.
    #[must_use]
    pub fn content(mut self, content: impl Into<ExpectedContent>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Sets content that must be absent.
    #[must_use]
    pub fn not_content(mut self, content: impl Into<ExpectedContent>) -> Self {
        self.not_content = Some(content.into());
        self
    }

    /// Expects `element` to repeat `count` times.
    #[must_use]
    pub fn repeating_element(mut self, element: impl Into<String>, count: usize) -> Self {
        self.repeating.push((element.into(), count));
        self
    }

    /// Sets the expected JSON body.
    #[must_use]
    pub fn json(mut self, json: serde_json::Value) -> Self {
        self.json = Some(json);
        self
    }

    /// Sets the window and ordering for content checks.
    #[must_use]
    pub fn content_options(mut self, options: ContentOptions) -> Self {
        self.content_options = options;
        self
    }
}

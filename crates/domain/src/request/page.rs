//! Page requests dispatched through a test client.

use serde::{Deserialize, Serialize};

use super::method::HttpMethod;

/// A single request for a page.
///
/// `url` is a path with an optional query string (`/search/?q=x`); the test
/// client decides how it reaches the application.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Request method.
    #[serde(default)]
    pub method: HttpMethod,
    /// Path and query.
    pub url: String,
    /// Form fields.
    #[serde(default)]
    pub data: Vec<(String, String)>,
    /// Extra request headers.
    #[serde(default)]
    pub headers: Vec<(String, String)>,
    /// Issue the request over HTTPS.
    #[serde(default)]
    pub secure: bool,
    /// Follow redirects and record the chain.
    #[serde(default = "default_follow")]
    pub follow: bool,
}

const fn default_follow() -> bool {
    true
}

impl PageRequest {
    /// Creates a request with the given method.
    #[must_use]
    pub fn new(method: HttpMethod, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            data: Vec::new(),
            headers: Vec::new(),
            secure: false,
            follow: default_follow(),
        }
    }

    /// Creates a GET request.
    #[must_use]
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Get, url)
    }

    /// Creates a POST request.
    #[must_use]
    pub fn post(url: impl Into<String>) -> Self {
        Self::new(HttpMethod::Post, url)
    }

    /// Adds a form field.
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.push((name.into(), value.into()));
        self
    }

    /// Adds a request header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets whether redirects are followed.
    #[must_use]
    pub const fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }

    /// Sets whether the request is issued over HTTPS.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// The path portion of `url`.
    #[must_use]
    pub fn path(&self) -> &str {
        self.url.split_once('?').map_or(self.url.as_str(), |(path, _)| path)
    }

    /// The query portion of `url`, without the `?`.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.url.split_once('?').map(|(_, query)| query)
    }
}

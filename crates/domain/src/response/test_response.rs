//! Response under test
//!
//! Contains the response type assertions operate on: status, headers,
//! rendered body, template context, and the redirect chain the client
//! followed to get there.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::message::Message;

/// HTTP status code with semantic helpers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// Creates a new `StatusCode`.
    #[must_use]
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Returns the numeric status code.
    #[must_use]
    pub const fn as_u16(&self) -> u16 {
        self.0
    }

    /// Returns true if this is a 2xx success status.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    /// Returns true if this is a 3xx redirection status.
    #[must_use]
    pub const fn is_redirection(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    /// Returns true if this is a 4xx client error status.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }

    /// Returns true if this is a 5xx server error status.
    #[must_use]
    pub const fn is_server_error(&self) -> bool {
        self.0 >= 500 && self.0 < 600
    }

    /// Returns the canonical reason phrase for common status codes.
    #[must_use]
    pub const fn reason_phrase(&self) -> &'static str {
        match self.0 {
            200 => "OK",
            201 => "Created",
            204 => "No Content",
            301 => "Moved Permanently",
            302 => "Found",
            303 => "See Other",
            304 => "Not Modified",
            307 => "Temporary Redirect",
            308 => "Permanent Redirect",
            400 => "Bad Request",
            401 => "Unauthorized",
            403 => "Forbidden",
            404 => "Not Found",
            405 => "Method Not Allowed",
            409 => "Conflict",
            422 => "Unprocessable Entity",
            500 => "Internal Server Error",
            502 => "Bad Gateway",
            503 => "Service Unavailable",
            _ => "Unknown",
        }
    }
}

impl std::fmt::Display for StatusCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.0, self.reason_phrase())
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        Self(code)
    }
}

/// One redirect followed by the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RedirectHop {
    /// Target of the redirect (the `Location` value).
    pub url: String,
    /// Status of the redirecting response.
    pub status: u16,
}

impl RedirectHop {
    /// Creates a redirect hop.
    #[must_use]
    pub fn new(url: impl Into<String>, status: u16) -> Self {
        Self {
            url: url.into(),
            status,
        }
    }
}

/// Template variables and flash messages a view rendered with.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResponseContext {
    /// Template variables.
    #[serde(default)]
    pub variables: BTreeMap<String, serde_json::Value>,
    /// Flash messages.
    #[serde(default)]
    pub messages: Vec<Message>,
}

impl ResponseContext {
    /// Creates an empty context.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
            messages: Vec::new(),
        }
    }

    /// Adds a template variable.
    #[must_use]
    pub fn with_variable(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.variables.insert(key.into(), value);
        self
    }

    /// Adds a flash message.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.messages.push(message);
        self
    }

    /// Looks up a template variable.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.variables.get(key)
    }

    /// Returns true if there are neither variables nor messages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.variables.is_empty() && self.messages.is_empty()
    }
}

/// A response returned by a test client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response headers.
    #[serde(default)]
    pub headers: BTreeMap<String, String>,
    /// Rendered body.
    pub body: String,
    /// Template context.
    #[serde(default)]
    pub context: ResponseContext,
    /// Path and query of the final request.
    #[serde(default)]
    pub url: String,
    /// `url` joined onto the site root.
    #[serde(default)]
    pub full_url: String,
    /// Redirects followed before arriving at this response.
    #[serde(default)]
    pub redirect_chain: Vec<RedirectHop>,
}

impl TestResponse {
    /// Creates a response with a status and body.
    #[must_use]
    pub fn new(status: impl Into<StatusCode>, body: impl Into<String>) -> Self {
        Self {
            status: status.into().as_u16(),
            headers: BTreeMap::new(),
            body: body.into(),
            context: ResponseContext::new(),
            url: String::new(),
            full_url: String::new(),
            redirect_chain: Vec::new(),
        }
    }

    /// Creates a response from raw bytes, replacing invalid UTF-8.
    #[must_use]
    pub fn from_bytes(
        status: impl Into<StatusCode>,
        headers: BTreeMap<String, String>,
        body: &[u8],
    ) -> Self {
        let mut response = Self::new(status, String::from_utf8_lossy(body));
        response.headers = headers;
        response
    }

    /// Creates an HTML response.
    #[must_use]
    pub fn html(status: impl Into<StatusCode>, body: impl Into<String>) -> Self {
        Self::new(status, body).with_header("Content-Type", "text/html; charset=utf-8")
    }

    /// Creates a redirect response.
    #[must_use]
    pub fn redirect(status: impl Into<StatusCode>, location: impl Into<String>) -> Self {
        Self::new(status, "").with_header("Location", location)
    }

    /// Adds a header.
    #[must_use]
    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    /// Replaces the context.
    #[must_use]
    pub fn with_context(mut self, context: ResponseContext) -> Self {
        self.context = context;
        self
    }

    /// Adds a flash message to the context.
    #[must_use]
    pub fn with_message(mut self, message: Message) -> Self {
        self.context.messages.push(message);
        self
    }

    /// Returns the status as a [`StatusCode`].
    #[must_use]
    pub const fn status_code(&self) -> StatusCode {
        StatusCode(self.status)
    }

    /// Looks up a header, ignoring case.
    #[must_use]
    pub fn get_header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// The `Location` header, if any.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.get_header("location")
    }

    /// The `Content-Type` header, if any.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.get_header("content-type")
    }

    /// Returns true if the client followed at least one redirect.
    #[must_use]
    #[allow(clippy::missing_const_for_fn)]
    pub fn was_redirected(&self) -> bool {
        !self.redirect_chain.is_empty()
    }

    /// Flash messages from the context.
    #[must_use]
    pub fn messages(&self) -> &[Message] {
        &self.context.messages
    }

    /// Parses the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns the parse error if the body is not valid JSON.
    pub fn json(&self) -> Result<serde_json::Value, serde_json::Error> {
        serde_json::from_str(&self.body)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code_categories() {
        assert!(StatusCode(200).is_success());
        assert!(StatusCode(302).is_redirection());
        assert!(StatusCode(404).is_client_error());
        assert!(StatusCode(500).is_server_error());
        assert!(!StatusCode(200).is_redirection());
    }

    #[test]
    fn test_status_code_display() {
        assert_eq!(StatusCode(200).to_string(), "200 OK");
        assert_eq!(StatusCode(404).to_string(), "404 Not Found");
        assert_eq!(StatusCode(299).to_string(), "299 Unknown");
    }

    #[test]
    fn test_get_header_ignores_case() {
        let response = TestResponse::html(200, "<p>x</p>");
        assert_eq!(response.content_type(), Some("text/html; charset=utf-8"));
        assert_eq!(response.get_header("CONTENT-TYPE"), response.content_type());
        assert_eq!(response.location(), None);
    }

    #[test]
    fn test_redirect_response() {
        let response = TestResponse::redirect(302, "/login/");
        assert_eq!(response.location(), Some("/login/"));
        assert!(response.status_code().is_redirection());
        assert!(!response.was_redirected());
    }

    #[test]
    fn test_from_bytes_is_lossy() {
        let response = TestResponse::from_bytes(200, BTreeMap::new(), b"ok \xff");
        assert_eq!(response.body, "ok \u{fffd}");
    }

    #[test]
    fn test_context_and_json() {
        let response = TestResponse::new(200, r#"{"ok": true}"#)
            .with_context(
                ResponseContext::new().with_variable("title", serde_json::json!("Home")),
            )
            .with_message(Message::success("Saved."));

        assert_eq!(response.context.get("title"), Some(&serde_json::json!("Home")));
        assert_eq!(response.messages().len(), 1);
        assert_eq!(response.json().unwrap(), serde_json::json!({"ok": true}));
    }
}

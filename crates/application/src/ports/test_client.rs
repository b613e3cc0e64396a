//! Test client port
//!
//! Defines the interface for dispatching page requests against the site
//! under test.

use expanse_domain::{PageRequest, TestResponse, TestUser};

/// Errors that can occur while fetching a page.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TestClientError {
    /// The request URL could not be parsed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// Could not reach the site under test.
    #[error("connection failed: {0}")]
    Connection(String),

    /// A redirect loop or an overly long redirect chain.
    #[error("too many redirects (limit {limit}) starting at {url}")]
    TooManyRedirects {
        /// Maximum number of hops followed.
        limit: usize,
        /// URL of the original request.
        url: String,
    },

    /// Inactive users cannot log in.
    #[error("user '{0}' is inactive and cannot log in")]
    InactiveUser(String),

    /// The site rejected the login.
    #[error("login failed for '{username}': {reason}")]
    LoginFailed {
        /// User that tried to log in.
        username: String,
        /// Why the login was rejected.
        reason: String,
    },

    /// Any other transport failure.
    #[error("{0}")]
    Other(String),
}

/// Port for fetching pages as a (possibly logged-in) user.
///
/// Clients keep a session between calls: a user logged in through
/// [`TestClient::force_login`] stays logged in until [`TestClient::logout`].
pub trait TestClient {
    /// Dispatches a request. When `request.follow` is set, redirects are
    /// followed and recorded in `TestResponse::redirect_chain`; the returned
    /// response's `url` is the path of the final request.
    ///
    /// # Errors
    /// Returns an error if the request could not be completed at all.
    /// Error statuses (4xx, 5xx) are ordinary responses.
    fn execute(&mut self, request: &PageRequest) -> Result<TestResponse, TestClientError>;

    /// Logs a user in for subsequent requests.
    ///
    /// # Errors
    /// Returns `TestClientError::InactiveUser` for inactive users, or
    /// `TestClientError::LoginFailed` if the site refused the credentials.
    fn force_login(&mut self, user: &TestUser) -> Result<(), TestClientError>;

    /// Ends the current session, if any.
    fn logout(&mut self);

    /// Username of the logged-in user.
    fn current_user(&self) -> Option<&str>;
}

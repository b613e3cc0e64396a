//! In-process test client.
//!
//! Routes requests to handler closures instead of a network server, which
//! keeps assertion tests fast and hermetic.

use std::collections::BTreeMap;
use std::fmt;

use expanse_application::ports::{TestClient, TestClientError};
use expanse_domain::{PageRequest, TestResponse, TestUser};

use super::redirects::{DEFAULT_MAX_REDIRECTS, follow_redirects};

/// A route handler: receives the request and the logged-in user.
pub type Handler = Box<dyn Fn(&PageRequest, Option<&TestUser>) -> TestResponse + Send + Sync>;

/// Test client that dispatches to an in-memory route table.
///
/// Routes are keyed by exact path (query strings are ignored when matching).
/// Unknown paths answer `404 Not Found`.
pub struct MemoryTestClient {
    routes: BTreeMap<String, Handler>,
    user: Option<TestUser>,
    max_redirects: usize,
}

impl MemoryTestClient {
    /// Creates a client without routes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
            user: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        }
    }

    /// Adds a route (builder pattern).
    #[must_use]
    pub fn route<F>(mut self, path: impl Into<String>, handler: F) -> Self
    where
        F: Fn(&PageRequest, Option<&TestUser>) -> TestResponse + Send + Sync + 'static,
    {
        self.add_route(path, handler);
        self
    }

    /// Adds or replaces a route.
    pub fn add_route<F>(&mut self, path: impl Into<String>, handler: F)
    where
        F: Fn(&PageRequest, Option<&TestUser>) -> TestResponse + Send + Sync + 'static,
    {
        self.routes.insert(path.into(), Box::new(handler));
    }

    /// Sets the redirect limit.
    #[must_use]
    pub const fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    /// The logged-in user.
    #[must_use]
    pub const fn user(&self) -> Option<&TestUser> {
        self.user.as_ref()
    }

    fn dispatch(&self, request: &PageRequest) -> TestResponse {
        self.routes.get(request.path()).map_or_else(
            || TestResponse::html(404, "<h1>Not Found</h1>"),
            |handler| handler(request, self.user.as_ref()),
        )
    }
}

impl Default for MemoryTestClient {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MemoryTestClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryTestClient")
            .field("routes", &self.routes.keys().collect::<Vec<_>>())
            .field("user", &self.current_user())
            .field("max_redirects", &self.max_redirects)
            .finish()
    }
}

impl TestClient for MemoryTestClient {
    fn execute(&mut self, request: &PageRequest) -> Result<TestResponse, TestClientError> {
        follow_redirects(request, self.max_redirects, |current| {
            Ok(self.dispatch(current))
        })
    }

    fn force_login(&mut self, user: &TestUser) -> Result<(), TestClientError> {
        if !user.is_active {
            return Err(TestClientError::InactiveUser(user.username.clone()));
        }
        self.user = Some(user.clone());
        Ok(())
    }

    fn logout(&mut self) {
        self.user = None;
    }

    fn current_user(&self) -> Option<&str> {
        self.user.as_ref().map(|user| user.username.as_str())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn client() -> MemoryTestClient {
        MemoryTestClient::new()
            .route("/", |_, user| {
                let name = user.map_or("guest", |u| u.username.as_str());
                TestResponse::html(200, format!("<p>Hi {name}</p>"))
            })
            .route("/admin/", |_, user| match user {
                Some(user) if user.is_staff => TestResponse::html(200, "<h1>Admin</h1>"),
                _ => TestResponse::redirect(302, "/login/?next=/admin/"),
            })
            .route("/login/", |request, _| {
                TestResponse::html(200, format!("<form data-next=\"{}\">", request.url))
            })
    }

    #[test]
    fn test_dispatch_with_session() {
        let mut client = client();
        let response = client.execute(&PageRequest::get("/")).unwrap();
        assert_eq!(response.body, "<p>Hi guest</p>");
        assert_eq!(response.url, "/");

        client.force_login(&TestUser::new("amy", "pw")).unwrap();
        assert_eq!(client.current_user(), Some("amy"));
        let response = client.execute(&PageRequest::get("/?x=1")).unwrap();
        assert_eq!(response.body, "<p>Hi amy</p>");

        client.logout();
        assert_eq!(client.current_user(), None);
    }

    #[test]
    fn test_redirects_are_followed() {
        let mut client = client();
        let response = client.execute(&PageRequest::get("/admin/")).unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.url, "/login/?next=/admin/");
        assert_eq!(response.redirect_chain.len(), 1);
        assert!(response.body.contains("/login/?next=/admin/"));

        let unfollowed = client
            .execute(&PageRequest::get("/admin/").with_follow(false))
            .unwrap();
        assert_eq!(unfollowed.status, 302);
        assert_eq!(unfollowed.location(), Some("/login/?next=/admin/"));
    }

    #[test]
    fn test_unknown_path_and_inactive_login() {
        let mut client = client();
        assert_eq!(client.execute(&PageRequest::get("/nope/")).unwrap().status, 404);

        let err = client
            .force_login(&TestUser::new("old", "pw").inactive())
            .unwrap_err();
        assert_eq!(err, TestClientError::InactiveUser("old".to_string()));
        assert!(client.user().is_none());
    }
}

//! Test client implementation using reqwest.
//!
//! Drives a running server over HTTP. Sessions live in the client's cookie
//! store; `force_login` submits the site's login form and `logout` starts a
//! fresh cookie store.

use std::collections::BTreeMap;
use std::time::Duration;

use expanse_application::ports::{TestClient, TestClientError};
use expanse_domain::{HttpMethod, PageRequest, StatusCode, TestResponse, TestUser};
use reqwest::Method;
use reqwest::blocking::Client;
use url::Url;

use super::redirects::{DEFAULT_MAX_REDIRECTS, follow_redirects};

/// Where and how to submit credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginForm {
    /// Path of the login view.
    pub path: String,
    /// Form field carrying the username.
    pub username_field: String,
    /// Form field carrying the password.
    pub password_field: String,
}

impl Default for LoginForm {
    fn default() -> Self {
        Self {
            path: "/accounts/login/".to_string(),
            username_field: "username".to_string(),
            password_field: "password".to_string(),
        }
    }
}

/// Test client backed by a blocking `reqwest` client.
///
/// Redirects are followed by hand so the chain can be recorded.
#[derive(Debug)]
pub struct ReqwestTestClient {
    client: Client,
    base_url: Url,
    login_form: LoginForm,
    timeout: Duration,
    user: Option<String>,
    max_redirects: usize,
}

impl ReqwestTestClient {
    /// Creates a client for the server at `base_url`.
    ///
    /// Default configuration:
    /// - Request timeout: 30 seconds
    /// - Follow redirects: up to 10, recorded
    /// - Cookie store: enabled
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid or the client cannot be created.
    pub fn new(base_url: &str) -> Result<Self, TestClientError> {
        let base_url = Url::parse(base_url)
            .map_err(|e| TestClientError::InvalidUrl(format!("{e}: {base_url}")))?;
        Ok(Self {
            client: Self::build_client()?,
            base_url,
            login_form: LoginForm::default(),
            timeout: Duration::from_secs(30),
            user: None,
            max_redirects: DEFAULT_MAX_REDIRECTS,
        })
    }

    /// Sets the login form used by `force_login`.
    #[must_use]
    pub fn with_login_form(mut self, login_form: LoginForm) -> Self {
        self.login_form = login_form;
        self
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub const fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Sets the redirect limit.
    #[must_use]
    pub const fn with_max_redirects(mut self, max_redirects: usize) -> Self {
        self.max_redirects = max_redirects;
        self
    }

    fn build_client() -> Result<Client, TestClientError> {
        Client::builder()
            .user_agent(concat!("expanse/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::none())
            .cookie_store(true)
            .build()
            .map_err(|e| TestClientError::Other(e.to_string()))
    }

    /// Converts domain `HttpMethod` to reqwest `Method`.
    const fn to_reqwest_method(method: HttpMethod) -> Method {
        match method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
            HttpMethod::Put => Method::PUT,
            HttpMethod::Patch => Method::PATCH,
            HttpMethod::Delete => Method::DELETE,
            HttpMethod::Head => Method::HEAD,
        }
    }

    /// Builds the absolute URL for a request, moving form data into the
    /// query string for methods that cannot carry a body.
    fn request_url(&self, request: &PageRequest) -> Result<Url, TestClientError> {
        let mut url = self
            .base_url
            .join(&request.url)
            .map_err(|e| TestClientError::InvalidUrl(format!("{e}: {}", request.url)))?;
        if request.secure && url.scheme() == "http" && url.set_scheme("https").is_err() {
            return Err(TestClientError::InvalidUrl(url.to_string()));
        }
        if request.method.sends_data_as_query() && !request.data.is_empty() {
            url.query_pairs_mut().extend_pairs(&request.data);
        }
        Ok(url)
    }

    fn send(&self, request: &PageRequest) -> Result<TestResponse, TestClientError> {
        let url = self.request_url(request)?;
        let mut builder = self
            .client
            .request(Self::to_reqwest_method(request.method), url)
            .timeout(self.timeout);

        for (name, value) in &request.headers {
            builder = builder.header(name, value);
        }

        if !request.method.sends_data_as_query() && !request.data.is_empty() {
            let body = serde_urlencoded::to_string(&request.data)
                .map_err(|e| TestClientError::Other(format!("invalid form data: {e}")))?;
            builder = builder
                .header("Content-Type", "application/x-www-form-urlencoded")
                .body(body);
        }

        let response = builder.send().map_err(Self::map_error)?;
        let status = response.status().as_u16();
        let headers: BTreeMap<String, String> = response
            .headers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_str().unwrap_or("<binary>").to_string()))
            .collect();
        let body = response
            .bytes()
            .map_err(|e| TestClientError::Other(format!("failed to read body: {e}")))?;

        Ok(TestResponse::from_bytes(status, headers, &body))
    }

    /// Maps reqwest errors to `TestClientError`.
    fn map_error(error: reqwest::Error) -> TestClientError {
        if error.is_timeout() || error.is_connect() {
            return TestClientError::Connection(error.to_string());
        }
        if error.is_builder() {
            return TestClientError::InvalidUrl(error.to_string());
        }
        TestClientError::Other(error.to_string())
    }
}

impl TestClient for ReqwestTestClient {
    fn execute(&mut self, request: &PageRequest) -> Result<TestResponse, TestClientError> {
        follow_redirects(request, self.max_redirects, |current| self.send(current))
    }

    fn force_login(&mut self, user: &TestUser) -> Result<(), TestClientError> {
        if !user.is_active {
            return Err(TestClientError::InactiveUser(user.username.clone()));
        }
        if self.user.as_deref() == Some(user.username.as_str()) {
            return Ok(());
        }
        self.logout();

        let form = &self.login_form;
        let request = PageRequest::post(form.path.clone())
            .with_field(form.username_field.clone(), user.username.clone())
            .with_field(form.password_field.clone(), user.password.clone())
            .with_follow(false);
        let response = self.send(&request)?;

        // Successful logins redirect; a re-rendered form means rejection.
        if !StatusCode::new(response.status).is_redirection() {
            return Err(TestClientError::LoginFailed {
                username: user.username.clone(),
                reason: format!("login form answered with status {}", response.status),
            });
        }
        tracing::debug!(target: "expanse::client", username = %user.username, "logged in");
        self.user = Some(user.username.clone());
        Ok(())
    }

    fn logout(&mut self) {
        if self.user.take().is_none() {
            return;
        }
        match Self::build_client() {
            Ok(client) => self.client = client,
            Err(err) => tracing::warn!(target: "expanse::client", %err, "could not reset session"),
        }
    }

    fn current_user(&self) -> Option<&str> {
        self.user.as_deref()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_reqwest_method() {
        assert_eq!(
            ReqwestTestClient::to_reqwest_method(HttpMethod::Get),
            Method::GET
        );
        assert_eq!(
            ReqwestTestClient::to_reqwest_method(HttpMethod::Post),
            Method::POST
        );
        assert_eq!(
            ReqwestTestClient::to_reqwest_method(HttpMethod::Head),
            Method::HEAD
        );
    }

    #[test]
    fn test_client_creation() {
        assert!(ReqwestTestClient::new("http://127.0.0.1:8000/").is_ok());
        assert!(matches!(
            ReqwestTestClient::new("not a url"),
            Err(TestClientError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_request_url() {
        let client = ReqwestTestClient::new("http://127.0.0.1:8000/").unwrap();

        let get = PageRequest::get("/search/?q=a").with_field("page", "2");
        assert_eq!(
            client.request_url(&get).unwrap().as_str(),
            "http://127.0.0.1:8000/search/?q=a&page=2"
        );

        let post = PageRequest::post("/save/").with_field("x", "1").with_secure(true);
        assert_eq!(
            client.request_url(&post).unwrap().as_str(),
            "https://127.0.0.1:8000/save/"
        );
    }

    #[test]
    fn test_inactive_user_is_refused_before_any_request() {
        let mut client = ReqwestTestClient::new("http://127.0.0.1:9/").unwrap();
        let err = client
            .force_login(&TestUser::new("gone", "pw").inactive())
            .unwrap_err();
        assert_eq!(err, TestClientError::InactiveUser("gone".to_string()));
        assert_eq!(client.current_user(), None);
    }
}

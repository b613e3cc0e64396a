//! Get page response use case.

use expanse_domain::{ClientSettings, HttpMethod, PageRequest, QueryParams, TestResponse, TestUser};

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{RouteArgs, RouteResolver, TestClient, UserRepository};

use super::resolve_url::{ResolveUrl, ResolveUrlInput, full_url};

/// Who the page is requested as.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum LoginAs {
    /// The configured default user when auto login is on, else anonymous.
    #[default]
    Default,
    /// Nobody; any existing session is ended.
    Anonymous,
    /// A specific fixture user.
    User(String),
}

/// Options for fetching a page.
#[derive(Debug, Clone)]
pub struct PageOptions {
    /// Request method.
    pub method: HttpMethod,
    /// Route arguments for named routes.
    pub args: RouteArgs,
    /// Query parameters.
    pub params: QueryParams,
    /// Form fields.
    pub data: Vec<(String, String)>,
    /// Extra request headers.
    pub headers: Vec<(String, String)>,
    /// User to request the page as.
    pub user: LoginAs,
    /// Overrides `ClientSettings::auto_login` for this request.
    pub auto_login: Option<bool>,
    /// Issue the request over HTTPS.
    pub secure: bool,
    /// Follow redirects.
    pub follow: bool,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            method: HttpMethod::Get,
            args: RouteArgs::new(),
            params: QueryParams::new(),
            data: Vec::new(),
            headers: Vec::new(),
            user: LoginAs::Default,
            auto_login: None,
            secure: false,
            follow: true,
        }
    }
}

impl PageOptions {
    /// Options for a GET request.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Options for a POST request.
    #[must_use]
    pub fn post() -> Self {
        Self {
            method: HttpMethod::Post,
            ..Self::default()
        }
    }

    /// Sets the route arguments.
    #[must_use]
    pub fn with_args(mut self, args: RouteArgs) -> Self {
        self.args = args;
        self
    }

    /// Adds a query parameter.
    #[must_use]
    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.add(key, value);
        self
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

    /// Requests the page as the given user.
    #[must_use]
    pub fn as_user(mut self, username: impl Into<String>) -> Self {
        self.user = LoginAs::User(username.into());
        self
    }

    /// Requests the page without logging in.
    #[must_use]
    pub fn anonymous(mut self) -> Self {
        self.user = LoginAs::Anonymous;
        self
    }

    /// Overrides the auto login setting.
    #[must_use]
    pub const fn with_auto_login(mut self, auto_login: bool) -> Self {
        self.auto_login = Some(auto_login);
        self
    }

    /// Sets whether to use HTTPS.
    #[must_use]
    pub const fn with_secure(mut self, secure: bool) -> Self {
        self.secure = secure;
        self
    }

    /// Sets whether to follow redirects.
    #[must_use]
    pub const fn with_follow(mut self, follow: bool) -> Self {
        self.follow = follow;
        self
    }
}

/// A fetched page and the user it was fetched as.
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Response with `url` and `full_url` filled.
    pub response: TestResponse,
    /// Logged-in user, if any.
    pub user: Option<TestUser>,
}

/// Use case for fetching a page through the test client.
pub struct GetPageResponse<'a, C, R, U>
where
    C: TestClient,
    R: RouteResolver,
    U: UserRepository,
{
    client: &'a mut C,
    resolver: &'a R,
    users: &'a U,
    settings: &'a ClientSettings,
}

impl<'a, C, R, U> GetPageResponse<'a, C, R, U>
where
    C: TestClient,
    R: RouteResolver,
    U: UserRepository,
{
    /// Creates a new `GetPageResponse` use case.
    #[must_use]
    pub const fn new(
        client: &'a mut C,
        resolver: &'a R,
        users: &'a U,
        settings: &'a ClientSettings,
    ) -> Self {
        Self {
            client,
            resolver,
            users,
            settings,
        }
    }

    /// Resolves `target`, logs in the requested user and fetches the page.
    ///
    /// # Errors
    /// - `ApplicationError::NotFound` if the requested user does not exist
    /// - URL resolution errors, see [`ResolveUrl::execute`]
    /// - `ApplicationError::Client` if login or the request fails
    pub fn execute(self, target: &str, options: &PageOptions) -> ApplicationResult<PageResponse> {
        let resolved = ResolveUrl::new(self.resolver, &self.settings.site_root_url).execute(
            &ResolveUrlInput::new(target)
                .with_args(options.args.clone())
                .with_params(options.params.clone()),
        )?;

        let user = self.select_user(options)?;
        match &user {
            Some(user) => {
                tracing::debug!(target: "expanse::client", username = %user.username, "logging in");
                self.client.force_login(user)?;
            }
            None => self.client.logout(),
        }

        let mut request = PageRequest::new(options.method, resolved.url.clone())
            .with_secure(options.secure)
            .with_follow(options.follow);
        request.data.clone_from(&options.data);
        request.headers.clone_from(&options.headers);

        let mut response = self.client.execute(&request)?;
        if response.url.is_empty() {
            response.url = resolved.url;
        }
        response.full_url = if response.url == request.url {
            resolved.full_url
        } else {
            full_url(&self.settings.site_root_url, &response.url)?
        };

        tracing::debug!(
            target: "expanse::client",
            method = %options.method,
            url = %response.url,
            status = response.status,
            redirects = response.redirect_chain.len(),
            "fetched page"
        );
        Ok(PageResponse { response, user })
    }

    fn select_user(&self, options: &PageOptions) -> ApplicationResult<Option<TestUser>> {
        let username = match &options.user {
            LoginAs::Anonymous => return Ok(None),
            LoginAs::User(username) => username.as_str(),
            LoginAs::Default => {
                if !options.auto_login.unwrap_or(self.settings.auto_login) {
                    return Ok(None);
                }
                self.settings.default_login_user.as_str()
            }
        };
        self.users
            .get_user(username)
            .map(Some)
            .ok_or_else(|| ApplicationError::NotFound(format!("user '{username}'")))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use expanse_domain::{Group, RedirectHop};

    use super::*;
    use crate::ports::{RouteError, TestClientError};
    use pretty_assertions::assert_eq;

    #[derive(Default)]
    struct RecordingClient {
        logged_in: Option<String>,
        requests: Vec<PageRequest>,
    }

    impl TestClient for RecordingClient {
        fn execute(&mut self, request: &PageRequest) -> Result<TestResponse, TestClientError> {
            self.requests.push(request.clone());
            if request.path() == "/old/" && request.follow {
                let mut response = TestResponse::html(200, "<h1>New</h1>");
                response.url = "/new/".to_string();
                response.redirect_chain = vec![RedirectHop::new("/new/", 302)];
                return Ok(response);
            }
            let who = self.logged_in.clone().unwrap_or_else(|| "anonymous".to_string());
            Ok(TestResponse::html(200, format!("<p>{who}</p>")))
        }

        fn force_login(&mut self, user: &TestUser) -> Result<(), TestClientError> {
            if !user.is_active {
                return Err(TestClientError::InactiveUser(user.username.clone()));
            }
            self.logged_in = Some(user.username.clone());
            Ok(())
        }

        fn logout(&mut self) {
            self.logged_in = None;
        }

        fn current_user(&self) -> Option<&str> {
            self.logged_in.as_deref()
        }
    }

    struct NoRoutes;

    impl RouteResolver for NoRoutes {
        fn reverse(&self, name: &str, _args: &RouteArgs) -> Result<String, RouteError> {
            Err(RouteError::NoMatch(name.to_string()))
        }
    }

    #[derive(Default)]
    struct Users(BTreeMap<String, TestUser>);

    impl UserRepository for Users {
        fn get_user(&self, username: &str) -> Option<TestUser> {
            self.0.get(username).cloned()
        }

        fn save_user(&mut self, user: TestUser) {
            self.0.insert(user.username.clone(), user);
        }

        fn get_group(&self, _name: &str) -> Option<Group> {
            None
        }

        fn save_group(&mut self, _group: Group) {}

        fn groups(&self) -> Vec<Group> {
            Vec::new()
        }
    }

    fn users() -> Users {
        let mut users = Users::default();
        users.save_user(TestUser::new("test_user", "password"));
        users.save_user(TestUser::new("test_inactive", "password").inactive());
        users
    }

    fn fetch(
        client: &mut RecordingClient,
        target: &str,
        options: &PageOptions,
    ) -> ApplicationResult<PageResponse> {
        let users = users();
        let settings = ClientSettings::default();
        GetPageResponse::new(client, &NoRoutes, &users, &settings).execute(target, options)
    }

    #[test]
    fn test_auto_login_uses_default_user() {
        let mut client = RecordingClient::default();
        let page = fetch(&mut client, "dashboard/", &PageOptions::new()).unwrap();

        assert_eq!(page.response.body, "<p>test_user</p>");
        assert_eq!(page.response.url, "/dashboard/");
        assert_eq!(page.response.full_url, "http://127.0.0.1/dashboard/");
        assert_eq!(page.user.unwrap().username, "test_user");
    }

    #[test]
    fn test_anonymous_and_disabled_auto_login() {
        let mut client = RecordingClient {
            logged_in: Some("someone".to_string()),
            ..RecordingClient::default()
        };
        let page = fetch(&mut client, "/", &PageOptions::new().anonymous()).unwrap();
        assert_eq!(page.response.body, "<p>anonymous</p>");
        assert!(page.user.is_none());

        let page = fetch(&mut client, "/", &PageOptions::new().with_auto_login(false)).unwrap();
        assert!(page.user.is_none());
    }

    #[test]
    fn test_unknown_and_inactive_users() {
        let mut client = RecordingClient::default();
        let err = fetch(&mut client, "/", &PageOptions::new().as_user("nobody")).unwrap_err();
        assert!(matches!(err, ApplicationError::NotFound(_)));

        let err = fetch(&mut client, "/", &PageOptions::new().as_user("test_inactive")).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Client(TestClientError::InactiveUser(_))
        ));
        assert!(client.requests.is_empty());
    }

    #[test]
    fn test_request_is_built_from_options() {
        let mut client = RecordingClient::default();
        let options = PageOptions::post()
            .with_param("next", "/home/")
            .with_field("title", "Hello")
            .with_header("X-Requested-With", "XMLHttpRequest")
            .with_secure(true);
        fetch(&mut client, "/posts/new/", &options).unwrap();

        let request = &client.requests[0];
        assert_eq!(request.method, HttpMethod::Post);
        assert_eq!(request.url, "/posts/new/?next=%2Fhome%2F");
        assert_eq!(request.data, vec![("title".to_string(), "Hello".to_string())]);
        assert!(request.secure);
    }

    #[test]
    fn test_redirected_response_keeps_final_url() {
        let mut client = RecordingClient::default();
        let page = fetch(&mut client, "/old/", &PageOptions::new()).unwrap();
        assert_eq!(page.response.url, "/new/");
        assert_eq!(page.response.full_url, "http://127.0.0.1/new/");
    }
}

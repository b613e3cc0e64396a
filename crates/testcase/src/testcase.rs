//! The integration test case.

use expanse_application::assertions;
use expanse_application::ports::{
    HtmlInspector, RouteArgs, RouteResolver, TestClient, UserRepository,
};
use expanse_application::use_cases::{
    ElementLocator, GetPageResponse, PageOptions, ResolveUrl, ResolveUrlInput, ResolvedUrl,
    UserFixtures,
};
use expanse_application::{ApplicationError, ApplicationResult};
use expanse_domain::content::{self, MatchOptions};
use expanse_domain::{
    AssertionResult, ExpectedContent, Group, Settings, StatusExpectation, TestResponse, TestUser,
};
use expanse_infrastructure::{
    DebugReporter, MemoryTestClient, MemoryUserRepository, ScraperInspector, StaticRouteResolver,
};

use crate::options::{ContentOptions, ResponseExpectations};

/// Fetches pages and asserts on them.
///
/// Owns the test client, the route table, fixture users and the settings.
/// The default fixtures (`test_superuser`, `test_admin`, `test_inactive`,
/// `test_user`) exist from construction on.
///
/// ```
/// use expanse::prelude::*;
///
/// let client = MemoryTestClient::new().route("/", |_, _| {
///     TestResponse::html(200, "<title>Home</title><h1>Welcome</h1><p>Hello</p>")
/// });
/// let mut test = IntegrationTestCase::new(client);
///
/// test.assert_response(
///     "/",
///     &PageOptions::new(),
///     &ResponseExpectations::new().title("Home").header("Welcome").content("Hello"),
/// )
/// .unwrap();
/// ```
pub struct IntegrationTestCase<
    C,
    R = StaticRouteResolver,
    U = MemoryUserRepository,
    I = ScraperInspector,
> where
    C: TestClient,
    R: RouteResolver,
    U: UserRepository,
    I: HtmlInspector,
{
    client: C,
    routes: R,
    users: UserFixtures<U>,
    locator: ElementLocator<I>,
    settings: Settings,
}

/// Test case running against an in-process route table.
pub type MemoryTestCase = IntegrationTestCase<MemoryTestClient>;

impl<C: TestClient> IntegrationTestCase<C> {
    /// Creates a test case with default settings, no named routes and the
    /// default fixture users.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self::with_settings(client, Settings::default())
    }

    /// Creates a test case with the given settings.
    #[must_use]
    pub fn with_settings(client: C, settings: Settings) -> Self {
        Self::from_parts(
            client,
            StaticRouteResolver::new(),
            MemoryUserRepository::new(),
            ScraperInspector::new(),
            settings,
        )
    }
}

impl<C, R, U, I> IntegrationTestCase<C, R, U, I>
where
    C: TestClient,
    R: RouteResolver,
    U: UserRepository,
    I: HtmlInspector,
{
    /// Assembles a test case from its parts and seeds the fixture users.
    #[must_use]
    pub fn from_parts(client: C, routes: R, users: U, inspector: I, settings: Settings) -> Self {
        let users = UserFixtures::seeded(users, &settings.client.default_user_password);
        Self {
            client,
            routes,
            users,
            locator: ElementLocator::new(inspector),
            settings,
        }
    }

    /// Replaces the route resolver.
    #[must_use]
    pub fn with_routes<R2: RouteResolver>(self, routes: R2) -> IntegrationTestCase<C, R2, U, I> {
        IntegrationTestCase {
            client: self.client,
            routes,
            users: self.users,
            locator: self.locator,
            settings: self.settings,
        }
    }

    /// Current settings.
    #[must_use]
    pub const fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Mutable settings.
    pub fn settings_mut(&mut self) -> &mut Settings {
        &mut self.settings
    }

    /// The test client.
    #[must_use]
    pub const fn client(&self) -> &C {
        &self.client
    }

    /// The test client, mutably.
    pub fn client_mut(&mut self) -> &mut C {
        &mut self.client
    }

    /// The route resolver.
    #[must_use]
    pub const fn routes(&self) -> &R {
        &self.routes
    }

    /// The fixture users.
    #[must_use]
    pub const fn users(&self) -> &UserFixtures<U> {
        &self.users
    }

    /// The fixture users, mutably.
    pub fn users_mut(&mut self) -> &mut UserFixtures<U> {
        &mut self.users
    }

    /// The element locator.
    #[must_use]
    pub const fn locator(&self) -> &ElementLocator<I> {
        &self.locator
    }

    // Users

    /// Looks up a fixture user.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` for unknown users.
    pub fn get_user(&self, username: &str) -> ApplicationResult<TestUser> {
        self.users.get_user(username)
    }

    /// Grants a permission to a user.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` for unknown users.
    pub fn add_user_permission(
        &mut self,
        permission: &str,
        username: &str,
    ) -> ApplicationResult<TestUser> {
        self.users.add_user_permission(permission, username)
    }

    /// Adds a user to an existing group.
    ///
    /// # Errors
    /// Returns `ApplicationError::NotFound` for unknown users or groups.
    pub fn add_user_group(&mut self, group: &str, username: &str) -> ApplicationResult<TestUser> {
        self.users.add_user_group(group, username)
    }

    /// Creates a permission group.
    pub fn create_group<P, S>(&mut self, name: &str, permissions: P) -> Group
    where
        P: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.users.create_group(name, permissions)
    }

    // Fetching

    /// Resolves a literal url, path or route name.
    ///
    /// # Errors
    /// See [`ResolveUrl::execute`].
    pub fn resolve_url(&self, target: &str, args: RouteArgs) -> ApplicationResult<ResolvedUrl> {
        ResolveUrl::new(&self.routes, &self.settings.client.site_root_url)
            .execute(&ResolveUrlInput::new(target).with_args(args))
    }

    /// Fetches a page, logging in as `options.user` (or the default user),
    /// and reports it when debug printing is on.
    ///
    /// # Errors
    /// URL resolution, unknown user and client errors.
    pub fn get_page_response(
        &mut self,
        url: &str,
        options: &PageOptions,
    ) -> ApplicationResult<TestResponse> {
        let page = GetPageResponse::new(
            &mut self.client,
            &self.routes,
            self.users.repository(),
            &self.settings.client,
        )
        .execute(url, options)?;

        DebugReporter::new(&self.settings.debug).report(&page.response, page.user.as_ref());
        Ok(page.response)
    }

    /// Fetches a page and checks every populated expectation, in the order
    /// status, url, redirect, title, header, messages, content, absent
    /// content, repeating elements and JSON. Returns the response.
    ///
    /// # Errors
    /// The first failing expectation, or any fetch error.
    pub fn assert_response(
        &mut self,
        url: &str,
        options: &PageOptions,
        expected: &ResponseExpectations,
    ) -> ApplicationResult<TestResponse> {
        let response = self.get_page_response(url, options)?;

        if let Some(status) = &expected.status {
            self.assert_status_code(&response, status.clone())?;
        }
        if let Some(url) = &expected.url {
            let resolved = self.resolve_url(url, RouteArgs::new())?;
            assertions::assert_response_url(&response, &resolved.url)?;
        }
        if let Some(redirect) = &expected.redirect_url {
            self.assert_redirects(&response, redirect)?;
        }
        if let Some(title) = &expected.title {
            self.assert_page_title(&response, title, None)?;
        }
        if let Some(header) = &expected.header {
            self.assert_page_header(&response, header)?;
        }
        if let Some(messages) = &expected.messages {
            self.assert_context_messages(&response, messages.clone(), None)?;
        }
        let options = &expected.content_options;
        if let Some(content) = &expected.content {
            self.assert_page_content(&response, content.clone(), options)?;
        }
        if let Some(content) = &expected.not_content {
            self.assert_not_page_content(&response, content.clone(), options)?;
        }
        for (element, count) in &expected.repeating {
            self.assert_repeating_element(&response, element, *count, options)?;
        }
        if let Some(json) = &expected.json {
            self.assert_json_response(&response, json)?;
        }
        Ok(response)
    }

    // Assertions

    /// Asserts the response status.
    ///
    /// # Errors
    /// `AssertionError::StatusMismatch` on mismatch.
    pub fn assert_status_code(
        &self,
        response: &TestResponse,
        expected: impl Into<StatusExpectation>,
    ) -> AssertionResult {
        assertions::assert_status_code(response, &expected.into())
    }

    /// Asserts the response redirected to `expected_url`, which may be a
    /// route name.
    ///
    /// # Errors
    /// `AssertionError::RedirectMismatch` on mismatch, or URL resolution
    /// errors.
    pub fn assert_redirects(
        &self,
        response: &TestResponse,
        expected_url: &str,
    ) -> ApplicationResult<()> {
        let expected = self.resolve_url(expected_url, RouteArgs::new())?;
        assertions::assert_redirects(response, &expected.url).map_err(ApplicationError::from)
    }

    /// Asserts the page title. `allow_partials` defaults to
    /// `assertions.allow_title_partials`.
    ///
    /// # Errors
    /// `AssertionError::TitleMismatch` on mismatch.
    pub fn assert_page_title(
        &self,
        response: &TestResponse,
        expected: &str,
        allow_partials: Option<bool>,
    ) -> AssertionResult {
        let allow_partials =
            allow_partials.unwrap_or(self.settings.assertions.allow_title_partials);
        let title = self.locator.page_title(&response.body)?;
        assertions::assert_page_title(title.as_deref(), expected, allow_partials)
    }

    /// Asserts the page header.
    ///
    /// # Errors
    /// `AssertionError::HeaderMismatch` on mismatch.
    pub fn assert_page_header(&self, response: &TestResponse, expected: &str) -> AssertionResult {
        let header = self.locator.page_header(&response.body)?;
        assertions::assert_page_header(header.as_deref(), expected)
    }

    /// Asserts context messages are present. `allow_partials` defaults to
    /// `assertions.allow_message_partials`.
    ///
    /// # Errors
    /// `AssertionError::MessageNotFound` for the first missing message.
    pub fn assert_context_messages(
        &self,
        response: &TestResponse,
        expected: impl Into<ExpectedContent>,
        allow_partials: Option<bool>,
    ) -> AssertionResult {
        let allow_partials =
            allow_partials.unwrap_or(self.settings.assertions.allow_message_partials);
        assertions::assert_context_messages(response.messages(), &expected.into(), allow_partials)
    }

    /// Asserts context messages are absent.
    ///
    /// # Errors
    /// `AssertionError::UnexpectedMessage` for the first message present.
    pub fn assert_not_context_messages(
        &self,
        response: &TestResponse,
        unexpected: impl Into<ExpectedContent>,
        allow_partials: Option<bool>,
    ) -> AssertionResult {
        let allow_partials =
            allow_partials.unwrap_or(self.settings.assertions.allow_message_partials);
        assertions::assert_not_context_messages(
            response.messages(),
            &unexpected.into(),
            allow_partials,
        )
    }

    /// Asserts the expected values appear in the page, in order unless
    /// `options.ignore_ordering` is set.
    ///
    /// # Errors
    /// Marker, not-found, ordering and case-mismatch failures.
    pub fn assert_page_content(
        &self,
        response: &TestResponse,
        expected: impl Into<ExpectedContent>,
        options: &ContentOptions,
    ) -> AssertionResult {
        let window = options.window(&response.body)?;
        content::assert_content(&window, &expected.into(), self.match_options(options))
    }

    /// Asserts none of the values appear in the page.
    ///
    /// # Errors
    /// `AssertionError::UnexpectedContent` for the first value present.
    pub fn assert_not_page_content(
        &self,
        response: &TestResponse,
        unexpected: impl Into<ExpectedContent>,
        options: &ContentOptions,
    ) -> AssertionResult {
        let window = options.window(&response.body)?;
        content::assert_not_content(&window, &unexpected.into(), self.match_options(options))
    }

    /// Asserts `element` opens (and closes) exactly `count` times.
    ///
    /// # Errors
    /// Count, balance and marker failures.
    pub fn assert_repeating_element(
        &self,
        response: &TestResponse,
        element: &str,
        count: usize,
        options: &ContentOptions,
    ) -> AssertionResult {
        let window = options.window(&response.body)?;
        content::assert_repeating_element(&window, element, count)
    }

    /// Asserts the body is JSON equal to `expected`.
    ///
    /// # Errors
    /// `AssertionError::JsonMismatch` on mismatch.
    pub fn assert_json_response(
        &self,
        response: &TestResponse,
        expected: &serde_json::Value,
    ) -> AssertionResult {
        assertions::assert_json(response, expected)
    }

    fn match_options(&self, options: &ContentOptions) -> MatchOptions {
        MatchOptions::from_settings(&self.settings.assertions)
            .with_ignore_ordering(options.ignore_ordering)
    }

    // Accessors

    /// Normalized page title.
    #[must_use]
    pub fn get_page_title(&self, response: &TestResponse) -> Option<String> {
        self.locator.page_title(&response.body).ok().flatten()
    }

    /// Normalized page header.
    #[must_use]
    pub fn get_page_header(&self, response: &TestResponse) -> Option<String> {
        self.locator.page_header(&response.body).ok().flatten()
    }

    /// Texts of the response's context messages.
    #[must_use]
    pub fn get_context_messages(&self, response: &TestResponse) -> Vec<String> {
        response
            .messages()
            .iter()
            .map(|message| message.text.clone())
            .collect()
    }

    /// The page content as the matchers see it.
    #[must_use]
    pub fn get_minimized_content(&self, response: &TestResponse) -> String {
        content::normalize(&response.body)
    }

    // Element locators

    /// See [`ElementLocator::find_elements_by_tag`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_tag(
        &self,
        response: &TestResponse,
        tag: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_tag(&response.body, tag)
    }

    /// See [`ElementLocator::find_element_by_tag`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_tag(&self, response: &TestResponse, tag: &str) -> AssertionResult<String> {
        self.locator.find_element_by_tag(&response.body, tag)
    }

    /// See [`ElementLocator::find_elements_by_id`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_id(
        &self,
        response: &TestResponse,
        id: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_id(&response.body, id)
    }

    /// See [`ElementLocator::find_element_by_id`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_id(&self, response: &TestResponse, id: &str) -> AssertionResult<String> {
        self.locator.find_element_by_id(&response.body, id)
    }

    /// See [`ElementLocator::find_elements_by_class`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_class(
        &self,
        response: &TestResponse,
        class: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_class(&response.body, class)
    }

    /// See [`ElementLocator::find_element_by_class`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_class(
        &self,
        response: &TestResponse,
        class: &str,
    ) -> AssertionResult<String> {
        self.locator.find_element_by_class(&response.body, class)
    }

    /// See [`ElementLocator::find_elements_by_css_selector`].
    ///
    /// # Errors
    /// `ElementNotFound`, or `Configuration` for a bad selector.
    pub fn find_elements_by_css_selector(
        &self,
        response: &TestResponse,
        selector: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator
            .find_elements_by_css_selector(&response.body, selector)
    }

    /// See [`ElementLocator::find_element_by_css_selector`].
    ///
    /// # Errors
    /// `ElementNotFound`, `Ambiguous`, or `Configuration`.
    pub fn find_element_by_css_selector(
        &self,
        response: &TestResponse,
        selector: &str,
    ) -> AssertionResult<String> {
        self.locator
            .find_element_by_css_selector(&response.body, selector)
    }

    /// See [`ElementLocator::find_elements_by_data_attribute`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_data_attribute(
        &self,
        response: &TestResponse,
        name: &str,
        value: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator
            .find_elements_by_data_attribute(&response.body, name, value)
    }

    /// See [`ElementLocator::find_element_by_data_attribute`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_data_attribute(
        &self,
        response: &TestResponse,
        name: &str,
        value: &str,
    ) -> AssertionResult<String> {
        self.locator
            .find_element_by_data_attribute(&response.body, name, value)
    }

    /// See [`ElementLocator::find_elements_by_name`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_name(
        &self,
        response: &TestResponse,
        name: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_name(&response.body, name)
    }

    /// See [`ElementLocator::find_element_by_name`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_name(
        &self,
        response: &TestResponse,
        name: &str,
    ) -> AssertionResult<String> {
        self.locator.find_element_by_name(&response.body, name)
    }

    /// See [`ElementLocator::find_elements_by_link_text`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_link_text(
        &self,
        response: &TestResponse,
        text: &str,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_link_text(&response.body, text)
    }

    /// See [`ElementLocator::find_element_by_link_text`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_link_text(
        &self,
        response: &TestResponse,
        text: &str,
    ) -> AssertionResult<String> {
        self.locator.find_element_by_link_text(&response.body, text)
    }

    /// See [`ElementLocator::find_elements_by_text`].
    ///
    /// # Errors
    /// `ElementNotFound` when nothing matches.
    pub fn find_elements_by_text(
        &self,
        response: &TestResponse,
        text: &str,
        tag: Option<&str>,
    ) -> AssertionResult<Vec<String>> {
        self.locator.find_elements_by_text(&response.body, text, tag)
    }

    /// See [`ElementLocator::find_element_by_text`].
    ///
    /// # Errors
    /// `ElementNotFound` or `Ambiguous`.
    pub fn find_element_by_text(
        &self,
        response: &TestResponse,
        text: &str,
        tag: Option<&str>,
    ) -> AssertionResult<String> {
        self.locator.find_element_by_text(&response.body, text, tag)
    }
}

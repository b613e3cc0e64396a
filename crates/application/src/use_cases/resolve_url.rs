//! Resolve URL use case.
//!
//! Accepts a literal absolute URL, a site path or a route name and produces
//! the site-relative URL requests are made with, plus its absolute form.

use expanse_domain::QueryParams;
use url::Url;

use crate::error::{ApplicationError, ApplicationResult};
use crate::ports::{RouteArgs, RouteError, RouteResolver};

/// Input for resolving a URL.
#[derive(Debug, Clone, Default)]
pub struct ResolveUrlInput {
    /// Literal URL, path or route name.
    pub target: String,
    /// Route arguments, only valid for route names.
    pub args: RouteArgs,
    /// Query parameters appended to the result.
    pub params: QueryParams,
}

impl ResolveUrlInput {
    /// Creates an input without arguments or parameters.
    #[must_use]
    pub fn new(target: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            ..Self::default()
        }
    }

    /// Sets the route arguments.
    #[must_use]
    pub fn with_args(mut self, args: RouteArgs) -> Self {
        self.args = args;
        self
    }

    /// Sets the query parameters.
    #[must_use]
    pub fn with_params(mut self, params: QueryParams) -> Self {
        self.params = params;
        self
    }
}

/// A URL ready to be requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedUrl {
    /// Site-relative path, with query string.
    pub url: String,
    /// `url` joined onto the site root.
    pub full_url: String,
}

/// Use case for turning user-supplied URLs into request paths.
pub struct ResolveUrl<'a, R: RouteResolver> {
    resolver: &'a R,
    site_root: &'a str,
}

impl<'a, R: RouteResolver> ResolveUrl<'a, R> {
    /// Creates a new `ResolveUrl` use case.
    #[must_use]
    pub const fn new(resolver: &'a R, site_root: &'a str) -> Self {
        Self {
            resolver,
            site_root,
        }
    }

    /// Resolves the input.
    ///
    /// Names that the resolver does not know are treated as paths relative
    /// to the site root, unless route arguments were given.
    ///
    /// # Errors
    /// - `ApplicationError::Configuration` if both positional and named
    ///   arguments are supplied, if arguments accompany a literal URL, or if
    ///   the URL or site root cannot be parsed
    /// - `ApplicationError::Route` if the route exists but cannot be reversed
    pub fn execute(&self, input: &ResolveUrlInput) -> ApplicationResult<ResolvedUrl> {
        if input.args.is_conflicting() {
            return Err(ApplicationError::Configuration(format!(
                "route '{}' was given both positional and named arguments",
                input.target
            )));
        }

        let target = input.target.trim();
        let path = self.resolve_path(target, &input.args)?;
        let url = append_query(&path, &input.params)?;
        let full_url = full_url(self.site_root, &url)?;

        tracing::debug!(target: "expanse::url", input = target, %url, "resolved url");
        Ok(ResolvedUrl { url, full_url })
    }

    fn resolve_path(&self, target: &str, args: &RouteArgs) -> ApplicationResult<String> {
        if is_absolute(target) {
            reject_args(target, args)?;
            return site_relative(target);
        }
        if target.is_empty() || target.starts_with('/') {
            reject_args(target, args)?;
            return Ok(if target.is_empty() {
                "/".to_string()
            } else {
                target.to_string()
            });
        }

        match self.resolver.reverse(target, args) {
            Ok(path) => Ok(path),
            Err(RouteError::NoMatch(_)) if args.is_empty() => Ok(format!("/{target}")),
            Err(err) => Err(err.into()),
        }
    }
}

/// Reduces an absolute URL to its path and query. Paths pass through.
///
/// # Errors
/// Returns `ApplicationError::Configuration` if an absolute URL is malformed.
pub fn site_relative(url: &str) -> ApplicationResult<String> {
    if !is_absolute(url) {
        return Ok(url.to_string());
    }
    let parsed = Url::parse(url)
        .map_err(|e| ApplicationError::Configuration(format!("invalid url '{url}': {e}")))?;
    let mut path = parsed.path().to_string();
    if let Some(query) = parsed.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

/// Joins a site-relative URL onto the site root.
///
/// # Errors
/// Returns `ApplicationError::Configuration` if either part cannot be parsed.
pub fn full_url(site_root: &str, url: &str) -> ApplicationResult<String> {
    let root = Url::parse(site_root).map_err(|e| {
        ApplicationError::Configuration(format!("invalid site root url '{site_root}': {e}"))
    })?;
    let joined = root
        .join(url)
        .map_err(|e| ApplicationError::Configuration(format!("invalid url '{url}': {e}")))?;
    Ok(joined.to_string())
}

fn is_absolute(url: &str) -> bool {
    let lower = url.get(..8).unwrap_or(url).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

fn reject_args(target: &str, args: &RouteArgs) -> ApplicationResult<()> {
    if args.is_empty() {
        Ok(())
    } else {
        Err(ApplicationError::Configuration(format!(
            "route arguments cannot be used with the literal url '{target}'"
        )))
    }
}

fn append_query(path: &str, params: &QueryParams) -> ApplicationResult<String> {
    if params.is_empty() {
        return Ok(path.to_string());
    }
    let encoded = serde_urlencoded::to_string(params.pairs())
        .map_err(|e| ApplicationError::Configuration(format!("invalid query parameters: {e}")))?;

    let (base, fragment) = match path.split_once('#') {
        Some((base, fragment)) => (base, Some(fragment)),
        None => (path, None),
    };
    let separator = match base.find('?') {
        None => "?",
        Some(_) if base.ends_with('?') || base.ends_with('&') => "",
        Some(_) => "&",
    };

    let mut url = format!("{base}{separator}{encoded}");
    if let Some(fragment) = fragment {
        url.push('#');
        url.push_str(fragment);
    }
    Ok(url)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use pretty_assertions::assert_eq;

    struct Routes(BTreeMap<&'static str, &'static str>);

    impl RouteResolver for Routes {
        fn reverse(&self, name: &str, args: &RouteArgs) -> Result<String, RouteError> {
            let pattern = self
                .0
                .get(name)
                .ok_or_else(|| RouteError::NoMatch(name.to_string()))?;
            match (pattern.contains("{pk}"), args.args.first().or(args.kwargs.get("pk"))) {
                (true, Some(pk)) => Ok(pattern.replace("{pk}", pk)),
                (false, None) => Ok((*pattern).to_string()),
                _ => Err(RouteError::ArgumentMismatch {
                    name: name.to_string(),
                    reason: "wrong arguments".to_string(),
                }),
            }
        }
    }

    fn routes() -> Routes {
        Routes(BTreeMap::from([
            ("home", "/"),
            ("report-detail", "/reports/{pk}/"),
        ]))
    }

    fn resolve(input: ResolveUrlInput) -> ApplicationResult<ResolvedUrl> {
        let routes = routes();
        ResolveUrl::new(&routes, "http://127.0.0.1/").execute(&input)
    }

    #[test]
    fn test_absolute_url_reduced_to_path() {
        let resolved = resolve(ResolveUrlInput::new("https://example.com/a/b/?x=1")).unwrap();
        assert_eq!(resolved.url, "/a/b/?x=1");
        assert_eq!(resolved.full_url, "http://127.0.0.1/a/b/?x=1");
    }

    #[test]
    fn test_paths_pass_through() {
        assert_eq!(resolve(ResolveUrlInput::new("/login/")).unwrap().url, "/login/");
        assert_eq!(resolve(ResolveUrlInput::new("")).unwrap().url, "/");
    }

    #[test]
    fn test_named_routes() {
        assert_eq!(resolve(ResolveUrlInput::new("home")).unwrap().url, "/");

        let positional = ResolveUrlInput::new("report-detail").with_args(RouteArgs::new().arg(7));
        assert_eq!(resolve(positional).unwrap().url, "/reports/7/");

        let named =
            ResolveUrlInput::new("report-detail").with_args(RouteArgs::new().kwarg("pk", 8));
        assert_eq!(resolve(named).unwrap().url, "/reports/8/");
    }

    #[test]
    fn test_unknown_name_becomes_path() {
        let resolved = resolve(ResolveUrlInput::new("accounts/profile/")).unwrap();
        assert_eq!(resolved.url, "/accounts/profile/");
        assert_eq!(resolved.full_url, "http://127.0.0.1/accounts/profile/");
    }

    #[test]
    fn test_args_and_kwargs_conflict() {
        let input = ResolveUrlInput::new("report-detail")
            .with_args(RouteArgs::new().arg(1).kwarg("pk", 1));
        assert!(matches!(
            resolve(input).unwrap_err(),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn test_args_with_literal_url_rejected() {
        let input = ResolveUrlInput::new("/reports/").with_args(RouteArgs::new().arg(1));
        assert!(matches!(
            resolve(input).unwrap_err(),
            ApplicationError::Configuration(_)
        ));
    }

    #[test]
    fn test_route_argument_mismatch_propagates() {
        let err = resolve(ResolveUrlInput::new("report-detail")).unwrap_err();
        assert!(matches!(
            err,
            ApplicationError::Route(RouteError::ArgumentMismatch { .. })
        ));
    }

    #[test]
    fn test_query_params_are_merged() {
        let params = QueryParams::from([("q", "a b"), ("page", "2")]);
        let fresh = resolve(ResolveUrlInput::new("/search/").with_params(params.clone())).unwrap();
        assert_eq!(fresh.url, "/search/?q=a+b&page=2");

        let merged =
            resolve(ResolveUrlInput::new("/search/?sort=asc#top").with_params(params)).unwrap();
        assert_eq!(merged.url, "/search/?sort=asc&q=a+b&page=2#top");
    }

    #[test]
    fn test_site_relative() {
        assert_eq!(site_relative("/x/").unwrap(), "/x/");
        assert_eq!(site_relative("HTTP://host/y/?z=1").unwrap(), "/y/?z=1");
    }

    #[test]
    fn test_invalid_site_root() {
        let routes = routes();
        let err = ResolveUrl::new(&routes, "not a url")
            .execute(&ResolveUrlInput::new("/"))
            .unwrap_err();
        assert!(matches!(err, ApplicationError::Configuration(_)));
    }
}

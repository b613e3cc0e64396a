//! Redirect following shared by the test clients.

use expanse_domain::{PageRequest, RedirectHop, StatusCode, TestResponse};
use expanse_application::ports::TestClientError;
use url::Url;

/// Hops followed before giving up.
pub const DEFAULT_MAX_REDIRECTS: usize = 10;

const LOCAL_ORIGIN: &str = "http://testserver/";

/// Sends `request` and, when `request.follow` is set, every redirect after
/// it. The final response carries the chain and the path it was served from.
pub(crate) fn follow_redirects<F>(
    request: &PageRequest,
    limit: usize,
    mut send: F,
) -> Result<TestResponse, TestClientError>
where
    F: FnMut(&PageRequest) -> Result<TestResponse, TestClientError>,
{
    let mut current = request.clone();
    let mut response = send(&current)?;
    let mut chain = Vec::new();

    while request.follow && StatusCode::new(response.status).is_redirection() {
        let Some(location) = response.location() else {
            break;
        };
        if chain.len() >= limit {
            return Err(TestClientError::TooManyRedirects {
                limit,
                url: request.url.clone(),
            });
        }

        let next_url = resolve_location(&current.url, location)?;
        tracing::debug!(
            target: "expanse::client",
            from = %current.url,
            to = %next_url,
            status = response.status,
            "following redirect"
        );
        chain.push(RedirectHop::new(next_url.clone(), response.status));

        let method = current.method.after_redirect(response.status);
        let mut next = PageRequest::new(method, next_url).with_secure(current.secure);
        next.headers.clone_from(&current.headers);
        if method == current.method {
            next.data = std::mem::take(&mut current.data);
        }
        current = next;
        response = send(&current)?;
    }

    response.url = current.url;
    response.redirect_chain = chain;
    Ok(response)
}

/// Resolves a `Location` header against the current path, returning a
/// site-relative path and query.
pub(crate) fn resolve_location(current: &str, location: &str) -> Result<String, TestClientError> {
    let invalid = |e: url::ParseError| TestClientError::InvalidUrl(format!("{e}: {location}"));
    let base = Url::parse(LOCAL_ORIGIN)
        .and_then(|origin| origin.join(current))
        .map_err(invalid)?;
    let next = base.join(location.trim()).map_err(invalid)?;

    let mut path = next.path().to_string();
    if let Some(query) = next.query() {
        path.push('?');
        path.push_str(query);
    }
    Ok(path)
}

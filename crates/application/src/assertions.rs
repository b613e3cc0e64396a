//! Response-level assertions.
//!
//! Checks on status, redirects, titles, headers, flash messages and JSON
//! bodies. Content matching lives in `expanse_domain::content`.

use expanse_domain::content::{decode_entities, normalize_whitespace};
use expanse_domain::{
    AssertionError, AssertionResult, ExpectedContent, Message, StatusCode, StatusExpectation,
    TestResponse,
};

use crate::use_cases::site_relative;

/// Asserts the response status.
///
/// # Errors
/// Returns `AssertionError::StatusMismatch` if the status does not match.
pub fn assert_status_code(
    response: &TestResponse,
    expected: &StatusExpectation,
) -> AssertionResult {
    if expected.matches(response.status) {
        Ok(())
    } else {
        Err(AssertionError::StatusMismatch {
            expected: expected.description(),
            actual: response.status,
        })
    }
}

/// Asserts the response was redirected to `expected_url`.
///
/// A followed response must have at least one recorded hop and end at the
/// expected url; an unfollowed one must be a 3xx whose `Location` is the
/// expected url. Absolute urls compare by path and query.
///
/// # Errors
/// Returns `AssertionError::RedirectMismatch` otherwise.
pub fn assert_redirects(response: &TestResponse, expected_url: &str) -> AssertionResult {
    let expected = comparable_url(expected_url);
    let actual = if response.was_redirected() {
        Some(response.url.as_str())
    } else if StatusCode::new(response.status).is_redirection() {
        response.location()
    } else {
        None
    };

    match actual.map(comparable_url) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(AssertionError::RedirectMismatch {
            expected,
            actual: format!("got {actual:?}"),
        }),
        None => Err(AssertionError::RedirectMismatch {
            expected,
            actual: format!("but the response was not redirected (status {})", response.status),
        }),
    }
}

/// Asserts the final url of the response.
///
/// # Errors
/// Returns `AssertionError::UrlMismatch` if the urls differ.
pub fn assert_response_url(response: &TestResponse, expected_url: &str) -> AssertionResult {
    let expected = comparable_url(expected_url);
    let actual = comparable_url(&response.url);
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::UrlMismatch { expected, actual })
    }
}

/// Asserts a page title. With `allow_partials` the expected title only has
/// to appear within the actual one.
///
/// # Errors
/// Returns `AssertionError::TitleMismatch` if the title differs or is absent.
pub fn assert_page_title(
    actual: Option<&str>,
    expected: &str,
    allow_partials: bool,
) -> AssertionResult {
    let expected = comparable_text(expected);
    let actual = actual.map(comparable_text).unwrap_or_default();
    if text_matches(&actual, &expected, allow_partials) {
        Ok(())
    } else {
        Err(AssertionError::TitleMismatch { expected, actual })
    }
}

/// Asserts the page header (first `<h1>`) exactly.
///
/// # Errors
/// Returns `AssertionError::HeaderMismatch` if the header differs or is absent.
pub fn assert_page_header(actual: Option<&str>, expected: &str) -> AssertionResult {
    let expected = comparable_text(expected);
    let actual = actual.map(comparable_text).unwrap_or_default();
    if actual == expected {
        Ok(())
    } else {
        Err(AssertionError::HeaderMismatch { expected, actual })
    }
}

/// Asserts every expected message is among the response's messages.
///
/// # Errors
/// - `AssertionError::Configuration` if nothing is expected
/// - `AssertionError::MessageNotFound` for the first missing message
pub fn assert_context_messages(
    messages: &[Message],
    expected: &ExpectedContent,
    allow_partials: bool,
) -> AssertionResult {
    let present = message_texts(messages);
    for value in non_empty(expected)? {
        let wanted = comparable_text(&value.text);
        if !present
            .iter()
            .any(|text| text_matches(text, &wanted, allow_partials))
        {
            return Err(AssertionError::MessageNotFound {
                expected: wanted,
                actual: present,
            });
        }
    }
    Ok(())
}

/// Asserts none of the given messages are among the response's messages.
///
/// # Errors
/// - `AssertionError::Configuration` if nothing is given
/// - `AssertionError::UnexpectedMessage` for the first message present
pub fn assert_not_context_messages(
    messages: &[Message],
    unexpected: &ExpectedContent,
    allow_partials: bool,
) -> AssertionResult {
    let present = message_texts(messages);
    for value in non_empty(unexpected)? {
        let unwanted = comparable_text(&value.text);
        if let Some(found) = present
            .iter()
            .find(|text| text_matches(text, &unwanted, allow_partials))
        {
            return Err(AssertionError::UnexpectedMessage {
                message: found.clone(),
            });
        }
    }
    Ok(())
}

/// Asserts the body parses as JSON equal to `expected`.
///
/// # Errors
/// Returns `AssertionError::JsonMismatch` for unparsable or different bodies.
pub fn assert_json(response: &TestResponse, expected: &serde_json::Value) -> AssertionResult {
    let mismatch = |actual: String| AssertionError::JsonMismatch {
        expected: pretty(expected),
        actual,
    };
    let actual = response
        .json()
        .map_err(|e| mismatch(format!("<invalid JSON: {e}>")))?;
    if &actual == expected {
        Ok(())
    } else {
        Err(mismatch(pretty(&actual)))
    }
}

fn pretty(value: &serde_json::Value) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| value.to_string())
}

fn non_empty(expected: &ExpectedContent) -> AssertionResult<&ExpectedContent> {
    if expected.is_empty() {
        Err(AssertionError::Configuration(
            "at least one message is required".to_string(),
        ))
    } else {
        Ok(expected)
    }
}

fn message_texts(messages: &[Message]) -> Vec<String> {
    messages
        .iter()
        .map(|message| comparable_text(&message.text))
        .collect()
}

fn text_matches(actual: &str, expected: &str, allow_partials: bool) -> bool {
    if allow_partials {
        actual.contains(expected)
    } else {
        actual == expected
    }
}

fn comparable_text(text: &str) -> String {
    normalize_whitespace(&decode_entities(text))
}

fn comparable_url(url: &str) -> String {
    site_relative(url.trim()).unwrap_or_else(|_| url.trim().to_string())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use expanse_domain::RedirectHop;
    use serde_json::json;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_code() {
        let response = TestResponse::new(404, "");
        assert_status_code(&response, &StatusExpectation::exact(404)).unwrap();
        assert_eq!(
            assert_status_code(&response, &StatusExpectation::success()).unwrap_err(),
            AssertionError::StatusMismatch {
                expected: "in 200-299".to_string(),
                actual: 404,
            }
        );
    }

    #[test]
    fn test_followed_redirect() {
        let mut response = TestResponse::html(200, "<p>Sign in</p>");
        response.url = "/login/?next=/admin/".to_string();
        response.redirect_chain = vec![RedirectHop::new("/login/?next=/admin/", 302)];

        assert_redirects(&response, "/login/?next=/admin/").unwrap();
        assert_redirects(&response, "http://testserver/login/?next=/admin/").unwrap();
        assert!(matches!(
            assert_redirects(&response, "/home/").unwrap_err(),
            AssertionError::RedirectMismatch { .. }
        ));
    }

    #[test]
    fn test_unfollowed_redirect_uses_location() {
        let response = TestResponse::redirect(302, "/done/");
        assert_redirects(&response, "/done/").unwrap();

        let plain = TestResponse::html(200, "");
        let err = assert_redirects(&plain, "/done/").unwrap_err();
        assert_eq!(
            err.to_string(),
            "expected redirect to \"/done/\", but the response was not redirected (status 200)"
        );
    }

    #[test]
    fn test_response_url() {
        let mut response = TestResponse::html(200, "");
        response.url = "/a/".to_string();
        assert_response_url(&response, "/a/").unwrap();
        assert!(assert_response_url(&response, "/b/").is_err());
    }

    #[test]
    fn test_title_partials() {
        let title = Some("Reports  |\n Example");
        assert_page_title(title, "Reports | Example", false).unwrap();
        assert_page_title(title, "Reports", true).unwrap();
        assert_eq!(
            assert_page_title(title, "Reports", false).unwrap_err(),
            AssertionError::TitleMismatch {
                expected: "Reports".to_string(),
                actual: "Reports | Example".to_string(),
            }
        );
        assert!(assert_page_title(None, "Reports", true).is_err());
    }

    #[test]
    fn test_page_header() {
        assert_page_header(Some(" Dashboard "), "Dashboard").unwrap();
        assert!(assert_page_header(Some("Dashboard"), "Dash").is_err());
    }

    #[test]
    fn test_context_messages() {
        let messages = [
            Message::success("Report saved."),
            Message::warning("Quota almost used"),
        ];
        assert_context_messages(&messages, &ExpectedContent::from("saved"), true).unwrap();
        assert_context_messages(
            &messages,
            &ExpectedContent::from(["Report saved.", "Quota almost used"]),
            false,
        )
        .unwrap();

        let err =
            assert_context_messages(&messages, &ExpectedContent::from("saved"), false).unwrap_err();
        assert!(matches!(err, AssertionError::MessageNotFound { .. }));

        assert_not_context_messages(&messages, &ExpectedContent::from("deleted"), true).unwrap();
        assert_eq!(
            assert_not_context_messages(&messages, &ExpectedContent::from("Quota"), true)
                .unwrap_err(),
            AssertionError::UnexpectedMessage {
                message: "Quota almost used".to_string(),
            }
        );
        assert!(matches!(
            assert_context_messages(&messages, &ExpectedContent::new(), true).unwrap_err(),
            AssertionError::Configuration(_)
        ));
    }

    #[test]
    fn test_json() {
        let response = TestResponse::new(200, r#"{"ok": true, "items": [1, 2]}"#);
        assert_json(&response, &json!({"items": [1, 2], "ok": true})).unwrap();
        assert!(matches!(
            assert_json(&response, &json!({"ok": false})).unwrap_err(),
            AssertionError::JsonMismatch { .. }
        ));

        let html = TestResponse::html(200, "<p>no</p>");
        assert!(assert_json(&html, &json!(null)).is_err());
    }
}

//! Integration tests for content matching over realistic pages.
#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use expanse_domain::content::{
    assert_content, assert_not_content, assert_repeating_element, normalize,
};
use expanse_domain::{AssertionError, ContentWindow, ExpectedContent, MatchOptions};
use pretty_assertions::assert_eq;

const PAGE: &str = r#"
<!DOCTYPE html>
<html>
  <head>
    <title>Dashboard | Example</title>
  </head>
  <body>
    <nav>
      <a href="/">Home</a>
      <a href="/reports/">Reports</a>
    </nav>
    <main>
      <h1>
        Dashboard
      </h1>
      <ul class="cards">
        <li>Open tickets</li>
        <li>Closed tickets</li>
        <li>Pending&nbsp;review</li>
      </ul>
      <p>Welcome back, it&#x27;s been a while.</p>
    </main>
    <footer>
      <a href="/">Home</a>
    </footer>
  </body>
</html>
"#;

#[test]
fn ordered_values_in_document_order_pass() {
    let window = ContentWindow::new(PAGE);
    let expected = ExpectedContent::from([
        "<title>Dashboard | Example</title>",
        "<h1>Dashboard</h1>",
        "<li>Open tickets</li>",
        "<li>Pending review</li>",
        "it's been a while",
    ]);
    assert_content(&window, &expected, MatchOptions::new()).unwrap();
}

#[test]
fn swapping_any_pair_fails_without_ignore_ordering() {
    let values = [
        "<h1>Dashboard</h1>",
        "Open tickets",
        "Closed tickets",
        "Pending review",
    ];
    let window = ContentWindow::new(PAGE);

    for i in 0..values.len() {
        for j in i + 1..values.len() {
            let mut swapped = values;
            swapped.swap(i, j);
            let expected = ExpectedContent::from(swapped);

            let err = assert_content(&window, &expected, MatchOptions::new())
                .expect_err("swapped values must fail");
            assert!(
                matches!(err, AssertionError::OrderingViolation { .. }),
                "swap {i}<->{j} gave {err:?}"
            );

            let unordered = MatchOptions::new().with_ignore_ordering(true);
            assert_content(&window, &expected, unordered).unwrap();
        }
    }
}

#[test]
fn markers_scope_the_search() {
    let window = ContentWindow::narrow(PAGE, Some("<main>"), Some("</main>")).unwrap();
    assert_content(&window, &ExpectedContent::from("Dashboard"), MatchOptions::new()).unwrap();

    // The nav links exist, just not inside <main>.
    let err = assert_content(
        &window,
        &ExpectedContent::from(r#"<a href="/reports/">"#),
        MatchOptions::new(),
    )
    .unwrap_err();
    match err {
        AssertionError::NotFound { diagnostics, .. } => assert!(diagnostics.hint.is_some()),
        other => panic!("unexpected error: {other:?}"),
    }

    assert_not_content(&window, &ExpectedContent::from("<nav>"), MatchOptions::new()).unwrap();
}

#[test]
fn case_mismatch_is_not_reported_as_missing() {
    let window = ContentWindow::new(PAGE);
    let err = assert_content(&window, &ExpectedContent::from("open Tickets"), MatchOptions::new())
        .unwrap_err();
    assert!(matches!(err, AssertionError::CaseMismatch { .. }));
}

#[test]
fn repeating_elements_in_sections() {
    let window = ContentWindow::narrow(PAGE, Some("<ul class=\"cards\">"), Some("</ul>")).unwrap();
    assert_repeating_element(&window, "li", 3).unwrap();

    let whole = ContentWindow::new(PAGE);
    assert_repeating_element(&whole, "<a>", 3).unwrap();
    let err = assert_repeating_element(&whole, "a", 2).unwrap_err();
    assert_eq!(
        err,
        AssertionError::ElementCount {
            element: "a".to_string(),
            expected: 2,
            found: 3,
        }
    );
}

#[test]
fn normalization_is_idempotent_on_pages() {
    let once = normalize(PAGE);
    assert_eq!(normalize(&once), once);
    assert!(once.contains("<h1>Dashboard</h1>"));
    assert!(once.starts_with("<!DOCTYPE html><html><head>"));
}

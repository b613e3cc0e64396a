//! Static route table.
//!
//! Maps route names to path patterns such as `/reports/{pk}/` and fills the
//! placeholders from positional or named arguments.

use std::collections::BTreeMap;
use std::sync::LazyLock;

use expanse_application::ports::{RouteArgs, RouteError, RouteResolver};
use regex::Regex;

#[allow(clippy::expect_used)]
static PLACEHOLDER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("placeholder pattern is valid"));

/// Route resolver backed by a name -> pattern table.
#[derive(Debug, Clone, Default)]
pub struct StaticRouteResolver {
    routes: BTreeMap<String, String>,
}

impl StaticRouteResolver {
    /// Creates an empty table.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            routes: BTreeMap::new(),
        }
    }

    /// Adds a route (builder pattern).
    #[must_use]
    pub fn route(mut self, name: impl Into<String>, pattern: impl Into<String>) -> Self {
        self.add_route(name, pattern);
        self
    }

    /// Adds or replaces a route.
    pub fn add_route(&mut self, name: impl Into<String>, pattern: impl Into<String>) {
        self.routes.insert(name.into(), pattern.into());
    }

    fn placeholders(pattern: &str) -> Vec<&str> {
        PLACEHOLDER
            .captures_iter(pattern)
            .filter_map(|caps| caps.get(1).map(|m| m.as_str()))
            .collect()
    }
}

impl RouteResolver for StaticRouteResolver {
    fn reverse(&self, name: &str, args: &RouteArgs) -> Result<String, RouteError> {
        let pattern = self
            .routes
            .get(name)
            .ok_or_else(|| RouteError::NoMatch(name.to_string()))?;
        let placeholders = Self::placeholders(pattern);
        let mismatch = |reason: String| RouteError::ArgumentMismatch {
            name: name.to_string(),
            reason,
        };

        let values: Vec<&str> = if args.kwargs.is_empty() {
            if args.args.len() != placeholders.len() {
                return Err(mismatch(format!(
                    "expected {} positional argument(s), got {}",
                    placeholders.len(),
                    args.args.len()
                )));
            }
            args.args.iter().map(String::as_str).collect()
        } else {
            if let Some(extra) = args
                .kwargs
                .keys()
                .find(|key| !placeholders.contains(&key.as_str()))
            {
                return Err(mismatch(format!("unexpected argument '{extra}'")));
            }
            placeholders
                .iter()
                .map(|placeholder| {
                    args.kwargs
                        .get(*placeholder)
                        .map(String::as_str)
                        .ok_or_else(|| mismatch(format!("missing argument '{placeholder}'")))
                })
                .collect::<Result<_, _>>()?
        };

        let mut values = values.into_iter();
        let path = PLACEHOLDER.replace_all(pattern, |_: &regex::Captures<'_>| {
            values.next().unwrap_or_default().to_string()
        });
        Ok(path.into_owned())
    }
}

//! Route resolver port
//!
//! Reverses route names into paths.

use std::collections::BTreeMap;

/// Arguments used to fill a route pattern.
///
/// Positional and named arguments are mutually exclusive; supplying both is
/// reported when the URL is resolved.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteArgs {
    /// Positional arguments, in pattern order.
    pub args: Vec<String>,
    /// Named arguments.
    pub kwargs: BTreeMap<String, String>,
}

impl RouteArgs {
    /// Creates empty arguments.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            args: Vec::new(),
            kwargs: BTreeMap::new(),
        }
    }

    /// Adds a positional argument.
    #[must_use]
    pub fn arg(mut self, value: impl ToString) -> Self {
        self.args.push(value.to_string());
        self
    }

    /// Adds a named argument.
    #[must_use]
    pub fn kwarg(mut self, name: impl Into<String>, value: impl ToString) -> Self {
        self.kwargs.insert(name.into(), value.to_string());
        self
    }

    /// Returns true if no arguments are set.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.args.is_empty() && self.kwargs.is_empty()
    }

    /// Returns true if both positional and named arguments are set.
    #[must_use]
    pub fn is_conflicting(&self) -> bool {
        !self.args.is_empty() && !self.kwargs.is_empty()
    }
}

/// Errors that can occur when reversing a route.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RouteError {
    /// No route with this name exists.
    #[error("no route named '{0}'")]
    NoMatch(String),

    /// The route exists but the arguments do not fit its pattern.
    #[error("route '{name}' cannot be reversed: {reason}")]
    ArgumentMismatch {
        /// Route name.
        name: String,
        /// What went wrong.
        reason: String,
    },
}

/// Port for reversing route names.
pub trait RouteResolver {
    /// Returns the path for a named route.
    ///
    /// # Errors
    /// Returns `RouteError::NoMatch` if the name is unknown, or
    /// `RouteError::ArgumentMismatch` if the arguments do not fit.
    fn reverse(&self, name: &str, args: &RouteArgs) -> Result<String, RouteError>;
}

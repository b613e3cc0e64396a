//! Application error types

use expanse_domain::{AssertionError, DomainError};
use thiserror::Error;

use crate::ports::{RouteError, TestClientError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// An assertion did not hold.
    #[error(transparent)]
    Assertion(#[from] AssertionError),

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The test client could not complete a request.
    #[error("client error: {0}")]
    Client(#[from] TestClientError),

    /// A route could not be reversed.
    #[error("route error: {0}")]
    Route(#[from] RouteError),

    /// The requested user or group was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// Helper arguments contradict each other.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl ApplicationError {
    /// Returns the assertion failure, if this is one.
    #[must_use]
    pub const fn as_assertion(&self) -> Option<&AssertionError> {
        match self {
            Self::Assertion(err) => Some(err),
            _ => None,
        }
    }
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;

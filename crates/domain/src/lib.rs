//! Expanse Domain - Core assertion types
//!
//! This crate defines the response model and the content matching rules
//! used by Expanse assertions. Everything here is pure Rust with no I/O.

pub mod content;
pub mod error;
pub mod expectation;
pub mod message;
pub mod request;
pub mod response;
pub mod settings;
pub mod user;

pub use content::{ContentWindow, ElementTally, MatchOptions};
pub use error::{
    AssertionError, AssertionResult, DomainError, DomainResult, Marker, MatchDiagnostics,
};
pub use expectation::{ExpectedContent, ExpectedValue, StatusExpectation};
pub use message::{Level, Message};
pub use request::{HttpMethod, PageRequest, QueryParam, QueryParams};
pub use response::{RedirectHop, ResponseContext, StatusCode, TestResponse};
pub use settings::{AssertionSettings, ClientSettings, DebugSettings, Settings};
pub use user::{Group, TestUser};

//! Port definitions (interfaces)
//!
//! Ports define the boundaries between the assertion helpers and the
//! systems they drive. Each port is a trait implemented by adapters in the
//! infrastructure layer.

mod html_inspector;
mod route_resolver;
mod test_client;
mod user_repository;

pub use html_inspector::{ElementSnapshot, HtmlInspector, InspectError};
pub use route_resolver::{RouteArgs, RouteError, RouteResolver};
pub use test_client::{TestClient, TestClientError};
pub use user_repository::UserRepository;

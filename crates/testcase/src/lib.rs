//! Expanse - expanded assertions for web integration tests
//!
//! [`IntegrationTestCase`] fetches pages through a test client (in-process or
//! over HTTP), logs in fixture users and asserts on status codes, redirects,
//! titles, headers, flash messages, JSON bodies and, above all, page content:
//! ordered substring matching over normalized HTML, narrowed by start and end
//! markers, plus repeating-element counts and element lookups.
//!
//! The layers are also usable on their own: `expanse_domain` holds the pure
//! matching rules, `expanse_application` the ports and use cases and
//! `expanse_infrastructure` the adapters.

mod logging;
mod options;
pub mod prelude;
mod testcase;

pub use expanse_application as application;
pub use expanse_domain as domain;
pub use expanse_infrastructure as infrastructure;

pub use logging::init_test_logging;
pub use options::{ContentOptions, ResponseExpectations};
pub use testcase::{IntegrationTestCase, MemoryTestCase};

//! Expanse Application - Ports and use cases
//!
//! This crate wires the pure domain rules to the outside world through
//! ports: the test client that fetches pages, the route resolver that
//! turns route names into paths, the user store holding fixture users and
//! the HTML inspector behind element lookups.

pub mod assertions;
pub mod error;
pub mod ports;
pub mod use_cases;

pub use error::{ApplicationError, ApplicationResult};

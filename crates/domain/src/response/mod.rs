//! Response types.

mod test_response;

pub use test_response::{RedirectHop, ResponseContext, StatusCode, TestResponse};

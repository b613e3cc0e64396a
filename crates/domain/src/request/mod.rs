//! Request types.

mod method;
mod page;
mod query;

pub use method::HttpMethod;
pub use page::PageRequest;
pub use query::{QueryParam, QueryParams};

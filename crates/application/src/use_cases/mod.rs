//! Use cases - Application-specific operations

mod get_page_response;
mod locate_elements;
mod resolve_url;
pub mod users;

pub use get_page_response::*;
pub use locate_elements::*;
pub use resolve_url::*;
pub use users::UserFixtures;

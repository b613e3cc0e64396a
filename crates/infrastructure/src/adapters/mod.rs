//! Port adapters.

mod memory_client;
mod memory_users;
mod redirects;
mod reqwest_client;
mod route_table;

pub use memory_client::{Handler, MemoryTestClient};
pub use memory_users::MemoryUserRepository;
pub use redirects::DEFAULT_MAX_REDIRECTS;
pub use reqwest_client::{LoginForm, ReqwestTestClient};
pub use route_table::StaticRouteResolver;

//! Expanse Infrastructure - Adapters and implementations
//!
//! This crate provides concrete implementations of the ports defined in the
//! application layer, the settings loader and debug reporting.

pub mod adapters;
pub mod debug;
pub mod html;
pub mod settings;

pub use adapters::{
    DEFAULT_MAX_REDIRECTS, Handler, LoginForm, MemoryTestClient, MemoryUserRepository,
    ReqwestTestClient, StaticRouteResolver,
};
pub use debug::{DEBUG_TARGET, DebugReporter};
pub use html::ScraperInspector;
pub use settings::{ENV_PREFIX, Loader, SettingsError, load_settings};

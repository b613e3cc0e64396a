//! HTML inspection backed by `scraper`.

mod scraper_inspector;

pub use scraper_inspector::ScraperInspector;

//! HTML content matching.
//!
//! Pure string processing over rendered HTML: normalization, window
//! narrowing, ordered substring matching and repeating-element counting.

mod matcher;
mod normalize;
mod repeating;
mod search;
mod window;

pub use matcher::{MatchOptions, assert_content, assert_not_content};
pub use normalize::{
    VOID_ELEMENTS, decode_entities, is_void_element, normalize, normalize_tags,
    normalize_whitespace,
};
pub use repeating::{ElementTally, assert_repeating_element, count_element, element_name};
pub use window::ContentWindow;

//! Regex-backed find and replace planning over a `Buffer`.

pub mod finder;
pub mod line_index;

pub use finder::{FindError, Finder, Match, Replacement, SearchMode};
pub use line_index::LineIndex;

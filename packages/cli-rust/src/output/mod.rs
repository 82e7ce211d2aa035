//! Output utilities for CLI commands
//!
//! Color helpers for identifiers and counts, plus "last used" formatting
//! for history listings.

pub mod colors;
pub mod time;

pub use colors::{count_style, identifier_color, identifier_style, tag_list};
pub use time::format_last_used;

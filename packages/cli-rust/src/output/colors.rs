//! Color utilities for CLI output
//!
//! Provides consistent styling for host names and manual connections.

use comfy_table::Color;
use console::{Style, StyledObject};
use sshmark_core::history::is_manual;

/// Style a history identifier
///
/// - manual connection -> yellow
/// - named host -> cyan
pub fn identifier_style(identifier: &str) -> StyledObject<String> {
    let style = if is_manual(identifier) {
        Style::new().yellow()
    } else {
        Style::new().cyan()
    };
    style.apply_to(identifier.to_string())
}

/// Table cell color for a history identifier, matching [`identifier_style`]
pub fn identifier_color(identifier: &str) -> Color {
    if is_manual(identifier) {
        Color::Yellow
    } else {
        Color::Cyan
    }
}

/// Style a connection count; hosts never used are dimmed
pub fn count_style(count: u32) -> StyledObject<String> {
    let style = if count == 0 {
        Style::new().dim()
    } else {
        Style::new().green()
    };
    style.apply_to(count.to_string())
}

/// Join tags for a table cell, `-` when there are none
pub fn tag_list(tags: &[String]) -> String {
    if tags.is_empty() {
        "-".to_string()
    } else {
        tags.join(", ")
    }
}

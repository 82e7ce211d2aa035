//! Relative time formatting

use std::time::Duration;

use chrono::{DateTime, Utc};

/// Format a last-connect time as e.g. `3h ago`
///
/// Only the largest unit is shown. `None` means the host was never used.
pub fn format_last_used(last: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let Some(last) = last else {
        return "never".to_string();
    };

    // Clock skew can put the record slightly in the future
    let elapsed = (now - last).to_std().unwrap_or_default().as_secs();
    let rounded = match elapsed {
        0 => return "just now".to_string(),
        s if s >= 86_400 => s - s % 86_400,
        s if s >= 3_600 => s - s % 3_600,
        s if s >= 60 => s - s % 60,
        s => s,
    };

    format!(
        "{} ago",
        humantime::format_duration(Duration::from_secs(rounded))
    )
}

//! Formatting helpers shared across the board and the list CLI.

use chrono::{DateTime, NaiveDate, Utc};

/// Placeholder shown for any display field that is absent or blank.
pub const PLACEHOLDER: &str = "—";

/// Return the trimmed field value, or the placeholder if absent or blank.
pub fn display_or_dash(value: Option<&str>) -> &str {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => v,
        _ => PLACEHOLDER,
    }
}

/// Format a due date compactly (e.g., "Jun 07"), or the placeholder.
pub fn format_short_date(date: Option<NaiveDate>) -> String {
    match date {
        Some(d) => d.format("%b %d").to_string(),
        None => PLACEHOLDER.to_string(),
    }
}

/// Truncate to at most `max_chars` characters, marking the cut with "…".
pub fn truncate(value: &str, max_chars: usize) -> String {
    if value.chars().count() <= max_chars {
        return value.to_string();
    }
    if max_chars == 0 {
        return String::new();
    }
    let mut out: String = value.chars().take(max_chars - 1).collect();
    out.push('…');
    out
}

/// Format a timestamp as relative time (e.g., "2m ago").
pub fn format_relative_time(ts: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let duration = now.signed_duration_since(ts);

    if duration.num_seconds() < 5 {
        "just now".to_string()
    } else if duration.num_seconds() < 60 {
        format!("{}s ago", duration.num_seconds())
    } else if duration.num_minutes() < 60 {
        format!("{}m ago", duration.num_minutes())
    } else if duration.num_hours() < 24 {
        format!("{}h ago", duration.num_hours())
    } else {
        format!("{}d ago", duration.num_days())
    }
}

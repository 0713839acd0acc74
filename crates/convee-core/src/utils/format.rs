use std::cmp::Ordering;

use chrono::Duration;

/// Truncate a string to a maximum number of characters, adding ellipsis if needed
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len - 3).collect();
        format!("{}...", truncated)
    }
}

/// Format a date string to a more readable format
pub fn format_date(date: &str) -> String {
    if let Ok(dt) = chrono::DateTime::parse_from_rfc3339(date) {
        dt.format("%b %d, %Y").to_string()
    } else if let Ok(dt) = chrono::NaiveDateTime::parse_from_str(date, "%Y-%m-%dT%H:%M:%S") {
        // Directus returns timestamps without offset for `datetime` fields
        dt.format("%b %d, %Y").to_string()
    } else if date.len() >= 10 {
        date.chars().take(10).collect()
    } else {
        date.to_string()
    }
}

pub fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

pub fn cmp_ignore_case(a: &str, b: &str) -> Ordering {
    a.to_lowercase().cmp(&b.to_lowercase())
}

/// "5h 12m" style display of a session's remaining lifetime
pub fn format_remaining(remaining: Duration) -> String {
    let minutes = remaining.num_minutes().max(0);
    if minutes < 1 {
        "less than a minute".to_string()
    } else if minutes < 60 {
        format!("{}m", minutes)
    } else {
        format!("{}h {}m", minutes / 60, minutes % 60)
    }
}

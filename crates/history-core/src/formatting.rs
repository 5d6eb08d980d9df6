//! Display helpers shared by the export writers and the UI.

use chrono::{DateTime, FixedOffset};

/// Maximum number of characters of a title kept for display.
pub const DISPLAY_TITLE_MAX_CHARS: usize = 45;

/// Shorten `title` to `max_chars` characters and append `"..."` when it is
/// longer.
///
/// # Examples
///
/// ```
/// use history_core::formatting::truncate_title;
///
/// assert_eq!(truncate_title("short", 45), "short");
/// assert_eq!(truncate_title("abcdef", 3), "abc...");
/// ```
pub fn truncate_title(title: &str, max_chars: usize) -> String {
    match title.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => format!("{}...", &title[..byte_idx]),
        None => title.to_string(),
    }
}

/// Format an integer count with thousands separators.
///
/// # Examples
///
/// ```
/// use history_core::formatting::format_count;
///
/// assert_eq!(format_count(7), "7");
/// assert_eq!(format_count(1_234_567), "1,234,567");
/// ```
pub fn format_count(value: u64) -> String {
    group_thousands(&value.to_string())
}

/// Calculate `(part / whole) * 100`, rounded to `decimal_places`.
///
/// Returns `0.0` if `whole` is zero to avoid division by zero.
pub fn percentage(part: f64, whole: f64, decimal_places: u32) -> f64 {
    if whole == 0.0 {
        return 0.0;
    }
    let raw = (part / whole) * 100.0;
    let factor = 10_f64.powi(decimal_places as i32);
    (raw * factor).round() / factor
}

/// US-style calendar date without padding, e.g. `"1/29/2025"`.
pub fn format_date(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%-m/%-d/%Y").to_string()
}

/// 12-hour clock time with seconds, e.g. `"8:00:26 AM"`.
pub fn format_time_of_day(dt: &DateTime<FixedOffset>) -> String {
    dt.format("%-I:%M:%S %p").to_string()
}

/// Date plus `hh:mm AM` time, as used in the recent-history table.
pub fn format_short_datetime(dt: &DateTime<FixedOffset>) -> String {
    format!("{} {}", format_date(dt), dt.format("%I:%M %p"))
}

// ── Internal helpers ──────────────────────────────────────────────────────────

/// Insert commas every three digits from the right of an integer string.
fn group_thousands(s: &str) -> String {
    if s.len() <= 3 {
        return s.to_string();
    }
    let chars: Vec<char> = s.chars().collect();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    let remainder = chars.len() % 3;
    for (i, &c) in chars.iter().enumerate() {
        if i != 0 && (i % 3 == remainder) {
            result.push(',');
        }
        result.push(c);
    }
    result
}

// ── Tests ──────────────────────────────────────────────────────────────────────

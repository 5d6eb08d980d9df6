//! Plain-text reports for the non-interactive views.
//!
//! Columns are aligned by display width so titles with wide characters
//! (CJK, emoji) do not shift the following columns.

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use history_core::formatting::{self, percentage};
use history_core::models::Dashboard;
use history_runtime::store::HistoryStore;

use crate::components::header::status_text;
use crate::table_view::channel_shares;

/// Display width reserved for titles in text tables.
const TITLE_COLUMN_WIDTH: usize = 48;
/// Display width reserved for channel names.
const CHANNEL_COLUMN_WIDTH: usize = 28;
/// Longest text bar in the activity reports.
const MAX_BAR_WIDTH: usize = 40;

// ── Width helpers ─────────────────────────────────────────────────────────────

/// Cut `text` to at most `width` display columns, marking a cut with `…`.
pub fn fit_width(text: &str, width: usize) -> String {
    if text.width() <= width {
        return text.to_string();
    }
    let budget = width.saturating_sub(1);
    let mut used = 0;
    let mut out = String::new();
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push('…');
    out
}

/// Left-align `text` in exactly `width` display columns.
pub fn pad_right(text: &str, width: usize) -> String {
    let fitted = fit_width(text, width);
    let padding = width.saturating_sub(fitted.width());
    format!("{}{}", fitted, " ".repeat(padding))
}

fn bar(count: u32, max: u32) -> String {
    if max == 0 {
        return String::new();
    }
    let len = (count as usize * MAX_BAR_WIDTH).div_ceil(max as usize);
    "█".repeat(len)
}

// ── Views ─────────────────────────────────────────────────────────────────────

/// Render `view` as plain text. Unknown view names fall back to the summary.
pub fn render_report(view: &str, store: &HistoryStore, history_limit: usize) -> String {
    let dashboard = store.dashboard();
    match view {
        "channels" => channels_report(dashboard),
        "monthly" => monthly_report(dashboard),
        "hourly" => hourly_report(dashboard),
        "recurring" => recurring_report(dashboard, store.records().len()),
        "history" => history_report(store, history_limit),
        _ => summary_report(store),
    }
}

/// Counts, date range and the leading channel.
pub fn summary_report(store: &HistoryStore) -> String {
    let records = store.records();
    let dashboard = store.dashboard();
    let mut out = String::new();

    out.push_str(&status_text(records.len()));
    out.push('\n');

    let timezone = store.normalizer().timezone();
    out.push_str(&format!("Timezone:          {}\n", timezone.name()));

    let by_recency = store.records_by_recency();
    if let (Some(newest), Some(oldest)) = (by_recency.first(), by_recency.last()) {
        out.push_str(&format!(
            "Date range:        {} to {}\n",
            formatting::format_date(&oldest.instant()),
            formatting::format_date(&newest.instant())
        ));
    }
    if let Some(meta) = store.metadata() {
        out.push_str(&format!("Skipped entries:   {}\n", meta.entries_skipped));
    }
    if let Some(top) = dashboard.channels.first() {
        out.push_str(&format!(
            "Top channel:       {} ({})\n",
            top.name,
            formatting::format_count(top.count as u64)
        ));
    }
    if let Some(peak) = dashboard.hourly.iter().filter(|h| h.count > 0).max_by_key(|h| h.count) {
        out.push_str(&format!("Busiest hour:      {}:00\n", peak.hour));
    }
    out.push_str(&format!("Channels listed:   {}\n", dashboard.channels.len()));
    out.push_str(&format!("Recurring titles:  {}\n", dashboard.recurring.len()));
    out
}

pub fn channels_report(dashboard: &Dashboard) -> String {
    let mut out = format!(
        "{:>3}  {}  {:>8}  {:>6}\n",
        "#",
        pad_right("Channel", CHANNEL_COLUMN_WIDTH),
        "Videos",
        "Share"
    );
    let shares = channel_shares(&dashboard.channels);
    for (i, (channel, share)) in dashboard.channels.iter().zip(shares).enumerate() {
        out.push_str(&format!(
            "{:>3}  {}  {:>8}  {:>5.1}%\n",
            i + 1,
            pad_right(&channel.name, CHANNEL_COLUMN_WIDTH),
            formatting::format_count(channel.count as u64),
            share
        ));
    }
    out
}

pub fn monthly_report(dashboard: &Dashboard) -> String {
    let max = dashboard.monthly.iter().map(|m| m.count).max().unwrap_or(0);
    dashboard
        .monthly
        .iter()
        .map(|m| format!("{}  {:>6}  {}\n", m.year_month, m.count, bar(m.count, max)))
        .collect()
}

pub fn hourly_report(dashboard: &Dashboard) -> String {
    let max = dashboard.hourly.iter().map(|h| h.count).max().unwrap_or(0);
    dashboard
        .hourly
        .iter()
        .map(|h| format!("{}:00  {:>6}  {}\n", h.hour, h.count, bar(h.count, max)))
        .collect()
}

pub fn recurring_report(dashboard: &Dashboard, total_videos: usize) -> String {
    if dashboard.recurring.is_empty() {
        return "No title was watched more than once.\n".to_string();
    }
    let mut out = format!(
        "{}  {:>5}  {:>6}\n",
        pad_right("Title", TITLE_COLUMN_WIDTH),
        "Views",
        "Share"
    );
    for item in &dashboard.recurring {
        out.push_str(&format!(
            "{}  {:>5}  {:>5.1}%\n",
            pad_right(&item.display_title, TITLE_COLUMN_WIDTH),
            item.count,
            percentage(item.count as f64, total_videos as f64, 1)
        ));
    }
    out
}

pub fn history_report(store: &HistoryStore, limit: usize) -> String {
    let mut out = format!(
        "{}  {}  {}\n",
        pad_right("Title", TITLE_COLUMN_WIDTH),
        pad_right("Channel", CHANNEL_COLUMN_WIDTH),
        "Watched"
    );
    for record in store.recent(limit) {
        out.push_str(&format!(
            "{}  {}  {}\n",
            pad_right(record.title(), TITLE_COLUMN_WIDTH),
            pad_right(record.channel(), CHANNEL_COLUMN_WIDTH),
            formatting::format_short_datetime(&record.instant())
        ));
    }
    out
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use history_core::time_utils::DateTimeNormalizer;
    use history_runtime::data::sample::SAMPLE_DATA;

    fn sample_store() -> HistoryStore {
        let mut store = HistoryStore::new(DateTimeNormalizer::new("America/New_York"));
        store.parse(SAMPLE_DATA).unwrap();
        store
    }

    // ── Width helpers ─────────────────────────────────────────────────────────

    #[test]
    fn test_pad_right_ascii() {
        assert_eq!(pad_right("abc", 6), "abc   ");
        assert_eq!(pad_right("abcdefgh", 6), "abcde…");
    }

    #[test]
    fn test_pad_right_wide_chars() {
        // Each CJK character is two columns wide.
        let padded = pad_right("日本語", 8);
        assert_eq!(padded.width(), 8);
        assert_eq!(padded, "日本語  ");

        let cut = pad_right("日本語テキスト", 7);
        assert_eq!(cut.width(), 7);
        assert!(cut.ends_with('…'));
    }

    #[test]
    fn test_bar_scaling() {
        assert_eq!(bar(0, 0), "");
        assert_eq!(bar(10, 10).chars().count(), MAX_BAR_WIDTH);
        assert_eq!(bar(1, 40).chars().count(), 1);
        assert_eq!(bar(0, 10), "");
    }

    // ── Views ─────────────────────────────────────────────────────────────────

    #[test]
    fn test_summary_report() {
        let report = summary_report(&sample_store());
        assert!(report.starts_with("4 videos analyzed\n"));
        assert!(report.contains("America/New_York"));
        assert!(report.contains("9/1/2023 to 1/29/2025"));
        assert!(report.contains("Top channel:       Prof. John Gallaugher (3)"));
    }

    #[test]
    fn test_channels_report_aligned() {
        let report = channels_report(sample_store().dashboard());
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].contains("Prof. John Gallaugher"));
        assert!(lines[1].ends_with("75.0%"));
        assert!(lines[2].ends_with("25.0%"));
        assert_eq!(lines[1].width(), lines[2].width());
    }

    #[test]
    fn test_hourly_report_has_24_lines() {
        let report = hourly_report(sample_store().dashboard());
        assert_eq!(report.lines().count(), 24);
        assert!(report.starts_with("00:00"));
    }

    #[test]
    fn test_monthly_report() {
        let report = monthly_report(sample_store().dashboard());
        let months: Vec<&str> = report.lines().map(|l| &l[..7]).collect();
        assert_eq!(months, vec!["2023-09", "2024-01", "2024-10", "2025-01"]);
    }

    #[test]
    fn test_recurring_report() {
        let store = sample_store();
        let report = recurring_report(store.dashboard(), store.records().len());
        assert!(report.contains("Physical Computing"));
        assert!(report.contains("50.0%"));

        assert_eq!(
            recurring_report(&Dashboard::default(), 0),
            "No title was watched more than once.\n"
        );
    }

    #[test]
    fn test_history_report_respects_limit() {
        let report = history_report(&sample_store(), 2);
        let lines: Vec<&str> = report.lines().collect();
        assert_eq!(lines.len(), 3);
        assert!(lines[1].starts_with("Disco Button"));
        assert!(lines[1].ends_with("1/29/2025 08:00 AM"));
    }

    #[test]
    fn test_render_report_dispatch() {
        let store = sample_store();
        assert_eq!(render_report("hourly", &store, 10).lines().count(), 24);
        assert!(render_report("summary", &store, 10).contains("videos analyzed"));
        assert!(render_report("dashboard", &store, 10).contains("videos analyzed"));
    }
}

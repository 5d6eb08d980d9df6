//! CSV and JSON export of watch records, plus JSON import.

use std::fs;
use std::path::Path;

use history_core::error::{HistoryError, Result};
use history_core::formatting::{format_date, format_time_of_day};
use history_core::models::WatchRecord;
use serde::Serialize;
use tracing::debug;

/// First line of every CSV export.
pub const CSV_HEADER: &str = "Title,Channel,Date,Time";

/// One CSV row. Title and channel carry their own quotes; date and time
/// never contain a comma or quote and are written bare.
#[derive(Serialize)]
struct WatchRecordCsv {
    title: String,
    channel: String,
    date: String,
    time: String,
}

impl From<&WatchRecord> for WatchRecordCsv {
    fn from(record: &WatchRecord) -> Self {
        let instant = record.instant();
        Self {
            title: quote_text(record.title()),
            channel: quote_text(record.channel()),
            date: format_date(&instant),
            time: format_time_of_day(&instant),
        }
    }
}

fn quote_text(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}

// ── Ordering ──────────────────────────────────────────────────────────────────

/// Copy of `records` ordered most-recent-first. Equal instants keep their
/// extraction order.
pub fn sort_by_recency(records: &[WatchRecord]) -> Vec<WatchRecord> {
    let mut sorted = records.to_vec();
    sorted.sort_by(|a, b| b.timestamp_millis().cmp(&a.timestamp_millis()));
    sorted
}

// ── CSV ───────────────────────────────────────────────────────────────────────

/// Render `records` as CSV, most-recent-first.
///
/// The header is unquoted. Title and channel are double-quoted with embedded
/// quotes doubled; date and time are bare.
pub fn to_csv_string(records: &[WatchRecord]) -> Result<String> {
    let mut buf = Vec::new();
    buf.extend_from_slice(CSV_HEADER.as_bytes());
    buf.push(b'\n');

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(buf);
    for record in sort_by_recency(records).iter() {
        writer.serialize(WatchRecordCsv::from(record))?;
    }
    let buf = writer
        .into_inner()
        .map_err(|e| HistoryError::Io(e.into_error()))?;

    String::from_utf8(buf).map_err(|e| HistoryError::Extraction(e.to_string()))
}

/// Write the CSV export to `path`.
pub fn write_csv(records: &[WatchRecord], path: &Path) -> Result<()> {
    let content = to_csv_string(records)?;
    fs::write(path, content)?;
    debug!("Wrote {} records as CSV to {}", records.len(), path.display());
    Ok(())
}

// ── JSON ──────────────────────────────────────────────────────────────────────

/// Render `records` as a pretty-printed JSON array, most-recent-first.
pub fn to_json_string(records: &[WatchRecord]) -> Result<String> {
    Ok(serde_json::to_string_pretty(&sort_by_recency(records))?)
}

/// Write the JSON export to `path`.
pub fn write_json(records: &[WatchRecord], path: &Path) -> Result<()> {
    let content = to_json_string(records)?;
    fs::write(path, content)?;
    debug!("Wrote {} records as JSON to {}", records.len(), path.display());
    Ok(())
}

/// Parse a JSON export back into records.
///
/// Records whose calendar fields disagree with their timestamp are rejected.
pub fn import_json(content: &str) -> Result<Vec<WatchRecord>> {
    Ok(serde_json::from_str(content)?)
}

/// Read and parse a JSON export file.
pub fn read_json(path: &Path) -> Result<Vec<WatchRecord>> {
    let content = fs::read_to_string(path).map_err(|source| HistoryError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    import_json(&content)
}

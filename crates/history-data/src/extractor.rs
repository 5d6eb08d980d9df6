//! Watch-history text extraction.
//!
//! Scans the textual rendering of a Takeout watch-history export for the two
//! entry shapes it contains and converts each match into a [`WatchRecord`].
//!
//! * Titled entries: `Watched **<title>** **<channel>** <date>, <time> AM|PM`
//! * URL entries: `Watched https://www.youtube.com/watch?v=<id>` followed by a
//!   date line.
//!
//! All titled matches come first, then all URL matches, each in order of
//! appearance. A candidate that fails validation is skipped with a
//! [`SkipReason`] and never aborts the pass.

use std::sync::OnceLock;

use history_core::error::{HistoryError, Result};
use history_core::models::WatchRecord;
use history_core::time_utils::{
    ClockReading, DateTimeNormalizer, DateTimeParts, Meridiem, SkipReason,
};
use regex::{Captures, Regex};
use tracing::debug;

/// Characters scanned after a titled entry for its date line.
pub const TITLED_CONTEXT_CHARS: usize = 300;

/// Characters scanned after a URL entry's date fragment for a full date line.
pub const URL_CONTEXT_CHARS: usize = 100;

// ── Patterns ──────────────────────────────────────────────────────────────────

// `Watched` is followed by a no-break space that often arrives mis-decoded as
// `Â` + NBSP, so accept an optional `Â` before any run of blanks.
const WATCHED_PREFIX: &str = r"Watched(?:\x{00C2})?[ \t\x{00A0}]+";

fn titled_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"{}\*\*(.*?)\*\* \*\*(.*?)\*\* (.*?),.*?(?:\n|$)",
            WATCHED_PREFIX
        ))
        .expect("regex is valid")
    })
}

fn url_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(&format!(
            r"{}(https://www\.youtube\.com/watch\?v=.*?)\n(.*?),.*?(?:\n|$)",
            WATCHED_PREFIX
        ))
        .expect("regex is valid")
    })
}

fn date_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"(Jan|Feb|Mar|Apr|May|Jun|Jul|Aug|Sep|Oct|Nov|Dec)\s+(\d+),\s+(\d+)")
            .expect("regex is valid")
    })
}

fn time_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\d+):(\d+):(\d+)").expect("regex is valid"))
}

fn video_id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[?&]v=([^&]+)").expect("regex is valid"))
}

// ── Public types ──────────────────────────────────────────────────────────────

/// Which of the two entry shapes a candidate matched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryFormat {
    Titled,
    Url,
}

/// A candidate that matched an entry shape but produced no record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedEntry {
    pub format: EntryFormat,
    /// Byte offset of the match in the input text.
    pub offset: usize,
    pub reason: SkipReason,
}

/// Result of scanning one input text.
#[derive(Debug, Clone, Default)]
pub struct ExtractionReport {
    /// Records in extraction order: titled entries, then URL entries.
    pub records: Vec<WatchRecord>,
    pub skipped: Vec<SkippedEntry>,
}

// ── EntryExtractor ────────────────────────────────────────────────────────────

/// Converts raw export text into [`WatchRecord`]s.
pub struct EntryExtractor {
    normalizer: DateTimeNormalizer,
}

impl EntryExtractor {
    pub fn new(normalizer: DateTimeNormalizer) -> Self {
        Self { normalizer }
    }

    /// Scan `text` and fail with [`HistoryError::EmptyResult`] when neither
    /// pass yields a record.
    pub fn extract(&self, text: &str) -> Result<ExtractionReport> {
        let report = self.scan(text);
        if report.records.is_empty() {
            return Err(HistoryError::EmptyResult);
        }
        Ok(report)
    }

    /// Run both passes over `text` without the emptiness check.
    pub fn scan(&self, text: &str) -> ExtractionReport {
        let mut report = ExtractionReport::default();

        for caps in titled_pattern().captures_iter(text) {
            let outcome = self.parse_titled(text, &caps);
            record_outcome(&mut report, EntryFormat::Titled, &caps, outcome);
        }

        for caps in url_pattern().captures_iter(text) {
            let outcome = self.parse_url(text, &caps);
            record_outcome(&mut report, EntryFormat::Url, &caps, outcome);
        }

        debug!(
            "Extracted {} records, skipped {} candidates",
            report.records.len(),
            report.skipped.len()
        );

        report
    }

    /// Build a record from a titled-entry match.
    ///
    /// The date line is the first line within [`TITLED_CONTEXT_CHARS`] of the
    /// match that has a colon and an AM/PM marker. Date and time are matched
    /// independently on it and both are required.
    fn parse_titled(
        &self,
        text: &str,
        caps: &Captures<'_>,
    ) -> std::result::Result<WatchRecord, SkipReason> {
        let title = caps[1].trim();
        let channel = caps[2].trim();
        let start = caps.get(0).map_or(0, |m| m.start());

        let date_line = context_window(text, start, TITLED_CONTEXT_CHARS)
            .split('\n')
            .find(|line| line.contains(':') && (line.contains("AM") || line.contains("PM")))
            .map(DateTimeNormalizer::clean)
            .ok_or(SkipReason::NoDateLine)?;

        let date = date_pattern()
            .captures(&date_line)
            .ok_or(SkipReason::MissingDate)?;
        let time = time_pattern()
            .captures(&date_line)
            .ok_or(SkipReason::MissingTime)?;

        let reading = self.normalizer.normalize(&DateTimeParts {
            month: date.get(1).map_or("", |m| m.as_str()),
            day: date.get(2).map_or("", |m| m.as_str()),
            year: date.get(3).map_or("", |m| m.as_str()),
            hour: time.get(1).map_or("", |m| m.as_str()),
            minute: time.get(2).map_or("", |m| m.as_str()),
            second: time.get(3).map_or("", |m| m.as_str()),
            meridiem: Meridiem::detect(&date_line),
        })?;

        Ok(WatchRecord::from_reading(title, channel, reading))
    }

    /// Build a record from a URL-entry match.
    ///
    /// The date string is the first line carrying AM/PM within
    /// [`URL_CONTEXT_CHARS`] of the date fragment, or the fragment itself.
    /// The explicit pattern is tried first and keeps the written clock hour;
    /// the generic parser takes the hour from the resolved instant.
    fn parse_url(
        &self,
        text: &str,
        caps: &Captures<'_>,
    ) -> std::result::Result<WatchRecord, SkipReason> {
        let url = caps[1].trim();
        let video_id = video_id_pattern()
            .captures(url)
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().trim())
            .filter(|id| !id.is_empty());

        let fragment = caps.get(2).ok_or(SkipReason::NoDateLine)?;
        let date_string = context_window(text, fragment.start(), URL_CONTEXT_CHARS)
            .split('\n')
            .find(|line| line.contains("AM") || line.contains("PM"))
            .unwrap_or(fragment.as_str())
            .trim();

        let reading = self.normalizer.parse_explicit(date_string).or_else(|_| {
            self.normalizer
                .parse_generic(date_string)
                .map(ClockReading::from_instant)
        })?;

        Ok(WatchRecord::from_video_id(video_id, reading))
    }
}

// ── Internal helpers ──────────────────────────────────────────────────────────

fn record_outcome(
    report: &mut ExtractionReport,
    format: EntryFormat,
    caps: &Captures<'_>,
    outcome: std::result::Result<WatchRecord, SkipReason>,
) {
    match outcome {
        Ok(record) => report.records.push(record),
        Err(reason) => {
            let offset = caps.get(0).map_or(0, |m| m.start());
            debug!("Skipping {:?} entry at byte {}: {}", format, offset, reason);
            report.skipped.push(SkippedEntry {
                format,
                offset,
                reason,
            });
        }
    }
}

/// Up to `max_chars` characters of `text` starting at byte `start`.
fn context_window(text: &str, start: usize, max_chars: usize) -> &str {
    let rest = text.get(start..).unwrap_or("");
    match rest.char_indices().nth(max_chars) {
        Some((end, _)) => &rest[..end],
        None => rest,
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

//! Analysis pipeline: extract records from raw text, then derive the
//! dashboard views.

use chrono::Utc;
use history_core::error::Result;
use history_core::models::{Dashboard, WatchRecord};
use history_core::time_utils::DateTimeNormalizer;
use tracing::info;

use crate::aggregator::HistoryAggregator;
use crate::extractor::EntryExtractor;

// ── Public types ──────────────────────────────────────────────────────────────

/// Metadata produced alongside the analysis result.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct AnalysisMetadata {
    /// ISO-8601 timestamp when this result was generated.
    pub generated_at: String,
    /// IANA name of the timezone dates were resolved in.
    pub timezone: String,
    /// Number of records produced.
    pub records_extracted: usize,
    /// Candidates that matched an entry shape but had no usable date.
    pub entries_skipped: usize,
    /// Wall-clock seconds spent scanning the text.
    pub parse_time_seconds: f64,
}

/// The complete output of [`analyze_text`].
#[derive(Debug, Clone)]
pub struct HistoryAnalysis {
    /// Records in extraction order.
    pub records: Vec<WatchRecord>,
    pub dashboard: Dashboard,
    pub metadata: AnalysisMetadata,
}

// ── Public function ───────────────────────────────────────────────────────────

/// Run the full pipeline over `text`.
///
/// Fails with [`HistoryError::EmptyResult`](history_core::error::HistoryError::EmptyResult)
/// when no entry produced a record.
pub fn analyze_text(text: &str, normalizer: &DateTimeNormalizer) -> Result<HistoryAnalysis> {
    let start = std::time::Instant::now();
    let extractor = EntryExtractor::new(normalizer.clone());
    let report = extractor.extract(text)?;
    let parse_time = start.elapsed().as_secs_f64();

    let dashboard = HistoryAggregator::build_dashboard(&report.records);

    let metadata = AnalysisMetadata {
        generated_at: Utc::now().to_rfc3339(),
        timezone: normalizer.timezone().name().to_string(),
        records_extracted: report.records.len(),
        entries_skipped: report.skipped.len(),
        parse_time_seconds: parse_time,
    };

    info!(
        records = metadata.records_extracted,
        skipped = metadata.entries_skipped,
        "Parsed watch history in {:.3}s",
        parse_time
    );

    Ok(HistoryAnalysis {
        records: report.records,
        dashboard,
        metadata,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

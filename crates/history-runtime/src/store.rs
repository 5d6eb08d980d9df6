//! Application state for one analysis session.
//!
//! [`HistoryStore`] owns the current input text and the result of the last
//! parse. A parse either replaces records and dashboard together or clears
//! them and records a user-facing error; partial results are never exposed.

use std::panic::{self, AssertUnwindSafe};
use std::path::Path;

use history_core::error::{HistoryError, Result};
use history_core::models::{Dashboard, WatchRecord};
use history_core::time_utils::DateTimeNormalizer;
use history_data::analysis::{analyze_text, AnalysisMetadata, HistoryAnalysis};
use history_data::export;

// ── HistoryStore ──────────────────────────────────────────────────────────────

/// Holds the input text, the parsed records and their derived views.
///
/// # Example
/// ```
/// use history_core::time_utils::DateTimeNormalizer;
/// use history_runtime::store::HistoryStore;
///
/// let mut store = HistoryStore::new(DateTimeNormalizer::new("UTC"));
/// store.set_input("Watched **T** **C** Jan 29, 2025, 8:00:26 AM EST");
/// store.analyze().unwrap();
/// assert_eq!(store.records().len(), 1);
/// ```
pub struct HistoryStore {
    normalizer: DateTimeNormalizer,
    input: String,
    records: Vec<WatchRecord>,
    dashboard: Dashboard,
    metadata: Option<AnalysisMetadata>,
    processed: bool,
    busy: bool,
    last_error: Option<String>,
}

impl HistoryStore {
    pub fn new(normalizer: DateTimeNormalizer) -> Self {
        Self {
            normalizer,
            input: String::new(),
            records: Vec::new(),
            dashboard: Dashboard::default(),
            metadata: None,
            processed: false,
            busy: false,
            last_error: None,
        }
    }

    // ── Input ─────────────────────────────────────────────────────────────

    pub fn input(&self) -> &str {
        &self.input
    }

    pub fn set_input(&mut self, text: impl Into<String>) {
        self.input = text.into();
    }

    /// Empty the input text. Parsed results are left as they are.
    pub fn clear_input(&mut self) {
        self.input.clear();
    }

    /// `false` while a parse is running or when the input is blank.
    pub fn can_analyze(&self) -> bool {
        !self.busy && !self.input.trim().is_empty()
    }

    // ── Parsing ───────────────────────────────────────────────────────────

    /// Parse the current input.
    ///
    /// On success records and dashboard are replaced together and the store
    /// is marked processed. On failure both are cleared, `processed` is reset
    /// and [`last_error`](Self::last_error) carries the banner text.
    pub fn analyze(&mut self) -> Result<()> {
        self.last_error = None;
        self.busy = true;
        let outcome = self.run_extraction();
        self.busy = false;

        match outcome {
            Ok(analysis) => {
                tracing::info!(
                    records = analysis.records.len(),
                    skipped = analysis.metadata.entries_skipped,
                    "watch history processed"
                );
                self.records = analysis.records;
                self.dashboard = analysis.dashboard;
                self.metadata = Some(analysis.metadata);
                self.processed = true;
                Ok(())
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to parse watch history");
                self.last_error = Some(e.user_message());
                self.records.clear();
                self.dashboard = Dashboard::default();
                self.metadata = None;
                self.processed = false;
                Err(e)
            }
        }
    }

    /// Replace the input with `text` and parse it.
    pub fn parse(&mut self, text: impl Into<String>) -> Result<()> {
        self.set_input(text);
        self.analyze()
    }

    /// Read `path` and parse its contents.
    ///
    /// A read failure is reported through [`last_error`](Self::last_error)
    /// without touching the current results.
    pub fn reload_from(&mut self, path: &Path) -> Result<()> {
        match std::fs::read_to_string(path) {
            Ok(text) => self.parse(text),
            Err(source) => {
                let err = HistoryError::FileRead {
                    path: path.to_path_buf(),
                    source,
                };
                tracing::warn!(error = %err, "could not reload input");
                self.last_error = Some(err.user_message());
                Err(err)
            }
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    /// Records in extraction order.
    pub fn records(&self) -> &[WatchRecord] {
        &self.records
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    /// Metadata of the last successful parse.
    pub fn metadata(&self) -> Option<&AnalysisMetadata> {
        self.metadata.as_ref()
    }

    pub fn is_processed(&self) -> bool {
        self.processed
    }

    pub fn is_busy(&self) -> bool {
        self.busy
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn normalizer(&self) -> &DateTimeNormalizer {
        &self.normalizer
    }

    /// All records, most recent first.
    pub fn records_by_recency(&self) -> Vec<WatchRecord> {
        export::sort_by_recency(&self.records)
    }

    /// The `limit` most recent records.
    pub fn recent(&self, limit: usize) -> Vec<WatchRecord> {
        let mut sorted = self.records_by_recency();
        sorted.truncate(limit);
        sorted
    }

    // ── Export ────────────────────────────────────────────────────────────

    pub fn to_csv_string(&self) -> Result<String> {
        export::to_csv_string(&self.records)
    }

    pub fn to_json_string(&self) -> Result<String> {
        export::to_json_string(&self.records)
    }

    pub fn export_csv(&self, path: &Path) -> Result<()> {
        export::write_csv(&self.records, path)?;
        tracing::info!(path = %path.display(), "exported CSV");
        Ok(())
    }

    pub fn export_json(&self, path: &Path) -> Result<()> {
        export::write_json(&self.records, path)?;
        tracing::info!(path = %path.display(), "exported JSON");
        Ok(())
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// Run the pipeline, turning a panic into [`HistoryError::Extraction`].
    fn run_extraction(&self) -> Result<HistoryAnalysis> {
        let text = self.input.as_str();
        let normalizer = &self.normalizer;
        panic::catch_unwind(AssertUnwindSafe(|| analyze_text(text, normalizer))).unwrap_or_else(
            |payload| {
                let detail = payload
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| payload.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "unknown panic".to_string());
                tracing::error!(detail = %detail, "extraction panicked");
                Err(HistoryError::Extraction(detail))
            },
        )
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

use std::path::PathBuf;
use thiserror::Error;

/// Banner text shown when no entry in the input could be recognised.
pub const EMPTY_RESULT_MESSAGE: &str = "No valid watch history entries found. Make sure the format matches YouTube history from Google Takeout.";

/// Banner text shown when extraction aborted unexpectedly.
pub const EXTRACTION_FAILED_MESSAGE: &str = "Failed to parse YouTube history data";

/// All errors produced by the watch-history crates.
#[derive(Error, Debug)]
pub enum HistoryError {
    /// Neither entry format produced a single record.
    #[error("{}", EMPTY_RESULT_MESSAGE)]
    EmptyResult,

    /// Extraction stopped early for a reason the entry parsers did not anticipate.
    #[error("Extraction aborted: {0}")]
    Extraction(String),

    /// An input or export file could not be opened or read.
    #[error("Failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A JSON document could not be parsed or produced.
    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// The CSV writer failed.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// A serialized record carried fields that contradict its timestamp.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A configuration value is missing or invalid.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Pass-through for any raw I/O error that does not carry a path.
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// Catch-all for errors from third-party crates via `anyhow`.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl HistoryError {
    /// Short message suitable for the error banner.
    ///
    /// Parse failures map to fixed texts; diagnostic detail stays in the logs.
    pub fn user_message(&self) -> String {
        match self {
            HistoryError::EmptyResult => EMPTY_RESULT_MESSAGE.to_string(),
            HistoryError::Extraction(_) => EXTRACTION_FAILED_MESSAGE.to_string(),
            other => other.to_string(),
        }
    }
}

/// Convenience alias used throughout the watch-history crates.
pub type Result<T> = std::result::Result<T, HistoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_empty_result() {
        let err = HistoryError::EmptyResult;
        assert_eq!(err.to_string(), EMPTY_RESULT_MESSAGE);
        assert_eq!(err.user_message(), EMPTY_RESULT_MESSAGE);
    }

    #[test]
    fn test_extraction_user_message_hides_detail() {
        let err = HistoryError::Extraction("index out of bounds at 17".to_string());
        assert!(err.to_string().contains("index out of bounds"));
        assert_eq!(err.user_message(), EXTRACTION_FAILED_MESSAGE);
    }

    #[test]
    fn test_error_display_file_read() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
        let err = HistoryError::FileRead {
            path: PathBuf::from("/some/watch-history.txt"),
            source: io_err,
        };
        let msg = err.to_string();
        assert!(msg.contains("Failed to read file"));
        assert!(msg.contains("/some/watch-history.txt"));
        assert!(msg.contains("no such file"));
        assert_eq!(err.user_message(), msg);
    }

    #[test]
    fn test_error_display_invalid_record() {
        let err = HistoryError::InvalidRecord("hour 25".to_string());
        assert_eq!(err.to_string(), "Invalid record: hour 25");
    }

    #[test]
    fn test_error_display_config() {
        let err = HistoryError::Config("unknown timezone Mars/Base".to_string());
        assert_eq!(
            err.to_string(),
            "Configuration error: unknown timezone Mars/Base"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
        let err: HistoryError = io_err.into();
        assert!(err.to_string().contains("denied"));
    }

    #[test]
    fn test_error_from_serde_json() {
        let json_err = serde_json::from_str::<serde_json::Value>("{invalid}").unwrap_err();
        let err: HistoryError = json_err.into();
        assert!(err.to_string().contains("Failed to parse JSON"));
    }
}

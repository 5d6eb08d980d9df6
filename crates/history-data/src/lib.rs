//! Data layer for the watch-history analyzer.
//!
//! Extracts watch records from the text of a Takeout history page,
//! aggregates them into dashboard views and handles CSV/JSON export.

pub mod aggregator;
pub mod analysis;
pub mod export;
pub mod extractor;
pub mod sample;

pub use history_core as core;

//! Runtime state layer for the watch-history analyzer.
//!
//! Owns the input text and the latest parse result, and exposes the
//! update contract the presentation layer consumes.

pub mod store;

pub use history_core as core;
pub use history_data as data;

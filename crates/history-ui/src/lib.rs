//! Terminal presentation layer for the watch-history analyzer.
//!
//! Provides themes, the header and tab components, table and bar-chart
//! panels, the interactive dashboard loop and plain-text reports for the
//! non-interactive views.

pub mod app;
pub mod chart_view;
pub mod components;
pub mod report;
pub mod table_view;
pub mod themes;

pub use history_core as core;

//! Core types for the watch-history analyzer.
//!
//! Domain models, the date/time normalizer used by the entry parsers,
//! the shared error type, display formatting and CLI settings.

pub mod error;
pub mod formatting;
pub mod models;
pub mod settings;
pub mod time_utils;

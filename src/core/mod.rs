//! Core processing logic for chatfilter.
//!
//! This module contains:
//! - [`filter`] - The per-line decision: ignore, drop or extract
//! - [`models`] - Per-file and per-batch counters
//! - [`processor`] - Filtering a whole stream or string
//! - [`output`] - Opening the output file in truncate or append mode
//!
//! # Quick Start
//!
//! ```rust
//! use chatfilter::core::{FilterResult, filter_line, filter_text};
//! use chatfilter::config::FilterConfig;
//!
//! assert_eq!(filter_line("u: hi\n", &["[SYSTEM]"], ": "), Some("hi\n"));
//!
//! let (messages, result): (String, FilterResult) =
//!     filter_text("u: hi\n[SYSTEM] restart\n", &FilterConfig::default());
//! assert_eq!(messages, "hi\n");
//! assert_eq!(result.lines_ignored, 1);
//! ```

pub mod filter;
pub mod models;
pub mod output;
pub mod processor;

// Re-export main types for convenience
pub use filter::{LineOutcome, classify_line, filter_line};
pub use models::{BatchSummary, FileFailure, FilterResult};
pub use output::{OutputMode, open_output};
pub use processor::{ScanError, filter_stream, filter_text};

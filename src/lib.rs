//! # Chatfilter
//!
//! A Rust library for extracting chat messages from raw streamed-chat log
//! files.
//!
//! ## Overview
//!
//! Chat recorders write one line per event: a timestamp and username, a
//! separator, then the message. Mixed in are system notices, JSON payloads
//! and join notifications. Chatfilter keeps only the message text:
//!
//! ```text
//! [2024-01-01 12:00:00] user123: hello world      ->  hello world
//! [2024-01-01 12:00:01] [SYSTEM] stream started   ->  (ignored)
//! [2024-01-01 12:00:02] user456:                  ->  (dropped, empty)
//! ```
//!
//! A line containing any ignore pattern is discarded. Otherwise everything
//! after the first separator is kept, unless it is blank.
//!
//! ## Quick Start
//!
//! ```rust
//! use chatfilter::prelude::*;
//!
//! let config = FilterConfig::default();
//! assert_eq!(
//!     config.filter_line("2024-01-01 12:00:00 user123: hello world\n"),
//!     Some("hello world\n")
//! );
//! ```
//!
//! ## Processing Files
//!
//! ```rust,no_run
//! use chatfilter::prelude::*;
//! use std::path::Path;
//!
//! fn main() -> Result<()> {
//!     let runner = BatchRunner::new(FilterConfig::default());
//!
//!     // One file into a fresh output
//!     let result = runner.run_single(Path::new("chat.log"), Path::new("messages.log"))?;
//!     println!("{} messages", result.messages_written);
//!
//!     // A directory into one combined, appended output
//!     let summary = BatchRunner::new(FilterConfig::batch_defaults()).run_directory(
//!         Path::new("chat_samples"),
//!         "chat*.log",
//!         Path::new("outputs/filtered_messages.log"),
//!     )?;
//!     println!("{} files", summary.files_processed);
//!     Ok(())
//! }
//! ```
//!
//! ## Module Structure
//!
//! - [`core`] - Line filter, counters, stream processing
//!   - [`core::filter`] - [`filter_line`](core::filter_line), [`LineOutcome`](core::LineOutcome)
//!   - [`core::models`] - [`FilterResult`](core::FilterResult), [`BatchSummary`](core::BatchSummary)
//!   - [`core::processor`] - [`filter_stream`](core::filter_stream), [`filter_text`](core::filter_text)
//!   - [`core::output`] - [`OutputMode`](core::OutputMode)
//! - [`config`] - [`FilterConfig`](config::FilterConfig), [`BatchConfig`](config::BatchConfig)
//! - [`discovery`] - glob-style input discovery
//! - [`batch`] - [`BatchRunner`](batch::BatchRunner) for single-file and batch runs
//! - `logging` - console + run-log sink (feature `cli`)
//! - `cli` - CLI types and settings file (feature `cli`)
//! - [`error`] - [`ChatfilterError`], [`Result`]
//! - [`prelude`] - Convenient re-exports

pub mod batch;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod core;
pub mod discovery;
pub mod error;
#[cfg(feature = "cli")]
pub mod logging;

// Re-export the main types at the crate root for convenience
pub use error::{ChatfilterError, Result};

/// Convenient re-exports for common usage.
///
/// ```rust
/// use chatfilter::prelude::*;
/// ```
pub mod prelude {
    // Error types
    pub use crate::error::{ChatfilterError, Result};

    // Configuration
    pub use crate::config::{BatchConfig, FilterConfig};

    // Filtering and counters
    pub use crate::core::{
        BatchSummary, FilterResult, LineOutcome, classify_line, filter_line, filter_text,
    };

    // Running over files
    pub use crate::batch::BatchRunner;
    pub use crate::discovery::discover_files;
}

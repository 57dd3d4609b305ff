//! Unified error types for chatfilter.
//!
//! A single [`ChatfilterError`] enum covers every failure the library and the
//! CLI can report. Errors fall into three groups:
//!
//! - **Configuration** ([`MissingInput`](ChatfilterError::MissingInput),
//!   [`InvalidConfig`](ChatfilterError::InvalidConfig)) are detected before
//!   any output is produced and abort the run.
//! - **Output** ([`OutputOpen`](ChatfilterError::OutputOpen)) means the
//!   output target could not be created or opened. Always fatal.
//! - **Per-file** ([`FileRead`](ChatfilterError::FileRead),
//!   [`Unexpected`](ChatfilterError::Unexpected)) are recovered locally in
//!   batch mode and fatal in single-file mode.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// A specialized [`Result`] type for chatfilter operations.
///
/// # Example
///
/// ```rust
/// use chatfilter::error::Result;
/// use chatfilter::core::FilterResult;
///
/// fn my_function() -> Result<FilterResult> {
///     Ok(FilterResult::default())
/// }
/// ```
pub type Result<T> = std::result::Result<T, ChatfilterError>;

/// The error type for all chatfilter operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ChatfilterError {
    /// An I/O error that does not belong to a specific input or output file.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// The input file or directory does not exist.
    #[error("Input {kind} not found: {}", path.display())]
    MissingInput {
        /// The path that was looked up
        path: PathBuf,
        /// `"file"` or `"directory"`
        kind: &'static str,
    },

    /// The filter configuration cannot be used.
    #[error("Invalid configuration: {message}")]
    InvalidConfig {
        /// Description of what's wrong
        message: String,
    },

    /// The settings file could not be read or parsed.
    #[error("Failed to load settings from {}: {message}", path.display())]
    SettingsFile {
        /// The settings file path
        path: PathBuf,
        /// Underlying read or parse error message
        message: String,
    },

    /// The output file could not be created or opened.
    #[error("Cannot open output file {}: {source}", path.display())]
    OutputOpen {
        /// The output path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// An input file could not be opened or read.
    #[error("Failed to read {}: {source}", path.display())]
    FileRead {
        /// The input path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// Any other failure while a file was being processed, such as a
    /// write error on the output.
    #[error("Unexpected error while processing {}: {source}", path.display())]
    Unexpected {
        /// The input path being processed
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },

    /// The glob-style file pattern is malformed.
    #[error("Invalid file pattern '{pattern}': {message}")]
    InvalidPattern {
        /// The pattern as given
        pattern: String,
        /// Parser message
        message: String,
    },

    /// The run-log file could not be opened.
    #[error("Cannot open run log {}: {source}", path.display())]
    LogSetup {
        /// The run-log path
        path: PathBuf,
        /// The underlying I/O error
        #[source]
        source: io::Error,
    },
}

// ============================================================================
// Convenience constructors
// ============================================================================

impl ChatfilterError {
    /// Creates a missing input file error.
    pub fn missing_file(path: impl AsRef<Path>) -> Self {
        ChatfilterError::MissingInput {
            path: path.as_ref().to_path_buf(),
            kind: "file",
        }
    }

    /// Creates a missing input directory error.
    pub fn missing_dir(path: impl AsRef<Path>) -> Self {
        ChatfilterError::MissingInput {
            path: path.as_ref().to_path_buf(),
            kind: "directory",
        }
    }

    /// Creates an invalid configuration error.
    pub fn invalid_config(message: impl Into<String>) -> Self {
        ChatfilterError::InvalidConfig {
            message: message.into(),
        }
    }

    /// Creates an output open error.
    pub fn output_open(path: impl AsRef<Path>, source: io::Error) -> Self {
        ChatfilterError::OutputOpen {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a per-file read error.
    pub fn file_read(path: impl AsRef<Path>, source: io::Error) -> Self {
        ChatfilterError::FileRead {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Creates a per-file unexpected error.
    pub fn unexpected(path: impl AsRef<Path>, source: io::Error) -> Self {
        ChatfilterError::Unexpected {
            path: path.as_ref().to_path_buf(),
            source,
        }
    }

    /// Returns `true` if this error was caused by the run configuration
    /// (missing input, bad separator or pattern, unreadable settings).
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ChatfilterError::MissingInput { .. }
                | ChatfilterError::InvalidConfig { .. }
                | ChatfilterError::SettingsFile { .. }
                | ChatfilterError::InvalidPattern { .. }
        )
    }

    /// Returns `true` if this error concerns a single input file and can be
    /// skipped in batch mode.
    pub fn is_per_file(&self) -> bool {
        matches!(
            self,
            ChatfilterError::FileRead { .. } | ChatfilterError::Unexpected { .. }
        )
    }

    /// Returns `true` if the output target could not be opened.
    pub fn is_output_open(&self) -> bool {
        matches!(self, ChatfilterError::OutputOpen { .. })
    }
}

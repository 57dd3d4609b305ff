//! Configuration types for filtering and batch runs.
//!
//! These are plain serde structs usable from library code; the CLI layers a
//! TOML settings file and command-line flags on top of them.
//!
//! - [`FilterConfig`] - ignore patterns and the metadata/content separator
//! - [`BatchConfig`] - directory, file pattern and combined output of a batch
//!
//! # Example
//!
//! ```rust
//! use chatfilter::config::FilterConfig;
//!
//! let config = FilterConfig::new()
//!     .with_ignore_pattern("[BOT]")
//!     .with_separator(" > ");
//!
//! assert_eq!(config.filter_line("[12:00] alice > hi\n"), Some("hi\n"));
//! assert_eq!(config.filter_line("[12:00] [BOT] > beep\n"), None);
//! ```

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::filter::{LineOutcome, classify_line};
use crate::error::{ChatfilterError, Result};

/// Separator between line metadata (timestamp, username) and the message.
pub const DEFAULT_SEPARATOR: &str = ": ";

/// System lines emitted by the chat recorder: JSON fragments, system notices
/// and anonymous join notifications.
pub const SYSTEM_IGNORE_PATTERNS: &[&str] = &["{", "}", "[SYSTEM]", "***님이 입장했습니다."];

/// Low-content chatter dropped in batch mode in addition to the system set.
pub const NOISE_IGNORE_PATTERNS: &[&str] = &["ㅋㅋㅋ", "??", "...", "ㄷㄷ"];

/// Patterns and separator used by the line filter.
///
/// The default configuration ignores [`SYSTEM_IGNORE_PATTERNS`] and splits on
/// [`DEFAULT_SEPARATOR`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// A line containing any of these substrings is discarded.
    pub ignore_patterns: Vec<String>,

    /// First occurrence splits metadata from message content.
    pub separator: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            ignore_patterns: to_owned_patterns(SYSTEM_IGNORE_PATTERNS),
            separator: DEFAULT_SEPARATOR.to_string(),
        }
    }
}

impl FilterConfig {
    /// Creates a configuration with the system ignore set and default separator.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the batch-mode default: system and noise ignore sets.
    pub fn batch_defaults() -> Self {
        Self::default().with_ignore_patterns(NOISE_IGNORE_PATTERNS.iter().copied())
    }

    /// Creates a configuration with no ignore patterns.
    pub fn without_ignores() -> Self {
        Self {
            ignore_patterns: Vec::new(),
            ..Self::default()
        }
    }

    /// Appends one ignore pattern.
    #[must_use]
    pub fn with_ignore_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.ignore_patterns.push(pattern.into());
        self
    }

    /// Appends several ignore patterns, keeping their order.
    #[must_use]
    pub fn with_ignore_patterns<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignore_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = separator.into();
        self
    }

    /// Checks that the configuration can be applied.
    ///
    /// An empty separator or an empty ignore pattern would match every line,
    /// so both are rejected.
    pub fn validate(&self) -> Result<()> {
        if self.separator.is_empty() {
            return Err(ChatfilterError::invalid_config("separator must not be empty"));
        }
        if let Some(pos) = self.ignore_patterns.iter().position(String::is_empty) {
            return Err(ChatfilterError::invalid_config(format!(
                "ignore pattern #{} is empty",
                pos + 1
            )));
        }
        Ok(())
    }

    /// Classifies a line with this configuration.
    pub fn classify<'a>(&self, line: &'a str) -> LineOutcome<'a> {
        classify_line(line, &self.ignore_patterns, &self.separator)
    }

    /// Extracts the message from a line with this configuration.
    pub fn filter_line<'a>(&self, line: &'a str) -> Option<&'a str> {
        self.classify(line).message()
    }
}

fn to_owned_patterns(patterns: &[&str]) -> Vec<String> {
    patterns.iter().map(|p| (*p).to_string()).collect()
}

/// Settings for directory batch runs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BatchConfig {
    /// Directory scanned for input files (default: `chat_samples`)
    pub input_dir: PathBuf,

    /// Glob-style file name pattern (default: `chat*.log`)
    pub file_pattern: String,

    /// Combined output file (default: `outputs/filtered_messages.log`)
    pub output_path: PathBuf,

    /// Truncate the combined output instead of appending (default: false)
    pub truncate: bool,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            input_dir: PathBuf::from("chat_samples"),
            file_pattern: "chat*.log".to_string(),
            output_path: PathBuf::from("outputs").join("filtered_messages.log"),
            truncate: false,
        }
    }
}

impl BatchConfig {
    /// Creates a configuration with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the input directory.
    #[must_use]
    pub fn with_input_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.input_dir = dir.into();
        self
    }

    /// Sets the file name pattern.
    #[must_use]
    pub fn with_file_pattern(mut self, pattern: impl Into<String>) -> Self {
        self.file_pattern = pattern.into();
        self
    }

    /// Sets the combined output path.
    #[must_use]
    pub fn with_output_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.output_path = path.into();
        self
    }

    /// Sets whether the combined output is truncated before the run.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.truncate = truncate;
        self
    }
}

//! Counters produced by filtering runs.

use std::ops::AddAssign;
use std::path::{Path, PathBuf};

use super::filter::LineOutcome;

/// Per-file line counters.
///
/// Every line read lands in exactly one of the other three counters, see
/// [`is_balanced`](Self::is_balanced).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FilterResult {
    /// Lines read from the input
    pub lines_read: u64,
    /// Lines containing an ignore pattern
    pub lines_ignored: u64,
    /// Lines with no separator or a blank message
    pub lines_dropped: u64,
    /// Messages written to the output
    pub messages_written: u64,
}

impl FilterResult {
    /// Creates zeroed counters.
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one classified line.
    pub fn record(&mut self, outcome: &LineOutcome<'_>) {
        self.lines_read += 1;
        match outcome {
            LineOutcome::Ignored => self.lines_ignored += 1,
            LineOutcome::NoSeparator | LineOutcome::EmptyMessage => self.lines_dropped += 1,
            LineOutcome::Message(_) => self.messages_written += 1,
        }
    }

    /// `lines_read == lines_ignored + lines_dropped + messages_written`
    pub fn is_balanced(&self) -> bool {
        self.lines_read == self.lines_ignored + self.lines_dropped + self.messages_written
    }
}

impl AddAssign for FilterResult {
    fn add_assign(&mut self, other: Self) {
        self.lines_read += other.lines_read;
        self.lines_ignored += other.lines_ignored;
        self.lines_dropped += other.lines_dropped;
        self.messages_written += other.messages_written;
    }
}

/// A batch input that could not be processed to completion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileFailure {
    /// The input file
    pub path: PathBuf,
    /// Error message
    pub reason: String,
    /// Counters accumulated before the failure
    pub partial: FilterResult,
}

/// Aggregated counters for a batch run.
///
/// `totals` includes the partial counters of failed files; `files_processed`
/// counts only files that were read to the end.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Input files handed to the run
    pub files_found: usize,
    /// Input files processed without error
    pub files_processed: usize,
    /// Input files skipped after an error
    pub failures: Vec<FileFailure>,
    /// Summed line counters
    pub totals: FilterResult,
}

impl BatchSummary {
    /// Creates an empty summary for `files_found` inputs.
    pub fn new(files_found: usize) -> Self {
        Self {
            files_found,
            ..Self::default()
        }
    }

    /// Adds the counters of a completed file.
    pub fn record_success(&mut self, result: FilterResult) {
        self.files_processed += 1;
        self.totals += result;
    }

    /// Adds a failed file and its partial counters.
    pub fn record_failure(&mut self, path: &Path, reason: impl Into<String>, partial: FilterResult) {
        self.totals += partial;
        self.failures.push(FileFailure {
            path: path.to_path_buf(),
            reason: reason.into(),
            partial,
        });
    }

    /// Number of files skipped after an error.
    pub fn files_failed(&self) -> usize {
        self.failures.len()
    }

    /// Returns `true` when the run had no input files.
    pub fn is_empty(&self) -> bool {
        self.files_found == 0
    }
}

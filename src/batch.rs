//! Run the line filter over files and report counters.
//!
//! [`BatchRunner`] offers both operating modes:
//!
//! | Mode | Method | Output |
//! |------|--------|--------|
//! | Single file | [`run_single`](BatchRunner::run_single) | fresh file, truncated every run |
//! | Batch | [`run_batch`](BatchRunner::run_batch), [`run_directory`](BatchRunner::run_directory) | one combined file, appended (or truncated with [`with_truncate`](BatchRunner::with_truncate)) |
//!
//! Runs log through the [`Dispatch`] handed to the runner, falling back to the
//! dispatcher current at construction time.
//!
//! # Example
//!
//! ```no_run
//! use chatfilter::batch::BatchRunner;
//! use chatfilter::config::FilterConfig;
//! use std::path::Path;
//!
//! let runner = BatchRunner::new(FilterConfig::batch_defaults());
//! let summary = runner.run_directory(
//!     Path::new("chat_samples"),
//!     "chat*.log",
//!     Path::new("outputs/filtered_messages.log"),
//! )?;
//!
//! println!("{} of {} files processed", summary.files_processed, summary.files_found);
//! # Ok::<(), chatfilter::ChatfilterError>(())
//! ```

use std::fs::File;
use std::io::{BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{Dispatch, debug, error, info, warn};

use crate::config::FilterConfig;
use crate::core::models::{BatchSummary, FilterResult};
use crate::core::output::{OutputMode, open_output};
use crate::core::processor::filter_stream;
use crate::discovery::discover_files;
use crate::error::{ChatfilterError, Result};

const INPUT_BUFFER_SIZE: usize = 64 * 1024;
const RULE: &str = "==============================";

/// Filters chat log files one at a time, sequentially.
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: FilterConfig,
    combined_mode: OutputMode,
    dispatch: Dispatch,
}

impl BatchRunner {
    /// Creates a runner that appends to the combined output and logs through
    /// the current default dispatcher.
    pub fn new(config: FilterConfig) -> Self {
        Self {
            config,
            combined_mode: OutputMode::Append,
            dispatch: tracing::dispatcher::get_default(Dispatch::clone),
        }
    }

    /// Truncates the combined output at the start of each batch run instead
    /// of appending to it.
    #[must_use]
    pub fn with_truncate(mut self, truncate: bool) -> Self {
        self.combined_mode = OutputMode::from_truncate(truncate);
        self
    }

    /// Routes this runner's logs to `dispatch`.
    #[must_use]
    pub fn with_dispatch(mut self, dispatch: Dispatch) -> Self {
        self.dispatch = dispatch;
        self
    }

    /// Returns the filter configuration.
    pub fn config(&self) -> &FilterConfig {
        &self.config
    }

    /// Filters one file into a freshly created output file.
    ///
    /// The input is opened before the output is created, so a missing or
    /// unreadable input leaves any existing output untouched.
    ///
    /// # Errors
    ///
    /// - [`ChatfilterError::MissingInput`] if `input` is not a file
    /// - [`ChatfilterError::InvalidConfig`] if `output` is the same file as `input`
    /// - [`ChatfilterError::FileRead`] if the input cannot be opened or read
    /// - [`ChatfilterError::OutputOpen`] if the output cannot be created
    /// - [`ChatfilterError::Unexpected`] if writing the output fails
    pub fn run_single(&self, input: &Path, output: &Path) -> Result<FilterResult> {
        tracing::dispatcher::with_default(&self.dispatch, || self.single(input, output))
    }

    /// Filters `inputs` into one combined output, in sorted path order.
    ///
    /// A file that fails to open or read is logged, recorded in the summary
    /// and skipped. An input that is the combined output itself is left out.
    /// An empty input list logs a warning and leaves the output untouched.
    ///
    /// # Errors
    ///
    /// Returns [`ChatfilterError::OutputOpen`] if the combined output cannot be
    /// opened; nothing is processed in that case.
    pub fn run_batch(&self, inputs: &[PathBuf], output: &Path) -> Result<BatchSummary> {
        tracing::dispatcher::with_default(&self.dispatch, || self.batch(inputs, output))
    }

    /// Discovers files matching `pattern` in `dir` and runs them as a batch.
    ///
    /// # Errors
    ///
    /// - [`ChatfilterError::MissingInput`] if `dir` is not a directory
    /// - [`ChatfilterError::InvalidPattern`] if `pattern` is malformed
    /// - [`ChatfilterError::OutputOpen`] as for [`run_batch`](Self::run_batch)
    pub fn run_directory(&self, dir: &Path, pattern: &str, output: &Path) -> Result<BatchSummary> {
        tracing::dispatcher::with_default(&self.dispatch, || {
            if !dir.is_dir() {
                return Err(ChatfilterError::missing_dir(dir));
            }

            let files = discover_files(dir, pattern)?;
            if files.is_empty() {
                warn!(
                    "No files matching '{}' found in {}",
                    pattern,
                    dir.display()
                );
            } else {
                info!(
                    "Found {} log files: {}",
                    files.len(),
                    dir.join(pattern).display()
                );
            }

            self.batch(&files, output)
        })
    }

    fn single(&self, input: &Path, output: &Path) -> Result<FilterResult> {
        self.config.validate()?;
        if !input.is_file() {
            return Err(ChatfilterError::missing_file(input));
        }
        // Truncating the output would wipe the input before it is read
        if is_same_file(input, output) {
            return Err(ChatfilterError::invalid_config(format!(
                "output file {} is the input file",
                output.display()
            )));
        }

        info!("Processing log file: {}", input.display());

        let reader = open_input(input)?;
        let mut writer = open_output(output, OutputMode::Truncate)?;

        let mut result = FilterResult::new();
        filter_stream(reader, &mut writer, &self.config, &mut result)
            .map_err(|e| e.into_error(input))?;

        info!("Processing complete.");
        info!("  Lines read: {}", result.lines_read);
        info!("  Lines ignored (matched a pattern): {}", result.lines_ignored);
        info!("  Messages extracted: {}", result.messages_written);
        info!("  Output file: {}", output.display());
        Ok(result)
    }

    fn batch(&self, inputs: &[PathBuf], output: &Path) -> Result<BatchSummary> {
        self.config.validate()?;

        let mut inputs = inputs.to_vec();
        if let Ok(resolved_output) = output.canonicalize() {
            inputs.retain(|path| {
                let is_output = path
                    .canonicalize()
                    .is_ok_and(|resolved| resolved == resolved_output);
                if is_output {
                    debug!("Not reading combined output {} as an input", path.display());
                }
                !is_output
            });
        }
        inputs.sort();

        let mut summary = BatchSummary::new(inputs.len());
        if inputs.is_empty() {
            warn!("No input files; {} left unchanged", output.display());
            return Ok(summary);
        }

        info!("Writing combined output to {}", output.display());
        let mut writer = open_output(output, self.combined_mode)?;

        for path in &inputs {
            let name = display_name(path);
            info!("--- Processing: {} ---", name);

            let mut result = FilterResult::new();
            match self.filter_file(path, &mut writer, &mut result) {
                Ok(()) => {
                    info!(
                        "--- Done: {} (read: {}, ignored: {}, written: {}) ---",
                        name, result.lines_read, result.lines_ignored, result.messages_written
                    );
                    summary.record_success(result);
                }
                Err(err) => {
                    error!("Skipping {}: {}", name, err);
                    debug!(
                        "Partial counters for {}: read {}, ignored {}, written {}",
                        name, result.lines_read, result.lines_ignored, result.messages_written
                    );
                    summary.record_failure(path, err.to_string(), result);
                }
            }
        }

        log_summary(&summary, output);
        Ok(summary)
    }

    fn filter_file<W: Write>(
        &self,
        path: &Path,
        writer: &mut W,
        result: &mut FilterResult,
    ) -> Result<()> {
        debug!("Opening {}", path.display());
        let reader = open_input(path)?;
        filter_stream(reader, writer, &self.config, result).map_err(|e| e.into_error(path))
    }
}

fn open_input(path: &Path) -> Result<BufReader<File>> {
    let file = File::open(path).map_err(|e| ChatfilterError::file_read(path, e))?;
    Ok(BufReader::with_capacity(INPUT_BUFFER_SIZE, file))
}

/// `true` when both paths exist and resolve to the same file.
fn is_same_file(a: &Path, b: &Path) -> bool {
    match (a.canonicalize(), b.canonicalize()) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn log_summary(summary: &BatchSummary, output: &Path) {
    info!("{}", RULE);
    info!("All files processed (summary)");
    info!(
        "  Files processed: {} / {}",
        summary.files_processed, summary.files_found
    );
    if !summary.failures.is_empty() {
        warn!("  Files skipped: {}", summary.files_failed());
    }
    info!("  Total lines read: {}", summary.totals.lines_read);
    info!("  Total lines ignored: {}", summary.totals.lines_ignored);
    info!("  Total messages written: {}", summary.totals.messages_written);
    info!("  Combined output: {}", output.display());
    info!("{}", RULE);
}

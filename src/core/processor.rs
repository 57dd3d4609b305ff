//! Run the line filter over a whole input stream.
//!
//! [`filter_stream`] is what the batch runner uses for files; [`filter_text`]
//! does the same over an in-memory string.

use std::io::{self, BufRead, Write};
use std::path::Path;

use tracing::trace;

use super::filter::LineOutcome;
use super::models::FilterResult;
use crate::config::FilterConfig;
use crate::error::ChatfilterError;

const LINE_CAPACITY: usize = 512;

/// Which side of the scan failed.
#[derive(Debug)]
pub enum ScanError {
    /// Reading the input failed (including invalid UTF-8).
    Read(io::Error),
    /// Writing a message to the output failed.
    Write(io::Error),
}

impl ScanError {
    /// Converts into a per-file error for `path`.
    pub fn into_error(self, path: &Path) -> ChatfilterError {
        match self {
            ScanError::Read(e) => ChatfilterError::file_read(path, e),
            ScanError::Write(e) => ChatfilterError::unexpected(path, e),
        }
    }
}

/// Filters every line of `reader` into `writer`, in order.
///
/// Counters are accumulated into `result` as lines are handled, so they
/// still describe the partial scan when an error is returned. The writer is
/// flushed before returning.
pub fn filter_stream<R, W>(
    mut reader: R,
    writer: &mut W,
    config: &FilterConfig,
    result: &mut FilterResult,
) -> Result<(), ScanError>
where
    R: BufRead,
    W: Write,
{
    let mut line = String::with_capacity(LINE_CAPACITY);

    loop {
        line.clear();
        if reader.read_line(&mut line).map_err(ScanError::Read)? == 0 {
            break;
        }

        let outcome = config.classify(&line);
        match outcome {
            LineOutcome::Message(message) => {
                writer
                    .write_all(message.as_bytes())
                    .map_err(ScanError::Write)?;
            }
            LineOutcome::NoSeparator => {
                trace!(
                    line = result.lines_read + 1,
                    "no separator '{}', line skipped",
                    config.separator
                );
            }
            LineOutcome::Ignored | LineOutcome::EmptyMessage => {}
        }
        result.record(&outcome);
    }

    writer.flush().map_err(ScanError::Write)
}

/// Filters an in-memory log and returns the extracted messages.
///
/// # Examples
///
/// ```
/// use chatfilter::config::FilterConfig;
/// use chatfilter::core::processor::filter_text;
///
/// let log = "12:00 alice: hi\n[SYSTEM] bob joined\n12:01 bob: hey\n";
/// let (messages, result) = filter_text(log, &FilterConfig::default());
///
/// assert_eq!(messages, "hi\nhey\n");
/// assert_eq!(result.lines_ignored, 1);
/// ```
pub fn filter_text(input: &str, config: &FilterConfig) -> (String, FilterResult) {
    let mut output = String::with_capacity(input.len());
    let mut result = FilterResult::new();

    for line in input.split_inclusive('\n') {
        let outcome = config.classify(line);
        if let LineOutcome::Message(message) = outcome {
            output.push_str(message);
        }
        result.record(&outcome);
    }

    (output, result)
}

//! Opening the file that extracted messages are written to.

use std::fs::{File, OpenOptions};
use std::io::BufWriter;
use std::path::Path;

use crate::error::{ChatfilterError, Result};

const OUTPUT_BUFFER_SIZE: usize = 64 * 1024;

/// How an existing output file is treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputMode {
    /// Discard previous content.
    Truncate,
    /// Keep previous content and write after it.
    #[default]
    Append,
}

impl OutputMode {
    /// `Truncate` when `truncate` is set, otherwise `Append`.
    pub fn from_truncate(truncate: bool) -> Self {
        if truncate {
            OutputMode::Truncate
        } else {
            OutputMode::Append
        }
    }
}

/// Opens (creating if needed) a buffered output file.
///
/// # Errors
///
/// Returns [`ChatfilterError::OutputOpen`] if the file cannot be opened.
pub fn open_output(path: &Path, mode: OutputMode) -> Result<BufWriter<File>> {
    let mut options = OpenOptions::new();
    options.create(true);
    match mode {
        OutputMode::Truncate => {
            options.write(true).truncate(true);
        }
        OutputMode::Append => {
            options.append(true);
        }
    }

    let file = options
        .open(path)
        .map_err(|e| ChatfilterError::output_open(path, e))?;
    Ok(BufWriter::with_capacity(OUTPUT_BUFFER_SIZE, file))
}

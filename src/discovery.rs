//! Find batch input files by glob-style name pattern.
//!
//! Results are sorted by path so that a batch always processes files in the
//! same order, whatever order the file system lists them in.

use std::path::{Path, PathBuf};

use glob::{MatchOptions, Pattern};

use crate::error::{ChatfilterError, Result};

const MATCH_OPTIONS: MatchOptions = MatchOptions {
    case_sensitive: true,
    require_literal_separator: true,
    require_literal_leading_dot: true,
};

/// Lists regular files in `dir` whose names match `pattern`.
///
/// The directory part is taken literally; only `pattern` is interpreted as a
/// glob (e.g. `chat*.log`). Directories and unreadable entries are skipped.
///
/// # Examples
///
/// ```no_run
/// use chatfilter::discovery::discover_files;
/// use std::path::Path;
///
/// let files = discover_files(Path::new("chat_samples"), "chat*.log")?;
/// for file in files {
///     println!("{}", file.display());
/// }
/// # Ok::<(), chatfilter::ChatfilterError>(())
/// ```
pub fn discover_files(dir: &Path, pattern: &str) -> Result<Vec<PathBuf>> {
    Pattern::new(pattern).map_err(|e| ChatfilterError::InvalidPattern {
        pattern: pattern.to_string(),
        message: e.to_string(),
    })?;

    let escaped_dir = Pattern::escape(&dir.to_string_lossy());
    let full_pattern = Path::new(&escaped_dir).join(pattern);

    let entries = glob::glob_with(&full_pattern.to_string_lossy(), MATCH_OPTIONS).map_err(|e| {
        ChatfilterError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        }
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| match entry {
            Ok(path) if path.is_file() => Some(path),
            _ => None,
        })
        .collect();

    files.sort();
    Ok(files)
}

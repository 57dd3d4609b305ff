//! Extract message text from a single chat log line.
//!
//! Each line goes through the same three checks, in order:
//!
//! | Step | Check | Outcome |
//! |------|-------|---------|
//! | 1 | Line contains any ignore pattern | [`LineOutcome::Ignored`] |
//! | 2 | Line has no separator | [`LineOutcome::NoSeparator`] |
//! | 3 | Text after the first separator is blank | [`LineOutcome::EmptyMessage`] |
//! | - | Otherwise | [`LineOutcome::Message`] |
//!
//! # Examples
//!
//! ```
//! use chatfilter::core::filter::filter_line;
//!
//! let ignore = ["[SYSTEM]"];
//!
//! assert_eq!(
//!     filter_line("2024-01-01 12:00:00 user123: hello world\n", &ignore, ": "),
//!     Some("hello world\n")
//! );
//!
//! // Only the first separator splits the line
//! assert_eq!(filter_line("user: hello: world\n", &ignore, ": "), Some("hello: world\n"));
//!
//! // Ignore patterns win over the separator
//! assert_eq!(filter_line("[SYSTEM] bot: welcome\n", &ignore, ": "), None);
//! ```
//!
//! # Behavior Notes
//!
//! - Pattern matching is case-sensitive substring search, no normalization
//! - The returned message keeps its original whitespace and line terminator;
//!   only the emptiness check looks at the trimmed text
//! - Blank means Unicode whitespace or the information separators
//!   U+001C..=U+001F

/// Result of running one line through the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineOutcome<'a> {
    /// The line contains an ignore pattern.
    Ignored,
    /// The line has no separator.
    NoSeparator,
    /// The text after the separator is empty or whitespace only.
    EmptyMessage,
    /// The extracted message, borrowed from the input line.
    Message(&'a str),
}

impl<'a> LineOutcome<'a> {
    /// Returns the extracted message, if any.
    pub fn message(self) -> Option<&'a str> {
        match self {
            LineOutcome::Message(message) => Some(message),
            _ => None,
        }
    }
}

/// Classifies a line against the ignore patterns and separator.
///
/// See the [module documentation](self) for the decision order.
pub fn classify_line<'a, S>(line: &'a str, ignore_patterns: &[S], separator: &str) -> LineOutcome<'a>
where
    S: AsRef<str>,
{
    if ignore_patterns
        .iter()
        .any(|pattern| line.contains(pattern.as_ref()))
    {
        return LineOutcome::Ignored;
    }

    let Some(pos) = line.find(separator) else {
        return LineOutcome::NoSeparator;
    };

    let message = &line[pos + separator.len()..];
    if message.chars().all(is_blank) {
        LineOutcome::EmptyMessage
    } else {
        LineOutcome::Message(message)
    }
}

/// Unicode whitespace plus the ASCII information separators U+001C..=U+001F,
/// which chat recorders also treat as blank.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Returns the message text of a line, or `None` if the line is discarded.
///
/// The message is everything after the first occurrence of `separator`,
/// including the trailing newline if the line had one.
pub fn filter_line<'a, S>(line: &'a str, ignore_patterns: &[S], separator: &str) -> Option<&'a str>
where
    S: AsRef<str>,
{
    classify_line(line, ignore_patterns, separator).message()
}

//! Run logging: console output plus a persistent run log.
//!
//! [`build_dispatch`] returns a [`Dispatch`] rather than installing a global
//! subscriber; the CLI passes it to [`BatchRunner::with_dispatch`] and scopes
//! its own messages with [`tracing::dispatcher::with_default`].
//!
//! [`BatchRunner::with_dispatch`]: crate::batch::BatchRunner::with_dispatch

use std::fs::OpenOptions;
use std::path::Path;
use std::sync::Mutex;

use tracing::Dispatch;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use crate::error::{ChatfilterError, Result};

/// Maps `-v` occurrences to a default filter directive.
pub fn level_for(verbosity: u8) -> &'static str {
    match verbosity {
        0 => "info",
        1 => "debug",
        _ => "trace",
    }
}

/// Builds the logging handle for one run.
///
/// Records go to stdout and, when `log_file` is given, are appended to that
/// file without ANSI colors. `RUST_LOG` overrides the verbosity-derived
/// level.
///
/// # Errors
///
/// Returns [`ChatfilterError::LogSetup`] if the log file cannot be opened.
pub fn build_dispatch(log_file: Option<&Path>, verbosity: u8) -> Result<Dispatch> {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_for(verbosity)));

    let file_layer = match log_file {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .map_err(|source| ChatfilterError::LogSetup {
                    path: path.to_path_buf(),
                    source,
                })?;
            Some(
                fmt::layer()
                    .with_ansi(false)
                    .with_target(false)
                    .with_writer(Mutex::new(file)),
            )
        }
        None => None,
    };

    let console_layer = fmt::layer()
        .with_target(verbosity >= 2)
        .with_writer(std::io::stdout);

    let subscriber = tracing_subscriber::registry()
        .with(filter)
        .with(console_layer)
        .with(file_layer);

    Ok(Dispatch::new(subscriber))
}

//! # chatfilter CLI
//!
//! Command-line interface for the chatfilter library.

use std::fs;
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::Parser as ClapParser;
use tracing::{error, info};

use chatfilter::batch::BatchRunner;
use chatfilter::cli::{Args, Plan, Settings};
use chatfilter::logging::build_dispatch;
use chatfilter::{ChatfilterError, Result};

fn main() {
    let args = <Args as ClapParser>::parse();

    if args.print_config {
        match Settings::defaults_toml() {
            Ok(text) => print!("{}", text),
            Err(e) => {
                eprintln!("❌ Error: {}", e);
                process::exit(1);
            }
        }
        return;
    }

    if let Err(e) = run(&args) {
        // Errors after logging is set up have already been logged
        if !e.logged {
            eprintln!("❌ Error: {}", e.error);
        }
        process::exit(1);
    }
}

/// A fatal error and whether it already reached the run log.
struct Failure {
    error: ChatfilterError,
    logged: bool,
}

impl From<ChatfilterError> for Failure {
    fn from(error: ChatfilterError) -> Self {
        Self {
            error,
            logged: false,
        }
    }
}

fn run(args: &Args) -> std::result::Result<(), Failure> {
    let started = Instant::now();

    // Configuration is checked before anything is written
    let settings = args.settings()?;
    let plan = args.plan(&settings);
    let filter_config = args.filter_config(&settings, &plan);
    filter_config.validate()?;

    match &plan {
        Plan::File { input, .. } if !input.is_file() => {
            return Err(ChatfilterError::missing_file(input).into());
        }
        Plan::Batch(batch) if !batch.input_dir.is_dir() => {
            return Err(ChatfilterError::missing_dir(&batch.input_dir).into());
        }
        _ => {}
    }

    let output_path = match &plan {
        Plan::File { output, .. } => output.as_path(),
        Plan::Batch(batch) => batch.output_path.as_path(),
    };
    ensure_parent_dir(output_path)?;

    let run_log = args.run_log_path(&settings, &plan);
    if let Some(path) = &run_log {
        ensure_parent_dir(path)?;
    }
    let dispatch = build_dispatch(run_log.as_deref(), args.verbose)?;

    tracing::dispatcher::with_default(&dispatch, || {
        info!("chatfilter v{} started", env!("CARGO_PKG_VERSION"));
        match &plan {
            Plan::File { input, output } => {
                info!("Mode: single file");
                info!("Input log file: {}", input.display());
                info!("Output file: {}", output.display());
            }
            Plan::Batch(batch) => {
                info!("Mode: batch");
                info!("Input directory: {}", batch.input_dir.display());
                info!("File pattern: {}", batch.file_pattern);
                info!(
                    "Combined output: {} ({})",
                    batch.output_path.display(),
                    if batch.truncate { "truncate" } else { "append" }
                );
            }
        }
        if let Some(path) = &run_log {
            info!("Run log: {}", path.display());
        }
        info!("Separator: {:?}", filter_config.separator);
        info!("Ignore patterns: {:?}", filter_config.ignore_patterns);

        let runner = BatchRunner::new(filter_config).with_dispatch(dispatch.clone());
        let outcome = match &plan {
            Plan::File { input, output } => runner.run_single(input, output).map(|_| ()),
            Plan::Batch(batch) => runner
                .with_truncate(batch.truncate)
                .run_directory(&batch.input_dir, &batch.file_pattern, &batch.output_path)
                .map(|_| ()),
        };

        let result = match outcome {
            Ok(()) => {
                info!("Finished successfully.");
                Ok(())
            }
            Err(error) => {
                error!("Run failed: {}", error);
                Err(Failure {
                    error,
                    logged: true,
                })
            }
        };
        info!("Run ended ({:.2}s)", started.elapsed().as_secs_f64());
        result
    })
}

fn ensure_parent_dir(path: &Path) -> Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}

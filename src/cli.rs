//! Command-line interface definition using clap.
//!
//! This module defines:
//! - [`Args`] - CLI argument structure (for use with clap)
//! - [`Command`] - `file` and `batch` operating modes
//! - [`Settings`] - optional TOML settings file
//!
//! Resolution order for every option is: command-line flag, then settings
//! file, then the built-in default of the selected mode.

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

use crate::config::{BatchConfig, FilterConfig};
use crate::error::{ChatfilterError, Result};

/// Directory for per-file outputs when `--output` is not given.
pub const DEFAULT_OUTPUT_DIR: &str = "outputs";

/// Directory for run logs.
pub const DEFAULT_LOG_DIR: &str = "logs";

/// Run-log file name in batch mode.
pub const BATCH_RUN_LOG: &str = "batch_filter_run.log";

/// Extract chat messages from streamed-chat log files, dropping system
/// lines and the timestamp/username prefix.
#[derive(Parser, Debug, Clone)]
#[command(name = "chatfilter")]
#[command(version, about, long_about = None)]
#[command(after_help = "EXAMPLES:
    chatfilter file chat_samples/chat.log
    chatfilter file chat.log -o messages.log --ignore '[BOT]'
    chatfilter batch
    chatfilter batch chat_samples -p 'chat*.log' -o all.log --truncate
    chatfilter --config chatfilter.toml batch --append
    chatfilter --config chatfilter.toml batch")]
pub struct Args {
    #[command(subcommand)]
    pub command: Option<Command>,

    /// Additional ignore pattern (repeatable)
    #[arg(short, long = "ignore", value_name = "PATTERN", global = true)]
    pub ignore: Vec<String>,

    /// Do not use the built-in ignore patterns
    #[arg(long, global = true)]
    pub no_default_ignores: bool,

    /// Separator between metadata and message (default ": ")
    #[arg(short, long, value_name = "SEP", global = true)]
    pub separator: Option<String>,

    /// TOML settings file
    #[arg(short, long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    /// Directory for run logs
    #[arg(long, value_name = "DIR", global = true)]
    pub log_dir: Option<PathBuf>,

    /// Log to the console only
    #[arg(long, global = true)]
    pub no_log_file: bool,

    /// More log output (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Print the default settings file and exit
    #[arg(long)]
    pub print_config: bool,
}

/// Operating mode.
#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Filter one log file into a fresh output file
    #[command(visible_alias = "f")]
    File {
        /// Path to input log file
        input: PathBuf,

        /// Path to output file (default: outputs/<name>_messages_only.<ext>)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Filter every matching file in a directory into one combined file
    #[command(visible_alias = "b")]
    Batch {
        /// Directory containing log files (default: chat_samples)
        input_dir: Option<PathBuf>,

        /// Glob-style file name pattern (default: chat*.log)
        #[arg(short, long)]
        pattern: Option<String>,

        /// Combined output file (default: outputs/filtered_messages.log)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Overwrite the combined output instead of appending
        #[arg(long, conflicts_with = "append")]
        truncate: bool,

        /// Append to the combined output, overriding `truncate` in settings
        #[arg(long)]
        append: bool,
    },
}

/// Contents of a TOML settings file.
///
/// ```toml
/// log_dir = "logs"
///
/// [filter]
/// separator = ": "
/// ignore_patterns = ["{", "}", "[SYSTEM]"]
///
/// [batch]
/// input_dir = "chat_samples"
/// file_pattern = "chat*.log"
/// output_path = "outputs/filtered_messages.log"
/// truncate = false
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Run-log directory
    pub log_dir: Option<PathBuf>,

    /// Overrides for the mode's default filter
    pub filter: FilterSettings,

    /// Batch-mode settings
    pub batch: BatchConfig,
}

impl Settings {
    /// Loads settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content =
            std::fs::read_to_string(path).map_err(|e| ChatfilterError::SettingsFile {
                path: path.to_path_buf(),
                message: e.to_string(),
            })?;
        Self::from_toml(&content).map_err(|message| ChatfilterError::SettingsFile {
            path: path.to_path_buf(),
            message,
        })
    }

    /// Parses settings from a TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, String> {
        toml::from_str(content).map_err(|e| e.to_string())
    }

    /// Settings file with every default written out.
    pub fn defaults_toml() -> Result<String> {
        let settings = Settings {
            log_dir: Some(PathBuf::from(DEFAULT_LOG_DIR)),
            filter: FilterConfig::batch_defaults().into(),
            batch: BatchConfig::default(),
        };
        toml::to_string_pretty(&settings)
            .map_err(|e| ChatfilterError::invalid_config(format!("cannot serialize settings: {e}")))
    }
}

/// The `[filter]` table. Each field given replaces that field of the mode's
/// default filter; omitted fields keep the mode default, so batch mode keeps
/// its noise patterns unless `ignore_patterns` is set.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterSettings {
    /// Full ignore-pattern list
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ignore_patterns: Option<Vec<String>>,

    /// Metadata/content separator
    #[serde(skip_serializing_if = "Option::is_none")]
    pub separator: Option<String>,
}

impl FilterSettings {
    /// Applies the fields that are set on top of `config`.
    pub fn apply(&self, config: &mut FilterConfig) {
        if let Some(patterns) = &self.ignore_patterns {
            config.ignore_patterns.clone_from(patterns);
        }
        if let Some(separator) = &self.separator {
            config.separator.clone_from(separator);
        }
    }
}

impl From<FilterConfig> for FilterSettings {
    fn from(config: FilterConfig) -> Self {
        Self {
            ignore_patterns: Some(config.ignore_patterns),
            separator: Some(config.separator),
        }
    }
}

/// A fully resolved run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Plan {
    /// Single-file mode
    File {
        input: PathBuf,
        output: PathBuf,
    },
    /// Directory batch mode
    Batch(BatchConfig),
}

impl Args {
    /// Loads the settings file named by `--config`, or defaults.
    pub fn settings(&self) -> Result<Settings> {
        match &self.config {
            Some(path) => Settings::from_file(path),
            None => Ok(Settings::default()),
        }
    }

    /// Resolves the operating mode; no subcommand means `batch` with defaults.
    pub fn plan(&self, settings: &Settings) -> Plan {
        match &self.command {
            Some(Command::File { input, output }) => Plan::File {
                input: input.clone(),
                output: output
                    .clone()
                    .unwrap_or_else(|| default_single_output(input, Path::new(DEFAULT_OUTPUT_DIR))),
            },
            Some(Command::Batch {
                input_dir,
                pattern,
                output,
                truncate,
                append,
            }) => {
                let mut batch = settings.batch.clone();
                if let Some(dir) = input_dir {
                    batch.input_dir.clone_from(dir);
                }
                if let Some(pattern) = pattern {
                    batch.file_pattern.clone_from(pattern);
                }
                if let Some(output) = output {
                    batch.output_path.clone_from(output);
                }
                if *truncate {
                    batch.truncate = true;
                } else if *append {
                    batch.truncate = false;
                }
                Plan::Batch(batch)
            }
            None => Plan::Batch(settings.batch.clone()),
        }
    }

    /// Builds the filter configuration for `plan`.
    pub fn filter_config(&self, settings: &Settings, plan: &Plan) -> FilterConfig {
        let mut config = match plan {
            Plan::File { .. } => FilterConfig::default(),
            Plan::Batch(_) => FilterConfig::batch_defaults(),
        };
        settings.filter.apply(&mut config);

        if self.no_default_ignores {
            config.ignore_patterns.clear();
        }
        config.ignore_patterns.extend(self.ignore.iter().cloned());
        if let Some(separator) = &self.separator {
            config.separator.clone_from(separator);
        }
        config
    }

    /// Run-log file for `plan`, or `None` with `--no-log-file`.
    pub fn run_log_path(&self, settings: &Settings, plan: &Plan) -> Option<PathBuf> {
        if self.no_log_file {
            return None;
        }
        let dir = self
            .log_dir
            .clone()
            .or_else(|| settings.log_dir.clone())
            .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_DIR));

        let name = match plan {
            Plan::File { input, .. } => format!("{}_filter_run.log", file_stem(input)),
            Plan::Batch(_) => BATCH_RUN_LOG.to_string(),
        };
        Some(dir.join(name))
    }
}

/// `<output_dir>/<stem>_messages_only<.ext>` for a single input file.
///
/// ```rust
/// use chatfilter::cli::default_single_output;
/// use std::path::{Path, PathBuf};
///
/// assert_eq!(
///     default_single_output(Path::new("chat_samples/chat copy 2.log"), Path::new("outputs")),
///     PathBuf::from("outputs/chat copy 2_messages_only.log")
/// );
/// ```
pub fn default_single_output(input: &Path, output_dir: &Path) -> PathBuf {
    let name = match input.extension() {
        Some(ext) => format!("{}_messages_only.{}", file_stem(input), ext.to_string_lossy()),
        None => format!("{}_messages_only", file_stem(input)),
    };
    output_dir.join(name)
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "input".to_string())
}

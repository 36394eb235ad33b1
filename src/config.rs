//! Command line configuration

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

/// How log lines are written to standard error.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub(crate) enum LogStyle {
    /// One human-readable line per event
    #[default]
    Text,

    /// One JSON object per event
    Json,
}

/// Till configuration
#[derive(Debug, Parser)]
#[command(name = "till", about = "Prints a taxed receipt for every configured cart", long_about = None)]
pub(crate) struct Config {
    /// Directory holding `prices.json`, `locations.json` and `carts.json`
    #[arg(short, long, env = "TILL_DATA_DIR", default_value = ".")]
    pub(crate) data_dir: PathBuf,

    /// Log filter directive, such as `warn` or `till=debug`
    #[arg(short = 'l', long = "log-level", env = "RUST_LOG", default_value = "warn")]
    pub(crate) log_filter: String,

    /// Log line style
    #[arg(long = "log-format", env = "TILL_LOG_FORMAT", value_enum, default_value_t)]
    pub(crate) log_style: LogStyle,
}

impl Config {
    /// Load configuration from environment and CLI arguments
    ///
    /// # Errors
    ///
    /// Returns an error if configuration cannot be parsed
    pub(crate) fn load() -> Result<Self, clap::Error> {
        Self::try_parse()
    }
}

//! Logging subscriber initialisation.
//!
//! Diagnostics go to standard error so that standard output carries only receipts.

use std::io;

use thiserror::Error;
use tracing_subscriber::{
    EnvFilter, Registry,
    filter::ParseError,
    layer::{Layer, SubscriberExt},
    util::{SubscriberInitExt, TryInitError},
};

use crate::config::{Config, LogStyle};

/// Errors raised while setting up logging.
#[derive(Debug, Error)]
pub(crate) enum ObservabilityError {
    /// The log filter directive did not parse
    #[error("invalid log filter {directive:?}")]
    Filter {
        /// Directive as given
        directive: String,

        /// Parser error
        source: ParseError,
    },

    /// A global subscriber was already installed
    #[error("failed to install tracing subscriber")]
    Install(#[from] TryInitError),
}

/// Installs the global tracing subscriber.
pub(crate) fn init(config: &Config) -> Result<(), ObservabilityError> {
    let filter =
        EnvFilter::try_new(&config.log_filter).map_err(|source| ObservabilityError::Filter {
            directive: config.log_filter.clone(),
            source,
        })?;

    let layer = tracing_subscriber::fmt::layer()
        .with_target(true)
        .with_writer(io::stderr);

    match config.log_style {
        LogStyle::Text => install(layer.compact(), filter),
        LogStyle::Json => install(layer.json().with_current_span(true), filter),
    }
}

fn install<L>(layer: L, filter: EnvFilter) -> Result<(), ObservabilityError>
where
    L: Layer<Registry> + Send + Sync + 'static,
{
    tracing_subscriber::registry().with(layer).with(filter).try_init()?;

    Ok(())
}

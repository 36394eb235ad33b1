//! Till command line entry point

use std::{io, process::ExitCode};

use tracing::{error, info};

use till::{driver, store::ConfigStore};

use crate::config::Config;

mod config;
mod observability;

fn main() -> ExitCode {
    let config = match Config::load() {
        Ok(config) => config,
        Err(err) => {
            let code = if err.use_stderr() {
                ExitCode::FAILURE
            } else {
                ExitCode::SUCCESS
            };

            _ = err.print();

            return code;
        }
    };

    if let Err(err) = observability::init(&config) {
        #[expect(
            clippy::print_stderr,
            reason = "logging not initialized, must use eprintln for setup errors"
        )]
        {
            eprintln!("{err}");
        }

        return ExitCode::FAILURE;
    }

    info!(data_dir = %config.data_dir.display(), "loading configuration");

    let store = match ConfigStore::load(&config.data_dir) {
        Ok(store) => store,
        Err(err) => {
            error!(error = %err, "failed to load configuration");

            return ExitCode::FAILURE;
        }
    };

    if let Err(err) = driver::run(&store, io::stdout().lock()) {
        error!(error = %err, "failed to write receipts");

        return ExitCode::FAILURE;
    }

    ExitCode::SUCCESS
}

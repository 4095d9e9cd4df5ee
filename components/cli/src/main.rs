//! xmlaudit entry point.

use std::{process, str::FromStr};

use clap::Parser;
use log::{debug, error, info, LevelFilter};

use xmlaudit_cli::Args;

fn main() {
    let args = Args::parse();

    let log_level = LevelFilter::from_str(&args.log_level).unwrap_or_else(|_| {
        eprintln!(
            "Invalid log level: {}. Using 'warn' instead.",
            args.log_level
        );
        LevelFilter::Warn
    });

    env_logger::Builder::from_env(env_logger::Env::default())
        .filter_level(log_level)
        .init();

    info!(log_level:?; "Starting xmlaudit");
    debug!(args:?; "Parsed arguments");

    match xmlaudit_cli::run(&args) {
        Ok(true) => info!("Completed successfully"),
        Ok(false) => process::exit(1),
        Err(err) => {
            error!("{err}");
            process::exit(2);
        }
    }
}

//! Command-line argument definitions.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Finds malformed XML markup in archival description text
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Command,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    pub log_level: String,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Audit exported records and write a CSV report
    Scan {
        /// Records as JSON lines
        records: PathBuf,

        /// Path to configuration file (JSON)
        #[arg(short, long)]
        config: PathBuf,

        /// Path to the CSV report, overriding `output_csv` of the configuration
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Check records on all cores
        #[arg(long)]
        parallel: bool,
    },

    /// Validate a single fragment
    Check {
        /// Fragment to check; read from stdin when omitted
        text: Option<String>,

        /// Path to configuration file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

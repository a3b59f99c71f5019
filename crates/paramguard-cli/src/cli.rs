//! CLI argument definitions using clap.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};

/// Paramguard: telemetry parameter validation and schema drift detection
#[derive(Parser)]
#[command(name = "paramguard")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output (debug logging)
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Compare two snapshots and report new and removed parameters
    Drift {
        /// Snapshot of the old app version (CSV/TSV)
        #[arg(value_name = "OLD")]
        old: PathBuf,

        /// Snapshot of the new app version (CSV/TSV)
        #[arg(value_name = "NEW")]
        new: PathBuf,

        /// Old app version
        #[arg(long)]
        old_version: String,

        /// New app version
        #[arg(long)]
        new_version: String,

        /// First day of the compared window (YYYY-MM-DD)
        #[arg(long)]
        start_date: NaiveDate,

        /// Last day of the compared window (YYYY-MM-DD)
        #[arg(long)]
        end_date: NaiveDate,

        /// Parameters to ignore, comma separated
        #[arg(long, value_delimiter = ',')]
        exclude: Vec<String>,

        /// Drift settings file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Directory for the JSON and text reports
        #[arg(short, long, default_value = ".")]
        output_dir: PathBuf,

        /// Skip warehouse confirmation; every change is reported unverified
        #[arg(long)]
        no_confirm: bool,
    },

    /// Validate every registered column of a snapshot
    Audit {
        /// Path to the snapshot (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },

    /// Validate a single parameter value
    Check {
        /// Parameter name
        parameter: String,

        /// Raw value
        value: String,

        /// Read numbers, booleans and null as typed values instead of text
        #[arg(long)]
        typed: bool,
    },

    /// List registered parameters and their rules
    Rules {
        /// Only show parameters containing this text
        #[arg(long)]
        filter: Option<String>,
    },
}

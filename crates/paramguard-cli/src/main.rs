//! Paramguard CLI - telemetry parameter validation and drift detection.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Drift {
            old,
            new,
            old_version,
            new_version,
            start_date,
            end_date,
            exclude,
            config,
            output_dir,
            no_confirm,
        } => commands::drift::run(commands::drift::DriftArgs {
            old,
            new,
            old_version,
            new_version,
            start_date,
            end_date,
            exclude,
            config,
            output_dir,
            no_confirm,
            verbose: cli.verbose,
        }),

        Commands::Audit { file, json } => commands::audit::run(file, json, cli.verbose),

        Commands::Check {
            parameter,
            value,
            typed,
        } => commands::check::run(parameter, value, typed),

        Commands::Rules { filter } => commands::rules::run(filter),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

//! Audit command - validate every registered column of a snapshot.

use std::path::PathBuf;

use colored::Colorize;
use paramguard::{SnapshotLoader, ValidatorRegistry};

pub fn run(file: PathBuf, json_output: bool, verbose: bool) -> Result<(), Box<dyn std::error::Error>> {
    if !file.exists() {
        return Err(format!("File not found: {}", file.display()).into());
    }

    let snapshot = SnapshotLoader::new().load(&file)?;
    let report = ValidatorRegistry::global().audit(&snapshot);

    if json_output {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "{} {}",
        "Audit of".cyan().bold(),
        file.display().to_string().white()
    );
    println!(
        "{} rows, {} columns ({} with rules)",
        report.rows, report.columns, report.checked_parameters
    );
    println!();

    if report.is_clean() {
        println!(
            "{}",
            format!("All {} checked values are valid.", report.total_checked).green()
        );
    } else {
        println!(
            "Found {} invalid values in {} parameters",
            report.total_invalid.to_string().red().bold(),
            report.violations.len().to_string().white().bold()
        );
        println!();
        for violation in &report.violations {
            println!(
                "  {:30} {:>6} / {:<6} ({:.1}%)  {}",
                violation.parameter.white(),
                violation.invalid.to_string().red(),
                violation.checked,
                violation.invalid_percentage,
                violation.rule.dimmed()
            );
            if verbose {
                println!(
                    "      e.g. {}  (rows {})",
                    violation.sample_invalid.join(", "),
                    violation
                        .sample_rows
                        .iter()
                        .map(|r| (r + 1).to_string())
                        .collect::<Vec<_>>()
                        .join(", ")
                );
            }
        }
    }

    if verbose && !report.unregistered_columns.is_empty() {
        println!();
        println!(
            "{} {}",
            "No rule for:".yellow(),
            report.unregistered_columns.join(", ")
        );
    }

    Ok(())
}

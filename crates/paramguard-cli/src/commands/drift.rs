//! Drift command - compare two snapshots and report parameter changes.

use std::path::PathBuf;
use std::sync::Arc;

use chrono::NaiveDate;
use colored::Colorize;
use paramguard::{
    BigQueryClient, DriftConfig, DriftRequest, ParameterChange, SchemaDriftAnalyzer,
    SnapshotLoader,
};

pub struct DriftArgs {
    pub old: PathBuf,
    pub new: PathBuf,
    pub old_version: String,
    pub new_version: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub exclude: Vec<String>,
    pub config: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub no_confirm: bool,
    pub verbose: bool,
}

pub fn run(args: DriftArgs) -> Result<(), Box<dyn std::error::Error>> {
    for path in [&args.old, &args.new] {
        if !path.exists() {
            return Err(format!("File not found: {}", path.display()).into());
        }
    }

    let mut config = match &args.config {
        Some(path) => DriftConfig::load(path)?,
        None => DriftConfig::default(),
    };
    if args.no_confirm {
        config = config.without_confirmation();
    }

    println!(
        "{} {} → {}",
        "Comparing".cyan().bold(),
        args.old_version.white(),
        args.new_version.white()
    );

    let loader = SnapshotLoader::new();
    let old = loader.load(&args.old)?;
    let new = loader.load(&args.new)?;

    if args.verbose {
        println!(
            "  old: {} rows, {} columns",
            old.row_count(),
            old.column_count()
        );
        println!(
            "  new: {} rows, {} columns",
            new.row_count(),
            new.column_count()
        );
    }

    let confirm = config.confirm;
    let mut analyzer = SchemaDriftAnalyzer::new(config);
    if confirm {
        let client = BigQueryClient::from_env()?;
        analyzer = analyzer.with_warehouse(Arc::new(client));
    }

    let request = DriftRequest::new(
        args.old_version,
        args.new_version,
        args.start_date,
        args.end_date,
    )
    .excluding(args.exclude);

    let result = analyzer.analyze_parameter_changes(&old, &new, &request)?;
    let (json_path, text_path) = result.save_reports(&args.output_dir)?;

    println!();
    print_section("New parameters", &result.new_parameters);
    print_section("Removed parameters", &result.removed_parameters);

    let summary = &result.summary;
    if summary.rejected_by_confirmation > 0 {
        println!(
            "{} candidate(s) rejected: data exists in the full dataset",
            summary.rejected_by_confirmation.to_string().yellow()
        );
    }
    if summary.unverified > 0 {
        println!(
            "{} change(s) could not be confirmed",
            summary.unverified.to_string().yellow()
        );
    }

    println!();
    println!(
        "{} {}",
        "Saved to".green().bold(),
        json_path.display().to_string().white()
    );
    println!(
        "{} {}",
        "Saved to".green().bold(),
        text_path.display().to_string().white()
    );

    if !result.has_changes() {
        println!("{}", "No parameter changes detected.".green());
    }

    Ok(())
}

fn print_section(title: &str, changes: &[ParameterChange]) {
    println!(
        "{} ({})",
        title.yellow().bold(),
        changes.len().to_string().white().bold()
    );
    for change in changes {
        let marker = if change.validated {
            "✓".green()
        } else {
            "?".yellow()
        };
        println!(
            "  {} {:30} {:24} {}",
            marker,
            change.parameter,
            change.validation_type.dimmed(),
            change.example_values.join(", ")
        );
    }
    println!();
}

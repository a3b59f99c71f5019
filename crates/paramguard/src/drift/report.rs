//! JSON and text output for drift results.

use std::fmt::Write as _;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::error::{ParamguardError, Result};

use super::analyzer::{DriftAnalysisResult, ParameterChange};

fn io_error(path: &Path) -> impl FnOnce(std::io::Error) -> ParamguardError + '_ {
    move |source| ParamguardError::Io {
        path: path.to_path_buf(),
        source,
    }
}

fn ensure_parent(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent).map_err(io_error(parent))?;
        }
    }
    Ok(())
}

impl DriftAnalysisResult {
    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write as pretty JSON, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        ensure_parent(path)?;
        let file = File::create(path).map_err(io_error(path))?;
        let mut writer = BufWriter::new(file);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.flush().map_err(io_error(path))?;
        Ok(())
    }

    /// Read a result written by [`DriftAnalysisResult::save`].
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(io_error(path))?;
        Ok(serde_json::from_reader(BufReader::new(file))?)
    }

    /// Base file name: `parameter_changes_<old>_to_<new>`.
    pub fn report_stem(&self) -> String {
        format!(
            "parameter_changes_{}_to_{}",
            file_safe(&self.old_version),
            file_safe(&self.new_version)
        )
    }

    /// Write the JSON and text reports into `dir`; returns both paths.
    pub fn save_reports(&self, dir: impl AsRef<Path>) -> Result<(PathBuf, PathBuf)> {
        let dir = dir.as_ref();
        let stem = self.report_stem();
        let json_path = dir.join(format!("{}.json", stem));
        let text_path = dir.join(format!("{}.txt", stem));

        self.save(&json_path)?;
        fs::write(&text_path, render_text_report(self)).map_err(io_error(&text_path))?;
        Ok((json_path, text_path))
    }
}

fn file_safe(version: &str) -> String {
    version
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// Render the human-readable report.
pub fn render_text_report(result: &DriftAnalysisResult) -> String {
    let mut out = String::new();

    let title = format!(
        "Parameter Changes: {} → {}",
        result.old_version, result.new_version
    );
    let _ = writeln!(out, "{}", title);
    let _ = writeln!(out, "{}", "=".repeat(title.chars().count()));
    let _ = writeln!(
        out,
        "Date range: {} to {}",
        result.start_date, result.end_date
    );
    let _ = writeln!(
        out,
        "Analyzed:   {}",
        result.analysis_date.format("%Y-%m-%d %H:%M:%S")
    );
    if result.excluded_parameters.is_empty() {
        let _ = writeln!(out, "Excluded:   none");
    } else {
        let _ = writeln!(out, "Excluded:   {}", result.excluded_parameters.join(", "));
    }
    out.push('\n');

    render_section(&mut out, "New Parameters", &result.new_parameters);
    out.push('\n');
    render_section(&mut out, "Removed Parameters", &result.removed_parameters);
    out.push('\n');

    let summary = &result.summary;
    let _ = writeln!(
        out,
        "Columns: {} old, {} new, {} common",
        summary.old_columns, summary.new_columns, summary.common_columns
    );
    let _ = writeln!(
        out,
        "Candidates: {} ({} rejected by confirmation, {} unverified)",
        summary.candidates, summary.rejected_by_confirmation, summary.unverified
    );

    out
}

fn render_section(out: &mut String, heading: &str, changes: &[ParameterChange]) {
    let heading = format!("{} ({})", heading, changes.len());
    let _ = writeln!(out, "{}", heading);
    let _ = writeln!(out, "{}", "-".repeat(heading.chars().count()));

    if changes.is_empty() {
        let _ = writeln!(out, "  (none)");
        return;
    }

    for change in changes {
        let marker = if change.validated { "✅" } else { "⚠️" };
        let _ = writeln!(out, "{} {}", marker, change.parameter);
        let _ = writeln!(out, "   Type:    {}", change.validation_type);
        let _ = writeln!(out, "   Samples: {}", change.example_values.join(", "));
        let _ = writeln!(out, "   Reason:  {}", change.reason);
    }
}

//! Schema drift analysis between two app versions.

use std::collections::BTreeSet;
use std::sync::Arc;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::clock::{Clock, SystemClock};
use crate::config::DriftConfig;
use crate::error::{ParamguardError, Result};
use crate::input::Snapshot;
use crate::warehouse::WarehouseClient;

use super::candidates::{Candidate, ChangeKind, ColumnDiff, Direction, find_candidates};
use super::confirmation::{Confirmation, ConfirmationGate};
use super::inference::validation_type_label;
use super::nullness::sample_values;

/// Versions and window being compared.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriftRequest {
    pub old_version: String,
    pub new_version: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Extra parameters to ignore, on top of the configured exclusions.
    pub exclude: BTreeSet<String>,
}

impl DriftRequest {
    pub fn new(
        old_version: impl Into<String>,
        new_version: impl Into<String>,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Self {
        Self {
            old_version: old_version.into(),
            new_version: new_version.into(),
            start_date,
            end_date,
            exclude: BTreeSet::new(),
        }
    }

    pub fn excluding<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(names.into_iter().map(Into::into));
        self
    }
}

/// One reported parameter change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterChange {
    pub parameter: String,
    pub kind: ChangeKind,
    pub reason: String,
    /// Up to `sample_limit` example values, or a placeholder.
    pub example_values: Vec<String>,
    pub validation_type: String,
    /// True only when the warehouse confirmed the change.
    pub validated: bool,
}

/// Counts describing one run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DriftSummary {
    pub old_columns: usize,
    pub new_columns: usize,
    pub common_columns: usize,
    pub candidates: usize,
    pub rejected_by_confirmation: usize,
    pub unverified: usize,
}

/// Result of comparing two snapshots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriftAnalysisResult {
    pub analysis_date: NaiveDateTime,
    pub old_version: String,
    pub new_version: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Sorted.
    pub excluded_parameters: Vec<String>,
    pub new_parameters: Vec<ParameterChange>,
    pub removed_parameters: Vec<ParameterChange>,
    pub summary: DriftSummary,
}

impl DriftAnalysisResult {
    pub fn has_changes(&self) -> bool {
        !self.new_parameters.is_empty() || !self.removed_parameters.is_empty()
    }
}

/// Compares two snapshots and reports which parameters genuinely appeared
/// or disappeared.
pub struct SchemaDriftAnalyzer {
    config: DriftConfig,
    gate: Option<ConfirmationGate>,
    clock: Arc<dyn Clock>,
}

impl SchemaDriftAnalyzer {
    /// Analyzer with no warehouse: every change is reported unverified.
    pub fn new(config: DriftConfig) -> Self {
        Self {
            config,
            gate: None,
            clock: Arc::new(SystemClock),
        }
    }

    /// Confirm candidates against `client`.
    pub fn with_warehouse(mut self, client: Arc<dyn WarehouseClient>) -> Self {
        self.gate = Some(ConfirmationGate::new(client, &self.config));
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &DriftConfig {
        &self.config
    }

    /// Compare `old` and `new` and confirm every candidate change.
    ///
    /// Confirmation failures never abort the run: the affected parameter is
    /// kept with `validated: false`.
    pub fn analyze_parameter_changes(
        &self,
        old: &Snapshot,
        new: &Snapshot,
        request: &DriftRequest,
    ) -> Result<DriftAnalysisResult> {
        if request.start_date > request.end_date {
            return Err(ParamguardError::Config(format!(
                "start date {} is after end date {}",
                request.start_date, request.end_date
            )));
        }

        info!(
            old_version = %request.old_version,
            new_version = %request.new_version,
            "analyzing parameter changes"
        );

        let exclude: BTreeSet<String> = self
            .config
            .exclude
            .iter()
            .chain(request.exclude.iter())
            .cloned()
            .collect();

        let diff = ColumnDiff::new(old, new, &exclude);
        let (added, removed) = find_candidates(old, new, &diff);

        let mut summary = DriftSummary {
            old_columns: diff.old.len(),
            new_columns: diff.new.len(),
            common_columns: diff.common().count(),
            candidates: added.len() + removed.len(),
            ..DriftSummary::default()
        };
        info!(
            added = added.len(),
            removed = removed.len(),
            "found candidate changes"
        );

        let gate = if self.config.confirm {
            self.gate.as_ref()
        } else {
            None
        };
        if summary.candidates > 0 {
            match gate {
                Some(gate) => info!(
                    client = gate.client_name(),
                    candidates = summary.candidates,
                    "confirming candidates against warehouse"
                ),
                None if self.config.confirm => warn!(
                    "no warehouse client configured; parameter changes are reported unverified"
                ),
                None => info!("confirmation disabled; parameter changes are reported unverified"),
            }
        }

        let new_parameters = self.resolve(added, new, request, gate, &mut summary);
        let removed_parameters = self.resolve(removed, old, request, gate, &mut summary);

        info!(
            new = new_parameters.len(),
            removed = removed_parameters.len(),
            rejected = summary.rejected_by_confirmation,
            unverified = summary.unverified,
            "parameter change analysis complete"
        );

        Ok(DriftAnalysisResult {
            analysis_date: self.clock.now(),
            old_version: request.old_version.clone(),
            new_version: request.new_version.clone(),
            start_date: request.start_date,
            end_date: request.end_date,
            excluded_parameters: exclude.into_iter().collect(),
            new_parameters,
            removed_parameters,
            summary,
        })
    }

    /// Describe and confirm candidates. `source` is the snapshot in which
    /// the candidates carry data.
    fn resolve(
        &self,
        candidates: Vec<Candidate>,
        source: &Snapshot,
        request: &DriftRequest,
        gate: Option<&ConfirmationGate>,
        summary: &mut DriftSummary,
    ) -> Vec<ParameterChange> {
        let mut changes = Vec::with_capacity(candidates.len());

        for candidate in candidates {
            let column = source.column(&candidate.parameter).unwrap_or_default();
            let example_values = sample_values(column, self.config.sample_limit);
            let validation_type = validation_type_label(column);

            // A new parameter must be absent from the old version's full data,
            // a removed one from the new version's.
            let other_version = match candidate.direction {
                Direction::Added => &request.old_version,
                Direction::Removed => &request.new_version,
            };

            debug!(
                parameter = %candidate.parameter,
                reason = candidate.reason(),
                validation_type = %validation_type,
                "candidate change"
            );

            let validated = match gate {
                Some(gate) => match gate.confirm(
                    &candidate.parameter,
                    other_version,
                    request.start_date,
                    request.end_date,
                ) {
                    Confirmation::Confirmed => true,
                    Confirmation::Rejected => {
                        warn!(
                            parameter = %candidate.parameter,
                            version = %other_version,
                            "parameter has data in the full dataset; dropping candidate"
                        );
                        summary.rejected_by_confirmation += 1;
                        continue;
                    }
                    Confirmation::Unverified(reason) => {
                        warn!(
                            parameter = %candidate.parameter,
                            error = %reason,
                            "could not confirm parameter change; keeping it unverified"
                        );
                        summary.unverified += 1;
                        false
                    }
                },
                None => {
                    summary.unverified += 1;
                    false
                }
            };

            changes.push(ParameterChange {
                reason: candidate.reason().to_string(),
                parameter: candidate.parameter,
                kind: candidate.kind,
                example_values,
                validation_type,
                validated,
            });
        }

        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::value::Value;
    use crate::warehouse::MockWarehouse;

    fn request() -> DriftRequest {
        DriftRequest::new(
            "1.0",
            "1.1",
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        )
    }

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(
            NaiveDate::from_ymd_opt(2024, 5, 8)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
        ))
    }

    fn snapshots() -> (Snapshot, Snapshot) {
        let old = Snapshot::from_columns(vec![
            ("a", vec![Value::from("1"), Value::from("2")]),
            ("b", vec![Value::from("0"), Value::from("0")]),
        ])
        .unwrap();
        let new = Snapshot::from_columns(vec![
            ("b", vec![Value::Int(5), Value::from("5")]),
            ("c", vec![Value::from("x"), Value::from("y")]),
        ])
        .unwrap();
        (old, new)
    }

    #[test]
    fn test_rejects_inverted_dates() {
        let (old, new) = snapshots();
        let mut request = request();
        std::mem::swap(&mut request.start_date, &mut request.end_date);

        let result = SchemaDriftAnalyzer::new(DriftConfig::default())
            .analyze_parameter_changes(&old, &new, &request);
        assert!(matches!(result, Err(ParamguardError::Config(_))));
    }

    #[test]
    fn test_no_client_reports_unverified() {
        let (old, new) = snapshots();
        let result = SchemaDriftAnalyzer::new(DriftConfig::default())
            .with_clock(clock())
            .analyze_parameter_changes(&old, &new, &request())
            .unwrap();

        let names: Vec<&str> = result
            .new_parameters
            .iter()
            .map(|p| p.parameter.as_str())
            .collect();
        assert_eq!(names, vec!["b", "c"]);
        assert!(result.new_parameters.iter().all(|p| !p.validated));
        assert_eq!(result.removed_parameters.len(), 1);
        assert_eq!(result.removed_parameters[0].parameter, "a");
        assert_eq!(result.summary.unverified, 3);
        assert_eq!(result.summary.common_columns, 1);
    }

    #[test]
    fn test_disabled_confirmation_skips_queries() {
        let (old, new) = snapshots();
        let mock = Arc::new(MockWarehouse::new());
        let result = SchemaDriftAnalyzer::new(DriftConfig::default().without_confirmation())
            .with_warehouse(mock.clone())
            .analyze_parameter_changes(&old, &new, &request())
            .unwrap();

        assert!(mock.requests().is_empty());
        assert_eq!(result.summary.unverified, 3);
    }

    #[test]
    fn test_removed_candidate_checks_new_version() {
        let (old, new) = snapshots();
        let mock = Arc::new(MockWarehouse::new().with_existing("a", "1.1"));
        let result = SchemaDriftAnalyzer::new(DriftConfig::default())
            .with_warehouse(mock.clone())
            .analyze_parameter_changes(&old, &new, &request())
            .unwrap();

        assert!(result.removed_parameters.is_empty());
        assert_eq!(result.summary.rejected_by_confirmation, 1);
        assert_eq!(mock.requests().len(), 3);
    }

    #[test]
    fn test_examples_and_labels() {
        let (old, new) = snapshots();
        let result = SchemaDriftAnalyzer::new(DriftConfig::default())
            .analyze_parameter_changes(&old, &new, &request())
            .unwrap();

        let c = &result.new_parameters[1];
        assert_eq!(c.example_values, vec!["x", "y"]);
        assert_eq!(c.validation_type, "Categorical (2 values)");
        assert_eq!(c.kind, ChangeKind::NotPresent);

        let b = &result.new_parameters[0];
        assert_eq!(b.example_values, vec!["5"]);
        assert_eq!(b.kind, ChangeKind::BecamePopulated);
    }
}

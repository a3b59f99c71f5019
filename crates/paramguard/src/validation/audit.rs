//! Batch validation of a loaded snapshot.

use serde::{Deserialize, Serialize};

use crate::input::Snapshot;

use super::registry::ValidatorRegistry;

const MAX_SAMPLE_VALUES: usize = 3;
const MAX_SAMPLE_ROWS: usize = 5;

/// Violations found in one registered column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParameterAudit {
    pub parameter: String,
    /// Label of the rule applied.
    pub rule: String,
    /// Non-null values checked.
    pub checked: usize,
    pub invalid: usize,
    pub invalid_percentage: f64,
    /// Up to three distinct offending values, as text.
    pub sample_invalid: Vec<String>,
    /// Zero-based row indices of the first offending rows.
    pub sample_rows: Vec<usize>,
}

/// Result of checking every registered column of a snapshot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditReport {
    pub rows: usize,
    pub columns: usize,
    /// Columns that had a registered rule.
    pub checked_parameters: usize,
    /// Columns with no registered rule, sorted.
    pub unregistered_columns: Vec<String>,
    /// Columns with at least one invalid value, worst first.
    pub violations: Vec<ParameterAudit>,
    pub total_checked: usize,
    pub total_invalid: usize,
}

impl AuditReport {
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }
}

impl ValidatorRegistry {
    /// Check every value of every registered column in `snapshot`.
    ///
    /// Null cells are skipped: absence is not a format violation.
    pub fn audit(&self, snapshot: &Snapshot) -> AuditReport {
        let mut unregistered_columns = Vec::new();
        let mut violations = Vec::new();
        let mut checked_parameters = 0;
        let mut total_checked = 0;
        let mut total_invalid = 0;

        for (name, values) in snapshot.columns() {
            let Some(validator) = self.get(name) else {
                unregistered_columns.push(name.to_string());
                continue;
            };
            checked_parameters += 1;

            let mut checked = 0;
            let mut invalid = 0;
            let mut sample_invalid: Vec<String> = Vec::new();
            let mut sample_rows = Vec::new();

            for (row, value) in values.iter().enumerate() {
                if value.is_null() {
                    continue;
                }
                checked += 1;
                if validator.validate(value) {
                    continue;
                }
                invalid += 1;
                if sample_rows.len() < MAX_SAMPLE_ROWS {
                    sample_rows.push(row);
                }
                let text = value.to_text();
                if sample_invalid.len() < MAX_SAMPLE_VALUES && !sample_invalid.contains(&text) {
                    sample_invalid.push(text);
                }
            }

            total_checked += checked;
            total_invalid += invalid;

            if invalid > 0 {
                violations.push(ParameterAudit {
                    parameter: name.to_string(),
                    rule: validator.label(),
                    checked,
                    invalid,
                    invalid_percentage: invalid as f64 / checked as f64 * 100.0,
                    sample_invalid,
                    sample_rows,
                });
            }
        }

        unregistered_columns.sort();
        violations.sort_by(|a, b| {
            b.invalid
                .cmp(&a.invalid)
                .then_with(|| a.parameter.cmp(&b.parameter))
        });

        AuditReport {
            rows: snapshot.row_count(),
            columns: snapshot.column_count(),
            checked_parameters,
            unregistered_columns,
            violations,
            total_checked,
            total_invalid,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::{BooleanValidator, RangeValidator, RuleSet};
    use crate::value::Value;

    fn registry() -> ValidatorRegistry {
        let mut rules = RuleSet::new();
        rules
            .add("coins", RangeValidator::at_least(0.0))
            .add("is_payer", BooleanValidator::new());
        ValidatorRegistry::from_rules(rules).unwrap()
    }

    #[test]
    fn test_audit_counts_violations() {
        let snapshot = Snapshot::from_columns(vec![
            (
                "coins",
                vec![
                    Value::Int(5),
                    Value::Int(-1),
                    Value::Null,
                    Value::Int(-1),
                    Value::Int(-7),
                ],
            ),
            (
                "is_payer",
                vec![
                    Value::from("true"),
                    Value::from("0"),
                    Value::Bool(false),
                    Value::from("1"),
                    Value::Null,
                ],
            ),
            (
                "free_text",
                vec![
                    Value::from("a"),
                    Value::from("b"),
                    Value::from("c"),
                    Value::from("d"),
                    Value::from("e"),
                ],
            ),
        ])
        .unwrap();

        let report = registry().audit(&snapshot);

        assert_eq!(report.rows, 5);
        assert_eq!(report.checked_parameters, 2);
        assert_eq!(report.unregistered_columns, vec!["free_text".to_string()]);
        assert_eq!(report.total_checked, 8);
        assert_eq!(report.total_invalid, 3);

        assert_eq!(report.violations.len(), 1);
        let coins = &report.violations[0];
        assert_eq!(coins.parameter, "coins");
        assert_eq!(coins.checked, 4);
        assert_eq!(coins.invalid, 3);
        assert_eq!(coins.sample_rows, vec![1, 3, 4]);
        assert_eq!(coins.sample_invalid, vec!["-1".to_string(), "-7".to_string()]);
        assert!((coins.invalid_percentage - 75.0).abs() < 1e-9);
    }

    #[test]
    fn test_clean_snapshot() {
        let snapshot =
            Snapshot::from_columns(vec![("coins", vec![Value::Int(1), Value::Int(2)])]).unwrap();
        let report = registry().audit(&snapshot);
        assert!(report.is_clean());
        assert_eq!(report.total_checked, 2);
    }
}

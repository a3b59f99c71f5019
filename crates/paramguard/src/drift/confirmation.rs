//! Remote existence checks for drift candidates.
//!
//! A local snapshot is a sample; a column can look empty there and still
//! carry data in the full dataset. Before a candidate is reported, the
//! gate asks the warehouse whether the parameter has any non-null value
//! for the version it is supposedly absent from.

use std::sync::Arc;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::config::DriftConfig;
use crate::error::{ParamguardError, Result};
use crate::warehouse::{ParameterType, QueryRequest, WarehouseClient};

static IDENTIFIER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"));

static QUALIFIED_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[A-Za-z0-9_\-]+(\.[A-Za-z0-9_\-]+){0,2}$").expect("valid regex")
});

/// Outcome of one existence check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Confirmation {
    /// No data found: the change is real.
    Confirmed,
    /// Data exists in the full dataset: the candidate was a sampling artifact.
    Rejected,
    /// The check could not run.
    Unverified(String),
}

/// Ensure `name` is safe to splice into SQL as a column name.
pub fn check_identifier(name: &str) -> Result<&str> {
    if IDENTIFIER.is_match(name) {
        Ok(name)
    } else {
        Err(ParamguardError::InvalidIdentifier(name.to_string()))
    }
}

/// Issues existence queries against a warehouse.
pub struct ConfirmationGate {
    client: Arc<dyn WarehouseClient>,
    table: String,
    version_column: String,
    date_column: String,
}

impl ConfirmationGate {
    pub fn new(client: Arc<dyn WarehouseClient>, config: &DriftConfig) -> Self {
        Self {
            client,
            table: config.table.clone(),
            version_column: config.version_column.clone(),
            date_column: config.date_column.clone(),
        }
    }

    pub fn client_name(&self) -> &str {
        self.client.name()
    }

    /// Build the existence query for `parameter` in `version`.
    ///
    /// Versions that parse as numbers are compared numerically; anything
    /// else is compared against the column cast to a string.
    pub fn build_query(
        &self,
        parameter: &str,
        version: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Result<QueryRequest> {
        let column = check_identifier(parameter)?;
        let version_column = check_identifier(&self.version_column)?;
        let date_column = check_identifier(&self.date_column)?;
        if !QUALIFIED_TABLE.is_match(&self.table) {
            return Err(ParamguardError::InvalidIdentifier(self.table.clone()));
        }

        let (version_filter, version_type) = if version.trim().parse::<f64>().is_ok() {
            (format!("{} = @version", version_column), ParameterType::Float64)
        } else {
            (
                format!("CAST({} AS STRING) = @version", version_column),
                ParameterType::String,
            )
        };

        let sql = format!(
            "SELECT DISTINCT {column} FROM `{table}` \
             WHERE {date_column} BETWEEN @start_date AND @end_date \
             AND {version_filter} \
             AND {column} IS NOT NULL \
             LIMIT 1",
            column = column,
            table = self.table,
            date_column = date_column,
            version_filter = version_filter,
        );

        Ok(QueryRequest::new(sql)
            .bind("start_date", ParameterType::Date, start_date.to_string())
            .bind("end_date", ParameterType::Date, end_date.to_string())
            .bind("version", version_type, version.trim()))
    }

    /// Check whether `parameter` carries data for `version`.
    ///
    /// Any row back means it does, and the candidate is rejected.
    pub fn confirm(
        &self,
        parameter: &str,
        version: &str,
        start_date: NaiveDate,
        end_date: NaiveDate,
    ) -> Confirmation {
        let request = match self.build_query(parameter, version, start_date, end_date) {
            Ok(request) => request,
            Err(e) => return Confirmation::Unverified(e.to_string()),
        };

        debug!(parameter, version, "confirming candidate");
        match self.client.query(&request) {
            Ok(rows) if rows.is_empty() => Confirmation::Confirmed,
            Ok(_) => Confirmation::Rejected,
            Err(e) => Confirmation::Unverified(e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::MockWarehouse;

    fn dates() -> (NaiveDate, NaiveDate) {
        (
            NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
            NaiveDate::from_ymd_opt(2024, 5, 7).unwrap(),
        )
    }

    fn gate(mock: MockWarehouse) -> ConfirmationGate {
        ConfirmationGate::new(Arc::new(mock), &DriftConfig::default())
    }

    #[test]
    fn test_identifier_check() {
        assert!(check_identifier("dice_balance").is_ok());
        assert!(check_identifier("_x1").is_ok());
        assert!(check_identifier("1abc").is_err());
        assert!(check_identifier("a; DROP TABLE events").is_err());
        assert!(check_identifier("").is_err());
    }

    #[test]
    fn test_numeric_version_filter() {
        let (start, end) = dates();
        let request = gate(MockWarehouse::new())
            .build_query("dice_balance", "2.15", start, end)
            .unwrap();

        assert!(request.sql.starts_with("SELECT DISTINCT dice_balance FROM `analytics.events`"));
        assert!(request.sql.contains("event_date BETWEEN @start_date AND @end_date"));
        assert!(request.sql.contains("AND app_version = @version"));
        assert!(request.sql.contains("dice_balance IS NOT NULL"));
        assert!(request.sql.ends_with("LIMIT 1"));

        let version = request.parameter("version").unwrap();
        assert_eq!(version.param_type, ParameterType::Float64);
        assert_eq!(request.parameter("start_date").unwrap().value, "2024-05-01");
        assert_eq!(request.parameter("end_date").unwrap().value, "2024-05-07");
    }

    #[test]
    fn test_string_version_filter() {
        let (start, end) = dates();
        let request = gate(MockWarehouse::new())
            .build_query("dice_balance", "2.15.3", start, end)
            .unwrap();

        assert!(request.sql.contains("CAST(app_version AS STRING) = @version"));
        assert_eq!(
            request.parameter("version").unwrap().param_type,
            ParameterType::String
        );
    }

    #[test]
    fn test_outcomes() {
        let (start, end) = dates();
        let gate = gate(
            MockWarehouse::new()
                .with_existing("shields_count", "1.0.0")
                .with_failure("net_worth"),
        );

        assert_eq!(
            gate.confirm("shields_count", "1.0.0", start, end),
            Confirmation::Rejected
        );
        assert_eq!(
            gate.confirm("shields_count", "1.1.0", start, end),
            Confirmation::Confirmed
        );
        assert!(matches!(
            gate.confirm("net_worth", "1.0.0", start, end),
            Confirmation::Unverified(_)
        ));
    }

    #[test]
    fn test_bad_identifier_is_unverified_without_query() {
        let (start, end) = dates();
        let mock = Arc::new(MockWarehouse::new());
        let gate = ConfirmationGate::new(mock.clone(), &DriftConfig::default());

        let outcome = gate.confirm("bad name", "1.0.0", start, end);
        assert!(matches!(outcome, Confirmation::Unverified(_)));
        assert!(mock.requests().is_empty());
    }
}

//! In-memory warehouse for tests and dry runs.

use std::collections::HashSet;
use std::sync::Mutex;

use serde_json::json;

use crate::error::{ParamguardError, Result};

use super::{QueryRequest, Row, WarehouseClient};

/// Deterministic warehouse that answers existence queries from a fixed
/// table of `(parameter, version)` pairs.
///
/// The queried parameter is read from the `SELECT DISTINCT <column>` clause
/// and the version from the `@version` binding. Every request is recorded.
#[derive(Debug, Default)]
pub struct MockWarehouse {
    existing: HashSet<(String, String)>,
    failing: HashSet<String>,
    requests: Mutex<Vec<QueryRequest>>,
}

impl MockWarehouse {
    /// A warehouse in which nothing exists.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark `parameter` as carrying data for `version`.
    pub fn with_existing(mut self, parameter: impl Into<String>, version: impl Into<String>) -> Self {
        self.existing.insert((parameter.into(), version.into()));
        self
    }

    /// Make every query for `parameter` fail.
    pub fn with_failure(mut self, parameter: impl Into<String>) -> Self {
        self.failing.insert(parameter.into());
        self
    }

    /// Requests issued so far, in order.
    pub fn requests(&self) -> Vec<QueryRequest> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn queried_column(sql: &str) -> Option<&str> {
        let rest = sql.trim_start().strip_prefix("SELECT DISTINCT ")?;
        rest.split_whitespace().next()
    }
}

impl WarehouseClient for MockWarehouse {
    fn name(&self) -> &str {
        "mock"
    }

    fn query(&self, request: &QueryRequest) -> Result<Vec<Row>> {
        self.requests
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(request.clone());

        let column = Self::queried_column(&request.sql)
            .ok_or_else(|| ParamguardError::Warehouse(format!("unsupported query: {}", request.sql)))?;

        if self.failing.contains(column) {
            return Err(ParamguardError::Warehouse(format!(
                "permission denied reading column '{}'",
                column
            )));
        }

        let version = request
            .parameter("version")
            .map(|p| p.value.as_str())
            .unwrap_or_default();

        if self.existing.contains(&(column.to_string(), version.to_string())) {
            let mut row = Row::new();
            row.insert(column.to_string(), json!("present"));
            Ok(vec![row])
        } else {
            Ok(Vec::new())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::ParameterType;

    fn existence_query(column: &str, version: &str) -> QueryRequest {
        QueryRequest::new(format!(
            "SELECT DISTINCT {} FROM events WHERE version = @version LIMIT 1",
            column
        ))
        .bind("version", ParameterType::String, version)
    }

    #[test]
    fn test_existing_pair_returns_row() {
        let mock = MockWarehouse::new().with_existing("dice_balance", "1.2.0");

        assert_eq!(mock.query(&existence_query("dice_balance", "1.2.0")).unwrap().len(), 1);
        assert!(mock.query(&existence_query("dice_balance", "1.3.0")).unwrap().is_empty());
        assert!(mock.query(&existence_query("cash_balance", "1.2.0")).unwrap().is_empty());
        assert_eq!(mock.requests().len(), 3);
    }

    #[test]
    fn test_failing_parameter() {
        let mock = MockWarehouse::new().with_failure("net_worth");
        let result = mock.query(&existence_query("net_worth", "1.2.0"));
        assert!(matches!(result, Err(ParamguardError::Warehouse(_))));
        assert_eq!(mock.requests().len(), 1);
    }

    #[test]
    fn test_unrecognised_sql() {
        let mock = MockWarehouse::new();
        assert!(mock.query(&QueryRequest::new("DELETE FROM events")).is_err());
    }
}

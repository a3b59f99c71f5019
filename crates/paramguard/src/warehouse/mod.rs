//! Warehouse query clients.
//!
//! The drift analyzer only ever needs one capability from the warehouse:
//! run a parameterized `SELECT` and hand back the rows.

mod bigquery;
mod mock;

pub use bigquery::{BigQueryClient, BigQueryConfig};
pub use mock::MockWarehouse;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// One result row, column name → JSON value, in select order.
pub type Row = IndexMap<String, serde_json::Value>;

/// SQL type of a named query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ParameterType {
    String,
    Float64,
    Date,
}

impl ParameterType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParameterType::String => "STRING",
            ParameterType::Float64 => "FLOAT64",
            ParameterType::Date => "DATE",
        }
    }
}

/// A named (`@name`) query parameter. Values travel as strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryParameter {
    pub name: String,
    #[serde(rename = "type")]
    pub param_type: ParameterType,
    pub value: String,
}

/// A read-only SQL query with named parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryRequest {
    pub sql: String,
    #[serde(default)]
    pub parameters: Vec<QueryParameter>,
}

impl QueryRequest {
    pub fn new(sql: impl Into<String>) -> Self {
        Self {
            sql: sql.into(),
            parameters: Vec::new(),
        }
    }

    /// Bind `@name`.
    pub fn bind(
        mut self,
        name: impl Into<String>,
        param_type: ParameterType,
        value: impl Into<String>,
    ) -> Self {
        self.parameters.push(QueryParameter {
            name: name.into(),
            param_type,
            value: value.into(),
        });
        self
    }

    /// Bound parameter by name.
    pub fn parameter(&self, name: &str) -> Option<&QueryParameter> {
        self.parameters.iter().find(|p| p.name == name)
    }
}

/// Executes queries against the authoritative dataset.
pub trait WarehouseClient: Send + Sync {
    /// Short name for logs.
    fn name(&self) -> &str;

    /// Run `request` and return every result row.
    fn query(&self, request: &QueryRequest) -> Result<Vec<Row>>;
}

//! BigQuery REST client (`jobs.query`).

use std::time::Duration;

use reqwest::blocking::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::Deserialize;
use serde_json::json;
use tracing::debug;

use crate::error::{ParamguardError, Result};

use super::{QueryRequest, Row, WarehouseClient};

/// Default BigQuery REST endpoint.
const DEFAULT_ENDPOINT: &str = "https://bigquery.googleapis.com/bigquery/v2";

const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Connection settings for [`BigQueryClient`].
#[derive(Debug, Clone)]
pub struct BigQueryConfig {
    /// GCP project that runs (and is billed for) the query.
    pub project: String,
    /// OAuth2 bearer token.
    pub token: String,
    pub endpoint: String,
    pub timeout: Duration,
    /// Dataset location, e.g. `US`.
    pub location: Option<String>,
}

impl BigQueryConfig {
    pub fn new(project: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            project: project.into(),
            token: token.into(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            location: None,
        }
    }

    /// Read settings from the environment.
    ///
    /// `PARAMGUARD_BQ_PROJECT` and a token are required; the token comes
    /// from `PARAMGUARD_BQ_TOKEN`, falling back to `GOOGLE_OAUTH_ACCESS_TOKEN`.
    /// `PARAMGUARD_BQ_ENDPOINT` and `PARAMGUARD_BQ_LOCATION` are optional.
    pub fn from_env() -> Result<Self> {
        let project = std::env::var("PARAMGUARD_BQ_PROJECT").map_err(|_| {
            ParamguardError::Config("PARAMGUARD_BQ_PROJECT environment variable not set".to_string())
        })?;
        let token = std::env::var("PARAMGUARD_BQ_TOKEN")
            .or_else(|_| std::env::var("GOOGLE_OAUTH_ACCESS_TOKEN"))
            .map_err(|_| {
                ParamguardError::Config(
                    "PARAMGUARD_BQ_TOKEN or GOOGLE_OAUTH_ACCESS_TOKEN environment variable not set"
                        .to_string(),
                )
            })?;

        let mut config = Self::new(project, token);
        if let Ok(endpoint) = std::env::var("PARAMGUARD_BQ_ENDPOINT") {
            config.endpoint = endpoint.trim_end_matches('/').to_string();
        }
        config.location = std::env::var("PARAMGUARD_BQ_LOCATION").ok();
        Ok(config)
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Synchronous BigQuery client.
pub struct BigQueryClient {
    client: Client,
    config: BigQueryConfig,
}

impl BigQueryClient {
    pub fn new(config: BigQueryConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ParamguardError::Config(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self { client, config })
    }

    /// Client configured from the environment.
    pub fn from_env() -> Result<Self> {
        Self::new(BigQueryConfig::from_env()?)
    }

    fn url(&self) -> String {
        format!("{}/projects/{}/queries", self.config.endpoint, self.config.project)
    }

    fn build_headers(&self) -> Result<HeaderMap> {
        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        let bearer = HeaderValue::from_str(&format!("Bearer {}", self.config.token))
            .map_err(|_| ParamguardError::Config("Access token contains invalid characters".to_string()))?;
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    fn request_body(&self, request: &QueryRequest) -> serde_json::Value {
        let parameters: Vec<serde_json::Value> = request
            .parameters
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "parameterType": { "type": p.param_type.as_str() },
                    "parameterValue": { "value": p.value }
                })
            })
            .collect();

        let mut body = json!({
            "query": request.sql,
            "useLegacySql": false,
            "parameterMode": "NAMED",
            "queryParameters": parameters,
            "timeoutMs": self.config.timeout.as_millis() as u64,
        });
        if let Some(location) = &self.config.location {
            body["location"] = json!(location);
        }
        body
    }
}

impl WarehouseClient for BigQueryClient {
    fn name(&self) -> &str {
        "bigquery"
    }

    fn query(&self, request: &QueryRequest) -> Result<Vec<Row>> {
        debug!(project = %self.config.project, sql = %request.sql, "running warehouse query");

        let response = self
            .client
            .post(self.url())
            .headers(self.build_headers()?)
            .json(&self.request_body(request))
            .send()?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().unwrap_or_default();
            return Err(ParamguardError::Warehouse(format!(
                "BigQuery error ({}): {}",
                status, error_text
            )));
        }

        let body: QueryResponse = response
            .json()
            .map_err(|e| ParamguardError::Warehouse(format!("Failed to parse BigQuery response: {}", e)))?;
        decode_rows(body)
    }
}

// =============================================================================
// RESPONSE DECODING
// =============================================================================

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct QueryResponse {
    #[serde(default)]
    job_complete: bool,
    schema: Option<TableSchema>,
    #[serde(default)]
    rows: Vec<TableRow>,
}

#[derive(Debug, Deserialize)]
struct TableSchema {
    #[serde(default)]
    fields: Vec<TableField>,
}

#[derive(Debug, Deserialize)]
struct TableField {
    name: String,
}

#[derive(Debug, Deserialize)]
struct TableRow {
    #[serde(default)]
    f: Vec<TableCell>,
}

#[derive(Debug, Deserialize)]
struct TableCell {
    #[serde(default)]
    v: serde_json::Value,
}

fn decode_rows(response: QueryResponse) -> Result<Vec<Row>> {
    if !response.job_complete {
        return Err(ParamguardError::Warehouse(
            "BigQuery job did not complete within the timeout".to_string(),
        ));
    }

    let fields: Vec<String> = response
        .schema
        .map(|s| s.fields.into_iter().map(|f| f.name).collect())
        .unwrap_or_default();

    response
        .rows
        .into_iter()
        .map(|row| {
            if row.f.len() != fields.len() {
                return Err(ParamguardError::Warehouse(format!(
                    "BigQuery row has {} cells but schema has {} fields",
                    row.f.len(),
                    fields.len()
                )));
            }
            Ok(fields
                .iter()
                .cloned()
                .zip(row.f.into_iter().map(|cell| cell.v))
                .collect())
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::warehouse::ParameterType;

    fn parse(body: serde_json::Value) -> QueryResponse {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_decode_rows() {
        let response = parse(json!({
            "kind": "bigquery#queryResponse",
            "jobComplete": true,
            "schema": { "fields": [
                { "name": "dice_balance", "type": "INTEGER" },
                { "name": "platform", "type": "STRING" }
            ]},
            "rows": [
                { "f": [ { "v": "40" }, { "v": "iOS" } ] },
                { "f": [ { "v": null }, { "v": "Android" } ] }
            ],
            "totalRows": "2"
        }));

        let rows = decode_rows(response).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0]["dice_balance"], json!("40"));
        assert_eq!(rows[1]["dice_balance"], serde_json::Value::Null);
        assert_eq!(rows[1].keys().collect::<Vec<_>>(), vec!["dice_balance", "platform"]);
    }

    #[test]
    fn test_empty_result() {
        let response = parse(json!({
            "jobComplete": true,
            "schema": { "fields": [ { "name": "x", "type": "STRING" } ] },
            "totalRows": "0"
        }));
        assert!(decode_rows(response).unwrap().is_empty());
    }

    #[test]
    fn test_incomplete_job_is_error() {
        let response = parse(json!({ "jobComplete": false }));
        assert!(matches!(decode_rows(response), Err(ParamguardError::Warehouse(_))));
    }

    #[test]
    fn test_request_body_uses_named_parameters() {
        let client = BigQueryClient::new(BigQueryConfig::new("game-analytics", "token")).unwrap();
        let request = QueryRequest::new("SELECT 1 WHERE v = @version").bind(
            "version",
            ParameterType::Float64,
            "2.5",
        );

        let body = client.request_body(&request);
        assert_eq!(body["useLegacySql"], json!(false));
        assert_eq!(body["parameterMode"], json!("NAMED"));
        assert_eq!(body["queryParameters"][0]["name"], json!("version"));
        assert_eq!(body["queryParameters"][0]["parameterType"]["type"], json!("FLOAT64"));
        assert_eq!(body["queryParameters"][0]["parameterValue"]["value"], json!("2.5"));
        assert_eq!(
            client.url(),
            "https://bigquery.googleapis.com/bigquery/v2/projects/game-analytics/queries"
        );
    }
}

//! Graph store access via the Neo4j HTTP transaction API.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::StoreConfig;
use crate::error::StoreError;

/// Canonical observation for a query that matched nothing.
pub const NO_RESULTS: &str = "No matching records found.";

/// Rows returned by the store, in its natural return order.
#[derive(Debug, Clone, PartialEq)]
pub struct ResultSet {
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Value>>,
}

impl ResultSet {
    pub fn empty() -> Self {
        Self {
            columns: Vec::new(),
            rows: Vec::new(),
        }
    }
}

/// The graph store collaborator.
#[async_trait]
pub trait GraphStore: Send + Sync {
    /// Execute one read statement and return its rows.
    async fn run(&self, statement: &str) -> Result<ResultSet, StoreError>;

    /// Cheap connectivity probe used by the health endpoint.
    async fn ping(&self) -> Result<(), StoreError> {
        self.run("RETURN 1").await.map(|_| ())
    }
}

#[derive(Debug, Serialize)]
struct TxRequest<'a> {
    statements: Vec<TxStatement<'a>>,
}

#[derive(Debug, Serialize)]
struct TxStatement<'a> {
    statement: &'a str,
}

#[derive(Debug, Deserialize)]
struct TxResponse {
    #[serde(default)]
    results: Vec<TxResult>,
    #[serde(default)]
    errors: Vec<TxError>,
}

#[derive(Debug, Deserialize)]
struct TxResult {
    columns: Vec<String>,
    data: Vec<TxRow>,
}

#[derive(Debug, Deserialize)]
struct TxRow {
    row: Vec<Value>,
}

#[derive(Debug, Deserialize)]
struct TxError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

/// Store client speaking the Neo4j HTTP transaction API
/// (`POST {base}/db/{database}/tx/commit`).
pub struct Neo4jHttpStore {
    http: reqwest::Client,
    endpoint: String,
    username: String,
    password: String,
}

impl Neo4jHttpStore {
    pub fn new(config: &StoreConfig) -> Result<Self, StoreError> {
        let http = reqwest::Client::builder()
            .timeout(config.query_timeout)
            .build()
            .map_err(|e| StoreError::Unreachable(format!("failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            endpoint: format!(
                "{}/db/{}/tx/commit",
                config.http_url.trim_end_matches('/'),
                config.database
            ),
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl GraphStore for Neo4jHttpStore {
    async fn run(&self, statement: &str) -> Result<ResultSet, StoreError> {
        let request = TxRequest {
            statements: vec![TxStatement { statement }],
        };

        let response = self
            .http
            .post(&self.endpoint)
            .basic_auth(&self.username, Some(&self.password))
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    StoreError::Unreachable("query timed out".to_string())
                } else {
                    StoreError::Unreachable(format!("{}", e))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(StoreError::Unreachable(format!(
                "store returned HTTP {}",
                status
            )));
        }

        let parsed: TxResponse = response
            .json()
            .await
            .map_err(|e| StoreError::Unreachable(format!("malformed store response: {}", e)))?;

        if let Some(err) = parsed.errors.first() {
            return Err(StoreError::Statement(format!(
                "{}: {}",
                err.code, err.message
            )));
        }

        let result = match parsed.results.into_iter().next() {
            Some(r) => r,
            None => return Ok(ResultSet::empty()),
        };

        Ok(ResultSet {
            columns: result.columns,
            rows: result.data.into_iter().map(|d| d.row).collect(),
        })
    }
}

/// Flatten a result set into observation text, preserving store order.
pub fn format_rows(result: &ResultSet) -> String {
    if result.rows.is_empty() {
        return NO_RESULTS.to_string();
    }

    result
        .rows
        .iter()
        .map(|row| {
            result
                .columns
                .iter()
                .zip(row.iter())
                .map(|(col, val)| format!("{}: {}", col, render_value(val)))
                .collect::<Vec<_>>()
                .join(", ")
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn render_value(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => "null".to_string(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn empty_result_set_maps_to_no_results() {
        assert_eq!(format_rows(&ResultSet::empty()), NO_RESULTS);
    }

    #[test]
    fn rows_are_flattened_in_store_order() {
        let result = ResultSet {
            columns: vec!["t.name".to_string(), "t.conference".to_string()],
            rows: vec![
                vec![json!("Los Angeles Lakers"), json!("West")],
                vec![json!("Miami Heat"), json!("East")],
            ],
        };
        let text = format_rows(&result);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "t.name: Los Angeles Lakers, t.conference: West");
        assert_eq!(lines[1], "t.name: Miami Heat, t.conference: East");
    }

    #[test]
    fn null_and_numeric_values_render() {
        let result = ResultSet {
            columns: vec!["p.jersey_number".to_string(), "p.height".to_string()],
            rows: vec![vec![json!(77), Value::Null]],
        };
        assert_eq!(format_rows(&result), "p.jersey_number: 77, p.height: null");
    }
}

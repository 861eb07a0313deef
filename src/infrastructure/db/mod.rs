//! Data store access over a PostgREST-style REST surface.
//!
//! The primary path calls a server-side function that executes arbitrary SQL
//! text; the conventional path is a bounded select against the customer
//! table. Connection pooling and TLS are the transport's concern.

use async_trait::async_trait;
use serde::Deserialize;
use tracing::debug;

use crate::domain::error::{AppError, Result};
use crate::domain::query::Record;
use crate::infrastructure::config::DataStoreSettings;

#[async_trait]
pub trait DataStore {
    /// Executes arbitrary SQL text through the server-side RPC function.
    async fn run_sql(&self, sql: &str) -> Result<Vec<Record>>;

    /// Unfiltered select against the customer table, capped at `limit` rows.
    async fn select_all(&self, limit: usize) -> Result<Vec<Record>>;
}

/// The RPC function wraps its rows in a single-element envelope:
/// `[{ "result": [...] }]`.
#[derive(Deserialize)]
struct RpcEnvelope {
    #[serde(default)]
    result: Option<Vec<Record>>,
}

pub struct PostgrestStore {
    client: reqwest::Client,
    base_url: String,
    service_key: String,
    rpc_function: String,
    table: String,
}

impl PostgrestStore {
    pub fn new(settings: &DataStoreSettings) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(std::time::Duration::from_secs(settings.timeout_secs))
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
            base_url: settings.url.trim_end_matches('/').to_string(),
            service_key: settings.service_key.clone(),
            rpc_function: settings.rpc_function.clone(),
            table: settings.table.clone(),
        }
    }
}

#[async_trait]
impl DataStore for PostgrestStore {
    async fn run_sql(&self, sql: &str) -> Result<Vec<Record>> {
        let url = format!("{}/rest/v1/rpc/{}", self.base_url, self.rpc_function);
        let body = serde_json::json!({ "query_text": sql });

        debug!(rpc = %self.rpc_function, "executing SQL through RPC");

        let response = self
            .client
            .post(&url)
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::DatabaseError(format!("RPC request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::DatabaseError(format!(
                "RPC error ({}): {}",
                status, text
            )));
        }

        let envelope: Vec<RpcEnvelope> = response
            .json()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse JSON: {}", e)))?;

        Ok(envelope
            .into_iter()
            .next()
            .and_then(|entry| entry.result)
            .unwrap_or_default())
    }

    async fn select_all(&self, limit: usize) -> Result<Vec<Record>> {
        let url = format!("{}/rest/v1/{}", self.base_url, self.table);
        let limit = limit.to_string();

        debug!(table = %self.table, limit = %limit, "running bounded select");

        let response = self
            .client
            .get(&url)
            .query(&[("select", "*"), ("limit", limit.as_str())])
            .header("apikey", &self.service_key)
            .bearer_auth(&self.service_key)
            .send()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Select request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(AppError::DatabaseError(format!(
                "Select error ({}): {}",
                status, text
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::DatabaseError(format!("Failed to parse JSON: {}", e)))
    }
}

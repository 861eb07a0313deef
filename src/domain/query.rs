//! Core types for one natural-language query run.
//!
//! Everything here lives for a single request/response cycle: the context is
//! built when the request arrives, threaded through each pipeline step, and
//! discarded with the response. Nothing is cached or persisted.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// One row returned by the execution layer. The column set comes from the
/// `clientes` schema but is not enforced here; the pipeline trusts whatever
/// the store returns.
pub type Record = serde_json::Map<String, Value>;

/// Fixed statement substituted when the model output fails the SELECT check,
/// and the shape of the executor's unfiltered fallback.
pub const DEFAULT_SQL: &str = "SELECT * FROM clientes LIMIT 100";

/// Immutable per-request context threaded through the pipeline stages.
#[derive(Debug, Clone)]
pub struct QueryContext {
    pub request_id: Uuid,
    pub query: String,
}

impl QueryContext {
    pub fn new(query: String) -> Self {
        Self {
            request_id: Uuid::new_v4(),
            query,
        }
    }
}

/// Whether a query needs a database lookup. Decided once per query by the
/// classifier and immutable afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryCategory {
    NeedsData,
    General,
}

impl QueryCategory {
    /// Parses the classifier's reply. Only the first line counts, trimmed and
    /// compared case-insensitively against the `GENERAL` label; anything else
    /// means the query needs data.
    pub fn from_model_reply(reply: &str) -> Self {
        let label = reply.lines().next().unwrap_or("").trim();
        if label.eq_ignore_ascii_case("GENERAL") {
            QueryCategory::General
        } else {
            QueryCategory::NeedsData
        }
    }
}

/// Sanitized SQL produced from natural language.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GeneratedSql {
    pub sql: String,
    /// True when the model output failed the SELECT check and [`DEFAULT_SQL`]
    /// was substituted.
    pub defaulted: bool,
}

/// Final payload of a successful pipeline run. Failures are carried as
/// `AppError` and shaped into `{ "error": ... }` at the HTTP layer.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PipelineResponse {
    General {
        answer: String,
        data: Option<Vec<Record>>,
        #[serde(rename = "sqlQuery")]
        sql_query: Option<String>,
    },
    Database {
        data: Vec<Record>,
        #[serde(rename = "sqlQuery")]
        sql_query: String,
        #[serde(skip_serializing_if = "Option::is_none")]
        answer: Option<String>,
        /// True when the executor fell back to the unfiltered default select,
        /// so the caller can tell "filter honored" from "filter lost".
        degraded: bool,
    },
}

impl PipelineResponse {
    pub fn general(answer: String) -> Self {
        PipelineResponse::General {
            answer,
            data: None,
            sql_query: None,
        }
    }

    pub fn database(
        data: Vec<Record>,
        sql_query: String,
        answer: Option<String>,
        degraded: bool,
    ) -> Self {
        PipelineResponse::Database {
            data,
            sql_query,
            answer,
            degraded,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_general_exact() {
        assert_eq!(
            QueryCategory::from_model_reply("GENERAL"),
            QueryCategory::General
        );
    }

    #[test]
    fn test_category_general_normalized() {
        assert_eq!(
            QueryCategory::from_model_reply("  general \n"),
            QueryCategory::General
        );
    }

    #[test]
    fn test_category_first_line_only() {
        assert_eq!(
            QueryCategory::from_model_reply("GENERAL\nporque no requiere datos"),
            QueryCategory::General
        );
    }

    #[test]
    fn test_category_datos_label() {
        assert_eq!(
            QueryCategory::from_model_reply("DATOS"),
            QueryCategory::NeedsData
        );
    }

    #[test]
    fn test_category_empty_reply_needs_data() {
        assert_eq!(
            QueryCategory::from_model_reply(""),
            QueryCategory::NeedsData
        );
    }

    #[test]
    fn test_category_partial_match_needs_data() {
        assert_eq!(
            QueryCategory::from_model_reply("GENERAL: no requiere datos"),
            QueryCategory::NeedsData
        );
    }

    #[test]
    fn test_general_response_shape() {
        let response = PipelineResponse::general("IO Finance es una fintech.".to_string());
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "general");
        assert_eq!(json["answer"], "IO Finance es una fintech.");
        assert!(json["data"].is_null());
        assert!(json["sqlQuery"].is_null());
    }

    #[test]
    fn test_database_response_shape() {
        let row: Record = serde_json::from_value(serde_json::json!({
            "email": "ana@empresa.com",
            "segmento": "Premium"
        }))
        .unwrap();
        let response = PipelineResponse::database(
            vec![row],
            "SELECT email FROM clientes LIMIT 100".to_string(),
            Some("Hola 👋".to_string()),
            false,
        );
        let json = serde_json::to_value(&response).unwrap();
        assert_eq!(json["type"], "database");
        assert_eq!(json["sqlQuery"], "SELECT email FROM clientes LIMIT 100");
        assert_eq!(json["data"][0]["segmento"], "Premium");
        assert_eq!(json["answer"], "Hola 👋");
        assert_eq!(json["degraded"], false);
    }

    #[test]
    fn test_database_response_omits_absent_answer() {
        let response =
            PipelineResponse::database(Vec::new(), DEFAULT_SQL.to_string(), None, true);
        let json = serde_json::to_value(&response).unwrap();
        assert!(json.get("answer").is_none());
        assert_eq!(json["degraded"], true);
    }
}

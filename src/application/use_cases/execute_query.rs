use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::error::{AppError, Result};
use crate::domain::query::{GeneratedSql, QueryContext, Record};
use crate::infrastructure::db::DataStore;

/// Row cap of the fallback select. Matches the LIMIT the generation prompt
/// mandates, so both execution paths are bounded the same way.
pub const FALLBACK_LIMIT: usize = 100;

/// Rows plus a flag telling whether the filter intent survived execution.
#[derive(Debug, Clone)]
pub struct QueryExecution {
    pub records: Vec<Record>,
    /// True when the primary path failed and the unfiltered fallback ran
    /// instead, meaning the user's filter was not applied.
    pub degraded: bool,
}

pub struct ExecuteQueryUseCase {
    store: Arc<dyn DataStore + Send + Sync>,
}

impl ExecuteQueryUseCase {
    pub fn new(store: Arc<dyn DataStore + Send + Sync>) -> Self {
        Self { store }
    }

    /// Runs the generated SQL through the RPC path, falling back to a bounded
    /// unfiltered select if that fails. Only a double failure propagates.
    pub async fn execute(&self, ctx: &QueryContext, sql: &GeneratedSql) -> Result<QueryExecution> {
        match self.store.run_sql(&sql.sql).await {
            Ok(records) => {
                debug!(request_id = %ctx.request_id, rows = records.len(), "primary execution succeeded");
                Ok(QueryExecution {
                    records,
                    degraded: false,
                })
            }
            Err(primary_err) => {
                warn!(
                    request_id = %ctx.request_id,
                    error = %primary_err,
                    "primary execution failed, falling back to unfiltered select"
                );
                let records = self
                    .store
                    .select_all(FALLBACK_LIMIT)
                    .await
                    .map_err(|fallback_err| {
                        AppError::DatabaseError(format!(
                            "query execution failed: {} (fallback: {})",
                            primary_err, fallback_err
                        ))
                    })?;
                Ok(QueryExecution {
                    records,
                    degraded: true,
                })
            }
        }
    }
}

//! Pipeline orchestrator: Classify -> (general answer | generate SQL ->
//! execute -> synthesize) -> response. Strictly sequential, one in-flight
//! remote call, no retries; any unrecovered error aborts the run and the
//! caller gets a single failure.

use std::sync::Arc;

use tracing::info;

use super::classify::ClassifyQueryUseCase;
use super::execute_query::ExecuteQueryUseCase;
use super::generate_sql::GenerateSqlUseCase;
use super::prompts::GENERAL_SYSTEM_PROMPT;
use super::synthesize::SynthesizeAnswerUseCase;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::query::{PipelineResponse, QueryCategory, QueryContext};
use crate::infrastructure::db::DataStore;
use crate::infrastructure::llm_clients::LLMClient;

/// Which optional stages run. The observed deployment variants (with/without
/// classification, with/without synthesis) are configurations of one
/// pipeline, not separate code paths.
#[derive(Debug, Clone, Copy)]
pub struct PipelineOptions {
    /// When off, every query takes the database path.
    pub classification: bool,
    /// When off, Database responses carry no `answer`.
    pub synthesis: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            classification: true,
            synthesis: true,
        }
    }
}

pub struct ProcessQueryUseCase {
    classify: ClassifyQueryUseCase,
    generate_sql: GenerateSqlUseCase,
    execute_query: ExecuteQueryUseCase,
    synthesize: SynthesizeAnswerUseCase,
    llm_client: Arc<dyn LLMClient + Send + Sync>,
    llm_config: LLMConfig,
    options: PipelineOptions,
}

impl ProcessQueryUseCase {
    pub fn new(
        llm_client: Arc<dyn LLMClient + Send + Sync>,
        store: Arc<dyn DataStore + Send + Sync>,
        llm_config: LLMConfig,
        options: PipelineOptions,
    ) -> Self {
        Self {
            classify: ClassifyQueryUseCase::new(llm_client.clone()),
            generate_sql: GenerateSqlUseCase::new(llm_client.clone()),
            execute_query: ExecuteQueryUseCase::new(store),
            synthesize: SynthesizeAnswerUseCase::new(llm_client.clone()),
            llm_client,
            llm_config,
            options,
        }
    }

    pub async fn execute(&self, query: String) -> Result<PipelineResponse> {
        let ctx = QueryContext::new(query);
        info!(request_id = %ctx.request_id, "processing query");

        let category = if self.options.classification {
            self.classify.execute(&self.llm_config, &ctx).await?
        } else {
            QueryCategory::NeedsData
        };

        if category == QueryCategory::General {
            let answer = self
                .llm_client
                .generate(&self.llm_config, GENERAL_SYSTEM_PROMPT, &ctx.query)
                .await?;
            info!(request_id = %ctx.request_id, "answered without database lookup");
            return Ok(PipelineResponse::general(answer));
        }

        let sql = self.generate_sql.execute(&self.llm_config, &ctx).await?;
        let execution = self.execute_query.execute(&ctx, &sql).await?;

        let answer = if self.options.synthesis {
            Some(
                self.synthesize
                    .execute(&self.llm_config, &ctx, &execution.records)
                    .await?,
            )
        } else {
            None
        };

        info!(
            request_id = %ctx.request_id,
            rows = execution.records.len(),
            degraded = execution.degraded,
            "query processed"
        );
        Ok(PipelineResponse::database(
            execution.records,
            sql.sql,
            answer,
            execution.degraded,
        ))
    }
}

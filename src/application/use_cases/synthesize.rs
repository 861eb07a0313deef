use std::sync::Arc;

use tracing::debug;

use super::prompts::{synthesis_user_message, SYNTHESIS_SYSTEM_PROMPT};
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::LLMConfig;
use crate::domain::query::{QueryContext, Record};
use crate::infrastructure::llm_clients::LLMClient;

/// At most this many records are serialized into the synthesis prompt.
pub const MAX_SAMPLE_RECORDS: usize = 5;

/// Produces a human-readable summary of the result set. The model reply is
/// returned unmodified; tone and length compliance are not validated.
pub struct SynthesizeAnswerUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl SynthesizeAnswerUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(
        &self,
        config: &LLMConfig,
        ctx: &QueryContext,
        records: &[Record],
    ) -> Result<String> {
        let sample: Vec<&Record> = records.iter().take(MAX_SAMPLE_RECORDS).collect();
        let sample_json = serde_json::to_string(&sample)
            .map_err(|e| AppError::Internal(format!("Failed to serialize result sample: {}", e)))?;

        let user = synthesis_user_message(&ctx.query, records.len(), &sample_json);

        let answer = self
            .llm_client
            .generate(config, SYNTHESIS_SYSTEM_PROMPT, &user)
            .await?;

        debug!(request_id = %ctx.request_id, chars = answer.len(), "synthesized answer");
        Ok(answer)
    }
}

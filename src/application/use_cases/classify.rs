use std::sync::Arc;

use tracing::debug;

use super::prompts::CLASSIFIER_SYSTEM_PROMPT;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::query::{QueryCategory, QueryContext};
use crate::infrastructure::llm_clients::LLMClient;

/// Decides whether a query needs a database lookup. A remote failure here
/// aborts the pipeline before any SQL generation.
pub struct ClassifyQueryUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl ClassifyQueryUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(&self, config: &LLMConfig, ctx: &QueryContext) -> Result<QueryCategory> {
        let reply = self
            .llm_client
            .generate(config, CLASSIFIER_SYSTEM_PROMPT, &ctx.query)
            .await?;

        let category = QueryCategory::from_model_reply(&reply);
        debug!(request_id = %ctx.request_id, ?category, "classified query");
        Ok(category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::error::AppError;
    use async_trait::async_trait;

    struct FixedLlm {
        reply: Option<String>,
    }

    #[async_trait]
    impl LLMClient for FixedLlm {
        async fn generate(&self, _: &LLMConfig, _: &str, _: &str) -> Result<String> {
            self.reply
                .clone()
                .ok_or_else(|| AppError::LLMError("API error (500): upstream".to_string()))
        }
    }

    fn use_case(reply: Option<&str>) -> ClassifyQueryUseCase {
        ClassifyQueryUseCase::new(Arc::new(FixedLlm {
            reply: reply.map(|r| r.to_string()),
        }))
    }

    #[tokio::test]
    async fn test_general_reply() {
        let ctx = QueryContext::new("¿Qué es IO Finance?".to_string());
        let category = use_case(Some("GENERAL"))
            .execute(&LLMConfig::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(category, QueryCategory::General);
    }

    #[tokio::test]
    async fn test_datos_reply() {
        let ctx = QueryContext::new("Muéstrame clientes Premium activos".to_string());
        let category = use_case(Some("DATOS"))
            .execute(&LLMConfig::default(), &ctx)
            .await
            .unwrap();
        assert_eq!(category, QueryCategory::NeedsData);
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let ctx = QueryContext::new("clientes VIP".to_string());
        let err = use_case(None)
            .execute(&LLMConfig::default(), &ctx)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LLMError(_)));
    }
}

use std::sync::Arc;

use tracing::{debug, warn};

use super::prompts::SQL_SYSTEM_PROMPT;
use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;
use crate::domain::query::{GeneratedSql, QueryContext, DEFAULT_SQL};
use crate::infrastructure::llm_clients::LLMClient;
use crate::infrastructure::response::strip_sql_fences;

/// Translates a natural-language query into sanitized SQL. The only guardrail
/// is the SELECT-prefix check; anything else the model gets wrong is executed
/// as-is.
pub struct GenerateSqlUseCase {
    llm_client: Arc<dyn LLMClient + Send + Sync>,
}

impl GenerateSqlUseCase {
    pub fn new(llm_client: Arc<dyn LLMClient + Send + Sync>) -> Self {
        Self { llm_client }
    }

    pub async fn execute(&self, config: &LLMConfig, ctx: &QueryContext) -> Result<GeneratedSql> {
        let raw = self
            .llm_client
            .generate(config, SQL_SYSTEM_PROMPT, &ctx.query)
            .await?;

        let sql = strip_sql_fences(&raw);

        if is_select(&sql) {
            debug!(request_id = %ctx.request_id, sql = %sql, "generated SQL");
            Ok(GeneratedSql {
                sql,
                defaulted: false,
            })
        } else {
            warn!(
                request_id = %ctx.request_id,
                rejected = %sql,
                "model output is not a SELECT, substituting default statement"
            );
            Ok(GeneratedSql {
                sql: DEFAULT_SQL.to_string(),
                defaulted: true,
            })
        }
    }
}

fn is_select(sql: &str) -> bool {
    sql.get(..6)
        .map_or(false, |prefix| prefix.eq_ignore_ascii_case("SELECT"))
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
                .ok_or_else(|| AppError::LLMError("API error (502): upstream".to_string()))
        }
    }

    fn use_case(reply: Option<&str>) -> GenerateSqlUseCase {
        GenerateSqlUseCase::new(Arc::new(FixedLlm {
            reply: reply.map(|r| r.to_string()),
        }))
    }

    fn ctx() -> QueryContext {
        QueryContext::new("Muéstrame clientes Premium activos".to_string())
    }

    #[tokio::test]
    async fn test_fenced_select_is_cleaned() {
        let generated = use_case(Some(
            "```sql\nSELECT email FROM clientes WHERE segmento = 'Premium' LIMIT 100\n```",
        ))
        .execute(&LLMConfig::default(), &ctx())
        .await
        .unwrap();
        assert_eq!(
            generated.sql,
            "SELECT email FROM clientes WHERE segmento = 'Premium' LIMIT 100"
        );
        assert!(!generated.defaulted);
    }

    #[tokio::test]
    async fn test_lowercase_select_accepted() {
        let generated = use_case(Some("select email from clientes limit 100"))
            .execute(&LLMConfig::default(), &ctx())
            .await
            .unwrap();
        assert!(!generated.defaulted);
    }

    #[tokio::test]
    async fn test_non_select_replaced_with_default() {
        let generated = use_case(Some("DROP TABLE clientes"))
            .execute(&LLMConfig::default(), &ctx())
            .await
            .unwrap();
        assert_eq!(generated.sql, DEFAULT_SQL);
        assert!(generated.defaulted);
    }

    #[tokio::test]
    async fn test_prose_reply_replaced_with_default() {
        let generated = use_case(Some("No puedo generar esa consulta."))
            .execute(&LLMConfig::default(), &ctx())
            .await
            .unwrap();
        assert_eq!(generated.sql, DEFAULT_SQL);
        assert!(generated.defaulted);
    }

    #[tokio::test]
    async fn test_remote_failure_propagates() {
        let err = use_case(None)
            .execute(&LLMConfig::default(), &ctx())
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::LLMError(_)));
    }
}

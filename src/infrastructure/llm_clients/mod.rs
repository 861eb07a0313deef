pub mod gemini;
pub mod openai;

use crate::domain::error::Result;
use crate::domain::llm_config::{LLMConfig, LLMProvider};
use async_trait::async_trait;
use gemini::GeminiClient;
use openai::OpenAIClient;

/// Hosted chat-completion endpoint: one system instruction, one user message,
/// one text completion back.
#[async_trait]
pub trait LLMClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String>;
}

/// Dispatches to the concrete client for the configured provider.
pub struct RouterClient {
    openai: OpenAIClient,
    gemini: GeminiClient,
}

impl RouterClient {
    pub fn new() -> Self {
        Self {
            openai: OpenAIClient::new(),
            gemini: GeminiClient::new(),
        }
    }
}

impl Default for RouterClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LLMClient for RouterClient {
    async fn generate(&self, config: &LLMConfig, system: &str, user: &str) -> Result<String> {
        match config.provider {
            LLMProvider::Gemini => self.gemini.generate(config, system, user).await,
            LLMProvider::OpenAI => self.openai.generate(config, system, user).await,
        }
    }
}

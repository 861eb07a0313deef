use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LLMProvider {
    /// OpenAI-compatible chat-completions endpoint (gateways included).
    OpenAI,
    Gemini,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct LLMConfig {
    pub provider: LLMProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for LLMConfig {
    fn default() -> Self {
        Self {
            provider: LLMProvider::OpenAI,
            base_url: "https://ai.gateway.lovable.dev/v1".to_string(),
            model: "google/gemini-2.5-flash".to_string(),
            api_key: None,
            max_tokens: Some(1024),
            temperature: Some(0.2),
        }
    }
}

//! Service configuration, layered from `config.toml` and `APP_`-prefixed
//! environment variables. Credentials are validated up front so a missing key
//! fails at startup instead of mid-pipeline.

use figment::providers::{Env, Format, Toml};
use figment::Figment;
use serde::Deserialize;
use url::Url;

use crate::application::PipelineOptions;
use crate::domain::error::{AppError, Result};
use crate::domain::llm_config::{LLMConfig, LLMProvider};

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub provider: LLMProvider,
    pub base_url: String,
    pub model: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        let defaults = LLMConfig::default();
        Self {
            provider: defaults.provider,
            base_url: defaults.base_url,
            model: defaults.model,
            api_key: None,
            max_tokens: defaults.max_tokens,
            temperature: defaults.temperature,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DataStoreSettings {
    /// Base URL of the PostgREST-style REST surface.
    pub url: String,
    /// Service-role key sent as both `apikey` and bearer token.
    pub service_key: String,
    /// Server-side function executing arbitrary SQL text.
    pub rpc_function: String,
    pub table: String,
    pub timeout_secs: u64,
}

impl Default for DataStoreSettings {
    fn default() -> Self {
        Self {
            url: String::new(),
            service_key: String::new(),
            rpc_function: "execute_raw_sql".to_string(),
            table: "clientes".to_string(),
            timeout_secs: 30,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct PipelineSettings {
    pub classification: bool,
    pub synthesis: bool,
}

impl Default for PipelineSettings {
    fn default() -> Self {
        Self {
            classification: true,
            synthesis: true,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LlmSettings,
    pub datastore: DataStoreSettings,
    pub pipeline: PipelineSettings,
}

impl Settings {
    /// Loads `config.toml` (if present) overlaid with `APP_`-prefixed
    /// environment variables (e.g. `APP_LLM__API_KEY`).
    pub fn load() -> Result<Self> {
        let settings: Settings = Figment::new()
            .merge(Toml::file("config.toml"))
            .merge(Env::prefixed("APP_").split("__"))
            .extract()
            .map_err(|e| AppError::ConfigError(e.to_string()))?;

        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<()> {
        match &self.llm.api_key {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(AppError::ConfigError(
                    "LLM API key no configurada (APP_LLM__API_KEY)".to_string(),
                ))
            }
        }

        if self.datastore.service_key.trim().is_empty() {
            return Err(AppError::ConfigError(
                "Data store service key no configurada (APP_DATASTORE__SERVICE_KEY)".to_string(),
            ));
        }

        Url::parse(&self.llm.base_url)
            .map_err(|e| AppError::ConfigError(format!("Invalid LLM base URL: {}", e)))?;
        Url::parse(&self.datastore.url)
            .map_err(|e| AppError::ConfigError(format!("Invalid data store URL: {}", e)))?;

        Ok(())
    }

    pub fn llm_config(&self) -> LLMConfig {
        LLMConfig {
            provider: self.llm.provider,
            base_url: self.llm.base_url.clone(),
            model: self.llm.model.clone(),
            api_key: self.llm.api_key.clone(),
            max_tokens: self.llm.max_tokens,
            temperature: self.llm.temperature,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            classification: self.pipeline.classification,
            synthesis: self.pipeline.synthesis,
        }
    }
}

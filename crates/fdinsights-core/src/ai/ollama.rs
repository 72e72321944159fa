//! Ollama backend implementation
//!
//! HTTP client for the Ollama `/api/generate` endpoint. The declared output
//! schema is sent as `format` so the model replies with a single JSON object.

use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::models::ValidParameters;
use crate::prompts::PromptLibrary;
use crate::settings::Settings;

use super::parsing::parse_insights;
use super::types::{output_schema, InsightsOutput};
use super::{render_prompt, InsightBackend};

/// Ollama backend
///
/// # Configuration
///
/// - `OLLAMA_HOST`: Ollama server URL (required)
/// - `OLLAMA_MODEL`: Model name (default: llama3.2)
#[derive(Clone)]
pub struct OllamaBackend {
    http_client: Client,
    base_url: String,
    model: String,
    settings: Settings,
    prompts: Arc<RwLock<PromptLibrary>>,
}

impl OllamaBackend {
    /// Create a new Ollama backend
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            http_client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            settings: Settings::default(),
            prompts: Arc::new(RwLock::new(PromptLibrary::new())),
        }
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        Self {
            model: model.to_string(),
            ..self.clone()
        }
    }

    /// Apply generation settings (a configured model replaces the current one)
    pub fn with_settings(mut self, settings: Settings) -> Self {
        if let Some(ref model) = settings.model {
            self.model = model.clone();
        }
        self.settings = settings;
        self
    }

    /// Use a specific prompt library (tests, custom override dirs)
    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Arc::new(RwLock::new(prompts));
        self
    }

    /// Create from environment variables
    pub fn from_env() -> Option<Self> {
        let host = std::env::var("OLLAMA_HOST").ok()?;
        let model = std::env::var("OLLAMA_MODEL").unwrap_or_else(|_| "llama3.2".to_string());
        Some(Self::new(&host, &model))
    }
}

/// Request to Ollama API
#[derive(Debug, Serialize)]
struct OllamaRequest {
    model: String,
    prompt: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    stream: bool,
    /// JSON Schema the response must follow
    format: serde_json::Value,
    options: OllamaOptions,
}

#[derive(Debug, Serialize)]
struct OllamaOptions {
    temperature: f32,
}

/// Response from Ollama API
#[derive(Debug, Deserialize)]
struct OllamaResponse {
    #[serde(default)]
    response: String,
}

#[async_trait]
impl InsightBackend for OllamaBackend {
    async fn generate_insights(&self, params: &ValidParameters) -> Result<InsightsOutput> {
        let prompt = render_prompt(&self.prompts, params)?;

        let request = OllamaRequest {
            model: self.model.clone(),
            prompt: prompt.user,
            system: prompt.system,
            stream: false,
            format: output_schema(&prompt.output_field),
            options: OllamaOptions {
                temperature: self.settings.temperature,
            },
        };

        let mut req_builder = self
            .http_client
            .post(format!("{}/api/generate", self.base_url))
            .json(&request);

        if let Some(timeout) = self.settings.timeout {
            req_builder = req_builder.timeout(timeout);
        }

        let response = req_builder.send().await?.error_for_status()?;
        let ollama_response: OllamaResponse = response.json().await?;
        debug!("Ollama response: {}", ollama_response.response);

        parse_insights(&ollama_response.response, &prompt.output_field)
    }

    async fn health_check(&self) -> bool {
        match self
            .http_client
            .get(format!("{}/api/tags", self.base_url))
            .send()
            .await
        {
            Ok(resp) => resp.status().is_success(),
            Err(_) => false,
        }
    }

    fn model(&self) -> &str {
        &self.model
    }

    fn host(&self) -> &str {
        &self.base_url
    }
}

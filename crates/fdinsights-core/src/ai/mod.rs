//! Pluggable AI backend abstraction
//!
//! The insight gateway only needs one operation from a text-generation
//! service, so the backend interface is deliberately narrow.
//!
//! # Architecture
//!
//! - `InsightBackend` trait: generate insights for validated parameters
//! - `AIClient` enum: concrete wrapper providing Clone + compile-time dispatch
//! - Backend implementations: `OllamaBackend`, `OpenAICompatibleBackend`, `MockBackend`
//!
//! # Usage
//!
//! ```rust,ignore
//! let ai = AIClient::from_env();
//!
//! if let Some(ref client) = ai {
//!     let output = client.generate_insights(&params).await?;
//!     println!("{}", output.insights);
//! }
//! ```
//!
//! # Configuration
//!
//! Environment variables:
//! - `AI_BACKEND`: Backend to use (ollama, openai_compatible, mock). Default: ollama
//! - `OLLAMA_HOST`: Ollama server URL (required for ollama backend)
//! - `OLLAMA_MODEL`: Default model name (default: llama3.2)
//! - `OPENAI_COMPATIBLE_HOST`: Server URL (required for openai_compatible backend)
//! - `OPENAI_COMPATIBLE_MODEL`: Model name (default: gpt-3.5-turbo)
//! - `OPENAI_COMPATIBLE_API_KEY`: API key if required (optional)

mod mock;
mod ollama;
mod openai_compatible;
pub mod parsing;
pub mod types;

pub use mock::{MockBackend, MockBehavior};
pub use ollama::OllamaBackend;
pub use openai_compatible::OpenAICompatibleBackend;
pub use types::*;

use std::sync::RwLock;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::ValidParameters;
use crate::prompts::{PromptId, PromptLibrary, RenderedPrompt};
use crate::settings::Settings;

/// Trait defining the interface for insight backends
///
/// Backends should be Send + Sync to allow use across async tasks.
#[async_trait]
pub trait InsightBackend: Send + Sync {
    /// Render the FD prompt for `params`, send it, and return the
    /// structured output (text may be blank)
    async fn generate_insights(&self, params: &ValidParameters) -> Result<InsightsOutput>;

    /// Check if the backend is available
    async fn health_check(&self) -> bool;

    /// Get the model name
    fn model(&self) -> &str;

    /// Get the host URL (for logging)
    fn host(&self) -> &str;
}

/// Concrete AI client enum
///
/// Provides Clone and compile-time dispatch without Box<dyn> overhead.
#[derive(Clone)]
pub enum AIClient {
    /// Ollama backend (HTTP API)
    Ollama(OllamaBackend),
    /// OpenAI-compatible backend (vLLM, LocalAI, llama-server, etc.)
    OpenAICompatible(OpenAICompatibleBackend),
    /// Mock backend for testing
    Mock(MockBackend),
}

impl AIClient {
    /// Create an AI client from environment variables
    ///
    /// Checks `AI_BACKEND` to determine which backend to use:
    /// - `ollama` (default): Uses OLLAMA_HOST and OLLAMA_MODEL
    /// - `openai_compatible`: Uses OPENAI_COMPATIBLE_HOST and OPENAI_COMPATIBLE_MODEL
    /// - `mock`: Creates a mock backend for testing
    ///
    /// Returns None if the required environment variables are not set.
    pub fn from_env() -> Option<Self> {
        Self::from_backend_name(&std::env::var("AI_BACKEND").unwrap_or_else(|_| "ollama".to_string()))
    }

    /// Like [`AIClient::from_env`], with generation settings applied
    pub fn from_env_with_settings(settings: &Settings) -> Option<Self> {
        Self::from_env().map(|client| client.with_settings(settings.clone()))
    }

    fn from_backend_name(backend: &str) -> Option<Self> {
        match backend.to_lowercase().as_str() {
            "ollama" => OllamaBackend::from_env().map(AIClient::Ollama),
            "openai_compatible" | "openai" | "vllm" | "localai" | "llamacpp" => {
                OpenAICompatibleBackend::from_env().map(AIClient::OpenAICompatible)
            }
            "mock" => Some(AIClient::Mock(MockBackend::new())),
            _ => {
                tracing::warn!(backend = %backend, "Unknown AI_BACKEND, falling back to ollama");
                OllamaBackend::from_env().map(AIClient::Ollama)
            }
        }
    }

    /// Create an Ollama backend directly
    pub fn ollama(host: &str, model: &str) -> Self {
        AIClient::Ollama(OllamaBackend::new(host, model))
    }

    /// Create a mock backend for testing
    pub fn mock() -> Self {
        AIClient::Mock(MockBackend::new())
    }

    /// Create a new instance with a different model
    pub fn with_model(&self, model: &str) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_model(model)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_model(model)),
            AIClient::Mock(b) => AIClient::Mock(b.with_model(model)),
        }
    }

    /// Apply generation settings (temperature, timeout, model override)
    pub fn with_settings(self, settings: Settings) -> Self {
        match self {
            AIClient::Ollama(b) => AIClient::Ollama(b.with_settings(settings)),
            AIClient::OpenAICompatible(b) => AIClient::OpenAICompatible(b.with_settings(settings)),
            AIClient::Mock(b) => AIClient::Mock(b),
        }
    }

    /// Backend kind as used in `AI_BACKEND`
    pub fn kind(&self) -> &'static str {
        match self {
            AIClient::Ollama(_) => "ollama",
            AIClient::OpenAICompatible(_) => "openai_compatible",
            AIClient::Mock(_) => "mock",
        }
    }

    /// Backend description for status output
    pub fn info(&self) -> BackendInfo {
        BackendInfo {
            kind: self.kind(),
            host: self.host().to_string(),
            model: self.model().to_string(),
        }
    }
}

// Implement InsightBackend for AIClient by delegating to the inner backend
#[async_trait]
impl InsightBackend for AIClient {
    async fn generate_insights(&self, params: &ValidParameters) -> Result<InsightsOutput> {
        match self {
            AIClient::Ollama(b) => b.generate_insights(params).await,
            AIClient::OpenAICompatible(b) => b.generate_insights(params).await,
            AIClient::Mock(b) => b.generate_insights(params).await,
        }
    }

    async fn health_check(&self) -> bool {
        match self {
            AIClient::Ollama(b) => b.health_check().await,
            AIClient::OpenAICompatible(b) => b.health_check().await,
            AIClient::Mock(b) => b.health_check().await,
        }
    }

    fn model(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.model(),
            AIClient::OpenAICompatible(b) => b.model(),
            AIClient::Mock(b) => b.model(),
        }
    }

    fn host(&self) -> &str {
        match self {
            AIClient::Ollama(b) => b.host(),
            AIClient::OpenAICompatible(b) => b.host(),
            AIClient::Mock(b) => b.host(),
        }
    }
}

/// Render the FD insights prompt from a shared library
pub(crate) fn render_prompt(
    prompts: &RwLock<PromptLibrary>,
    params: &ValidParameters,
) -> Result<RenderedPrompt> {
    let mut library = prompts
        .write()
        .map_err(|_| Error::Prompt("Prompt library lock poisoned".to_string()))?;
    Ok(library.get(PromptId::FdInsights)?.render_for(params))
}

//! FD Insights Core Library
//!
//! Shared functionality for the FD Insights fixed deposit calculator:
//! - Investment parameter validation
//! - Compound interest calculator
//! - Insight gateway over pluggable local AI backends (Ollama, OpenAI-compatible)
//! - Prompt library for customizable AI prompts
//! - Generation settings
//! - INR currency formatting

pub mod ai;
pub mod calculator;
pub mod error;
pub mod format;
pub mod gateway;
pub mod models;
pub mod prompts;
pub mod settings;

/// Test utilities including a mock model server
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use ai::{
    AIClient, BackendInfo, InsightBackend, InsightsOutput, MockBackend, MockBehavior,
    OllamaBackend, OpenAICompatibleBackend,
};
pub use calculator::{calculate, calculate_with_delay};
pub use error::{Error, Result};
pub use format::format_inr;
pub use gateway::{Insight, InsightFailure, InsightGateway, InsightResult};
pub use models::{
    CalculationResult, CompoundingFrequency, FieldError, InvestmentParameters, ParameterInput,
    ValidParameters, ValidationErrors,
};
pub use prompts::{Prompt, PromptId, PromptInfo, PromptLibrary};
pub use settings::Settings;

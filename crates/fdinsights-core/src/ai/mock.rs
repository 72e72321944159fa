//! Mock backend for testing
//!
//! Provides configurable responses without a running LLM server. Every clone
//! shares one call counter, so a mock handed to a gateway can still be
//! inspected afterwards.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::models::ValidParameters;

use super::types::InsightsOutput;
use super::InsightBackend;

/// What the mock does when asked for insights
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Canned advice mentioning the parameters
    Insights,
    /// Fixed text
    Text(String),
    /// A well-formed reply with blank text
    Empty,
    /// A transport-style failure
    Fail(String),
}

/// Mock AI backend for testing
#[derive(Clone)]
pub struct MockBackend {
    /// Whether health_check should return true
    pub healthy: bool,
    behavior: MockBehavior,
    calls: Arc<AtomicUsize>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    /// Create a new mock backend (healthy, canned insights)
    pub fn new() -> Self {
        Self::with_behavior(MockBehavior::Insights)
    }

    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            healthy: true,
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Mock that returns the given text
    pub fn with_text(text: &str) -> Self {
        Self::with_behavior(MockBehavior::Text(text.to_string()))
    }

    /// Mock whose replies carry no usable text
    pub fn empty() -> Self {
        Self::with_behavior(MockBehavior::Empty)
    }

    /// Mock whose calls fail
    pub fn failing(message: &str) -> Self {
        Self::with_behavior(MockBehavior::Fail(message.to_string()))
    }

    /// Create an unhealthy mock backend
    pub fn unhealthy() -> Self {
        Self {
            healthy: false,
            ..Self::new()
        }
    }

    /// Create a new instance with a different model (no-op for mock)
    pub fn with_model(&self, _model: &str) -> Self {
        self.clone()
    }

    /// Number of `generate_insights` calls made so far, across all clones
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl InsightBackend for MockBackend {
    async fn generate_insights(&self, params: &ValidParameters) -> Result<InsightsOutput> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match &self.behavior {
            MockBehavior::Insights => Ok(InsightsOutput::new(format!(
                "With ₹{} at {}% for {} years compounded {}, compare rates from small finance \
                 banks and consider a 5-year tax-saver FD for Section 80C benefits. Interest is \
                 taxed at your slab rate, so submit Form 15G/15H if eligible to avoid TDS.",
                params.principal(),
                params.annual_rate(),
                params.term_years(),
                params.compounding_frequency()
            ))),
            MockBehavior::Text(text) => Ok(InsightsOutput::new(text.as_str())),
            MockBehavior::Empty => Ok(InsightsOutput::default()),
            MockBehavior::Fail(message) => Err(Error::InvalidData(message.clone())),
        }
    }

    async fn health_check(&self) -> bool {
        self.healthy
    }

    fn model(&self) -> &str {
        "mock"
    }

    fn host(&self) -> &str {
        "mock://localhost"
    }
}

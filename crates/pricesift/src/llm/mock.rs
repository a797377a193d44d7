//! Mock LLM provider for testing.

use std::sync::atomic::{AtomicUsize, Ordering};

use crate::error::LlmError;

use super::provider::{LlmConfig, LlmProvider};

/// What the mock does when asked for a completion.
#[derive(Debug, Clone)]
pub enum MockBehavior {
    /// Reply with this text.
    Respond(String),
    /// Fail as if the configured timeout elapsed.
    Timeout,
    /// Fail as if the service could not be reached.
    Unreachable,
}

/// Mock LLM provider that returns scripted responses and counts calls.
pub struct MockProvider {
    behavior: MockBehavior,
    config: LlmConfig,
    calls: AtomicUsize,
}

impl MockProvider {
    /// Create a mock that always replies with `response`.
    pub fn responding(response: impl Into<String>) -> Self {
        Self::with_behavior(MockBehavior::Respond(response.into()))
    }

    /// Create a mock whose every request times out.
    pub fn timing_out() -> Self {
        Self::with_behavior(MockBehavior::Timeout)
    }

    /// Create a mock whose every request fails to connect.
    pub fn unreachable() -> Self {
        Self::with_behavior(MockBehavior::Unreachable)
    }

    /// Create with an explicit behavior.
    pub fn with_behavior(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            config: LlmConfig {
                model: "mock".to_string(),
                ..LlmConfig::default()
            },
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of completions requested so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl LlmProvider for MockProvider {
    fn complete(&self, _prompt: &str) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MockBehavior::Respond(text) => Ok(text.clone()),
            MockBehavior::Timeout => Err(LlmError::Timeout(self.config.timeout)),
            MockBehavior::Unreachable => {
                Err(LlmError::Transport("mock service unreachable".to_string()))
            }
        }
    }

    fn config(&self) -> &LlmConfig {
        &self.config
    }

    fn name(&self) -> &str {
        "mock"
    }
}

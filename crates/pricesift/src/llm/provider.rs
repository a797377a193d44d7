//! LLM provider trait and configuration.

use std::time::Duration;

use crate::error::LlmError;

/// Configuration for LLM providers.
#[derive(Debug, Clone)]
pub struct LlmConfig {
    /// Model to use (e.g., "gpt-4o-mini").
    pub model: String,

    /// Maximum tokens in response.
    pub max_tokens: usize,

    /// Temperature for generation (0.0-1.0).
    pub temperature: f64,

    /// Upper bound on one request, connection included.
    pub timeout: Duration,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            max_tokens: 256,
            temperature: 0.0,
            timeout: Duration::from_secs(30),
        }
    }
}

/// A text-completion service.
///
/// Implementations must be thread-safe (Send + Sync) so a single long-lived
/// client can be shared by every ingestion in the process.
pub trait LlmProvider: Send + Sync {
    /// Send one user prompt and return the model's text reply.
    ///
    /// Makes exactly one request; callers decide what to do on failure.
    fn complete(&self, prompt: &str) -> Result<String, LlmError>;

    /// Get the configuration for this provider.
    fn config(&self) -> &LlmConfig;

    /// Get the name of this provider (for logging/debugging).
    fn name(&self) -> &str;
}

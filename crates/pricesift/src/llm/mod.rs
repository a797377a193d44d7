//! LLM provider integration for delegated column classification.
//!
//! A provider is a long-lived client built once at startup and shared by every
//! ingestion through an `Arc<dyn LlmProvider>`. Ingestion works fully without
//! one: the heuristic classifier covers every table the keywords can explain.
//!
//! # Supported Providers
//!
//! - **OpenAI** - GPT models via API (requires `OPENAI_API_KEY`)
//! - **Anthropic** - Claude models via API (requires `ANTHROPIC_API_KEY`)
//! - **Ollama** - Local models, no API key needed (requires Ollama installed)
//! - **Mock** - Scripted responses for tests
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use pricesift::{IngestionPipeline, LlmConfig, OpenAIProvider};
//!
//! let provider = OpenAIProvider::from_env(LlmConfig::default()).unwrap();
//! let pipeline = IngestionPipeline::new().with_llm(Arc::new(provider));
//! ```

mod anthropic;
mod mock;
mod ollama;
mod openai;
mod prompts;
mod provider;

pub use anthropic::{AnthropicProvider, DEFAULT_MODEL as ANTHROPIC_DEFAULT_MODEL};
pub use mock::{MockBehavior, MockProvider};
pub use ollama::OllamaProvider;
pub use openai::OpenAIProvider;
pub use prompts::{column_roles_prompt, system_prompt};
pub use provider::{LlmConfig, LlmProvider};

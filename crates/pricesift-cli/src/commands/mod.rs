//! CLI command implementations.

pub mod ingest;
pub mod inspect;
pub mod rows;

use std::error::Error;
use std::sync::Arc;
use std::time::Duration;

use pricesift::llm::ANTHROPIC_DEFAULT_MODEL;
use pricesift::{
    AnthropicProvider, CancelFlag, LlmConfig, LlmProvider, MockProvider, OllamaProvider,
    OpenAIProvider,
};

use crate::cli::{LlmArgs, LlmProviderChoice};

/// Build the provider selected on the command line, if any.
pub fn build_provider(args: &LlmArgs) -> Result<Option<Arc<dyn LlmProvider>>, Box<dyn Error>> {
    let default_model = match args.llm {
        LlmProviderChoice::Anthropic => ANTHROPIC_DEFAULT_MODEL.to_string(),
        LlmProviderChoice::Ollama => "llama3.2".to_string(),
        _ => LlmConfig::default().model,
    };
    let config = LlmConfig {
        model: args.model.clone().unwrap_or(default_model),
        timeout: Duration::from_secs(args.timeout),
        ..LlmConfig::default()
    };

    let provider: Arc<dyn LlmProvider> = match args.llm {
        LlmProviderChoice::None => return Ok(None),
        LlmProviderChoice::OpenAI => Arc::new(OpenAIProvider::from_env(config)?),
        LlmProviderChoice::Anthropic => Arc::new(AnthropicProvider::from_env(config)?),
        LlmProviderChoice::Ollama => Arc::new(OllamaProvider::with_config(config)?),
        LlmProviderChoice::Mock => Arc::new(MockProvider::timing_out()),
    };

    tracing::debug!(provider = provider.name(), model = %provider.config().model, "LLM provider ready");
    Ok(Some(provider))
}

/// Cancel flag raised by Ctrl-C.
pub fn cancel_on_ctrlc() -> Result<CancelFlag, Box<dyn Error>> {
    let cancel = CancelFlag::new();
    let handler_flag = cancel.clone();
    ctrlc::set_handler(move || handler_flag.cancel())?;
    Ok(cancel)
}

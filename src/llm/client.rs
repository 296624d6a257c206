use async_trait::async_trait;

use crate::config::Settings;
use crate::llm::openrouter::OpenRouterClient;
use crate::{Result, SlidecraftError};

/// Chat-completion request payload.
pub struct CompletionRequest<'a> {
    pub system: &'a str,
    pub prompt: &'a str,
}

#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Return the text of the first completion, or `SlidecraftError::Llm`.
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String>;

    /// System instruction sent ahead of every prompt.
    fn system_prompt(&self) -> &str;
}

/// Build an LLM provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn LlmProvider>> {
    match settings.llm.provider.to_lowercase().as_str() {
        "openrouter" => Ok(Box::new(OpenRouterClient::from_settings(settings)?)),
        other => Err(SlidecraftError::Config(format!(
            "Unsupported llm.provider '{}'. Supported providers: openrouter",
            other
        ))),
    }
}

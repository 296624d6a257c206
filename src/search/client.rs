use async_trait::async_trait;

use crate::config::Settings;
use crate::search::serpapi::SerpApiClient;
use crate::{Result, SlidecraftError};

#[async_trait]
pub trait SearchProvider: Send + Sync {
    /// Return the snippet text of each result, in provider order.
    async fn search(&self, query: &str) -> Result<Vec<String>>;
}

/// Build a search provider from runtime settings.
pub fn build_provider(settings: &Settings) -> Result<Box<dyn SearchProvider>> {
    match settings.search.provider.to_lowercase().as_str() {
        "serpapi" => Ok(Box::new(SerpApiClient::from_settings(settings)?)),
        other => Err(SlidecraftError::Config(format!(
            "Unsupported search.provider '{}'. Supported providers: serpapi",
            other
        ))),
    }
}

/// Join snippets into the context block embedded in the prompt.
pub fn join_snippets(snippets: &[String]) -> String {
    snippets.join("\n")
}

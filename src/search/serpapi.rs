use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use crate::config::{Settings, SEARCH_API_KEY_ENV};
use crate::search::client::SearchProvider;
use crate::{Result, SlidecraftError};

const DEFAULT_SERPAPI_ENDPOINT: &str = "https://serpapi.com/search.json";

pub struct SerpApiClient {
    http: Client,
    api_key: String,
    engine: String,
    num_results: u32,
    endpoint: String,
}

impl SerpApiClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.search.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SlidecraftError::Config(format!(
                "SerpApi API key is missing. Set search.api_key in config or {}.",
                SEARCH_API_KEY_ENV
            )));
        }

        let endpoint = if settings.search.endpoint.trim().is_empty() {
            DEFAULT_SERPAPI_ENDPOINT.to_string()
        } else {
            settings.search.endpoint.trim().to_string()
        };

        let mut builder = Client::builder();
        if settings.search.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.search.timeout_secs));
        }
        let http = builder.build().map_err(|e| {
            SlidecraftError::Config(format!("Failed to build search HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            api_key,
            engine: settings.search.engine.trim().to_string(),
            num_results: settings.search.num_results,
            endpoint,
        })
    }

    fn query_params(&self, query: &str) -> [(&'static str, String); 4] {
        [
            ("q", query.to_string()),
            ("api_key", self.api_key.clone()),
            ("engine", self.engine.clone()),
            ("num", self.num_results.to_string()),
        ]
    }
}

#[async_trait]
impl SearchProvider for SerpApiClient {
    async fn search(&self, query: &str) -> Result<Vec<String>> {
        tracing::debug!(
            endpoint = %self.endpoint,
            engine = %self.engine,
            num = self.num_results,
            "Sending search request"
        );

        let response = self
            .http
            .get(&self.endpoint)
            .query(&self.query_params(query))
            .send()
            .await
            .map_err(|e| SlidecraftError::Search(format!("request failed: {}", e)))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SlidecraftError::Search(format!("failed to read response: {}", e)))?;

        let payload = parse_response(&body).map_err(|e| {
            if status.is_success() {
                e
            } else {
                SlidecraftError::Search(format!("provider returned status {}: {}", status, body))
            }
        })?;

        if let Some(error) = payload.error.as_deref() {
            return Err(SlidecraftError::Search(format!(
                "provider returned status {}: {}",
                status, error
            )));
        }
        if !status.is_success() {
            return Err(SlidecraftError::Search(format!(
                "provider returned status {}",
                status
            )));
        }

        let snippets = extract_snippets(&payload);
        if snippets.is_empty() {
            tracing::warn!("Search returned no snippets for '{}'", query);
        } else {
            tracing::info!(
                "Search returned {} snippets from {} results",
                snippets.len(),
                payload.organic_results.len()
            );
        }

        Ok(snippets)
    }
}

/// Search response document. Only the fields the pipeline reads are modelled.
#[derive(Debug, Default, Deserialize)]
pub struct SerpApiResponse {
    #[serde(default)]
    pub organic_results: Vec<OrganicResult>,

    /// Set by the provider instead of results when the request is rejected.
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct OrganicResult {
    #[serde(default)]
    pub snippet: Option<String>,
}

fn parse_response(body: &str) -> Result<SerpApiResponse> {
    serde_json::from_str(body)
        .map_err(|e| SlidecraftError::Search(format!("failed to parse response: {}", e)))
}

/// Snippets of the organic results that carry one, in provider order.
pub fn extract_snippets(response: &SerpApiResponse) -> Vec<String> {
    response
        .organic_results
        .iter()
        .filter_map(|r| r.snippet.clone())
        .collect()
}

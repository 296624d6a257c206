use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::{Settings, LLM_API_KEY_ENV};
use crate::llm::client::{CompletionRequest, LlmProvider};
use crate::llm::prompts::DEFAULT_SYSTEM_PROMPT;
use crate::{Result, SlidecraftError};

const DEFAULT_OPENROUTER_ENDPOINT: &str = "https://openrouter.ai/api/v1";
const DEFAULT_OPENROUTER_MODEL: &str = "mistralai/mistral-7b-instruct";

pub struct OpenRouterClient {
    http: Client,
    api_key: String,
    model: String,
    endpoint: String,
    referer: Option<String>,
    system_prompt: String,
}

impl OpenRouterClient {
    pub fn from_settings(settings: &Settings) -> Result<Self> {
        let api_key = settings.llm.api_key.trim().to_string();
        if api_key.is_empty() {
            return Err(SlidecraftError::Config(format!(
                "OpenRouter API key is missing. Set llm.api_key in config or {}.",
                LLM_API_KEY_ENV
            )));
        }

        let model = non_empty_or(&settings.llm.model, DEFAULT_OPENROUTER_MODEL);
        let endpoint = non_empty_or(&settings.llm.endpoint, DEFAULT_OPENROUTER_ENDPOINT)
            .trim_end_matches('/')
            .to_string();
        let system_prompt = non_empty_or(&settings.llm.system_prompt, DEFAULT_SYSTEM_PROMPT);

        let referer = Some(settings.llm.referer.trim())
            .filter(|r| !r.is_empty())
            .map(str::to_string);

        let mut builder = Client::builder();
        if settings.llm.timeout_secs > 0 {
            builder = builder.timeout(Duration::from_secs(settings.llm.timeout_secs));
        }
        let http = builder.build().map_err(|e| {
            SlidecraftError::Config(format!("Failed to build OpenRouter HTTP client: {}", e))
        })?;

        Ok(Self {
            http,
            api_key,
            model,
            endpoint,
            referer,
            system_prompt,
        })
    }

    fn request_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint)
    }

    fn request_body<'a>(&'a self, request: &CompletionRequest<'a>) -> ChatCompletionRequest<'a> {
        ChatCompletionRequest {
            model: &self.model,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: request.system,
                },
                ChatMessage {
                    role: "user",
                    content: request.prompt,
                },
            ],
        }
    }
}

#[async_trait]
impl LlmProvider for OpenRouterClient {
    async fn complete(&self, request: CompletionRequest<'_>) -> Result<String> {
        let body = self.request_body(&request);
        tracing::debug!(url = %self.request_url(), model = %self.model, "Sending completion request");

        let mut builder = self
            .http
            .post(self.request_url())
            .bearer_auth(&self.api_key)
            .json(&body);
        if let Some(referer) = &self.referer {
            builder = builder.header("HTTP-Referer", referer);
        }

        let response = builder.send().await.map_err(|e| SlidecraftError::Llm {
            message: format!("request failed: {}", e),
            body: None,
        })?;

        let status = response.status();
        let text = response.text().await.map_err(|e| SlidecraftError::Llm {
            message: format!("failed to read response: {}", e),
            body: None,
        })?;

        if !status.is_success() {
            return Err(SlidecraftError::Llm {
                message: format!("provider returned status {}", status),
                body: Some(text),
            });
        }

        let content = parse_completion(&text)?;
        tracing::info!("Received completion ({} chars)", content.len());
        Ok(content)
    }

    fn system_prompt(&self) -> &str {
        &self.system_prompt
    }
}

/// Extract the first choice's message content from a chat-completion response body.
pub fn parse_completion(body: &str) -> Result<String> {
    let payload: ChatCompletionResponse =
        serde_json::from_str(body).map_err(|e| SlidecraftError::Llm {
            message: format!("failed to parse response: {}", e),
            body: Some(body.to_string()),
        })?;

    if let Some(error) = payload.error {
        return Err(SlidecraftError::Llm {
            message: error.message,
            body: Some(body.to_string()),
        });
    }

    payload
        .choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or_else(|| SlidecraftError::Llm {
            message: "response did not contain a completion".to_string(),
            body: Some(body.to_string()),
        })
}

fn non_empty_or(value: &str, default: &str) -> String {
    let value = value.trim();
    if value.is_empty() {
        default.to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
    #[serde(default)]
    error: Option<ChatError>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ChatError {
    message: String,
}

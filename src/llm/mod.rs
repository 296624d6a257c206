//! LLM module for slidecraft
//!
//! Drafts slide content from a topic and search context using a chat-completion API.

mod client;
mod openrouter;
pub mod prompts;

pub use client::{build_provider, CompletionRequest, LlmProvider};
pub use openrouter::{parse_completion, OpenRouterClient};

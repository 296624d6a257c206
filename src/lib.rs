//! slidecraft - Turn a topic into a PowerPoint deck
//!
//! Searches the web for a topic, asks an LLM to draft slide content from the
//! snippets, and writes the result as a `.pptx` file.

pub mod cli;
pub mod config;
pub mod deck;
pub mod llm;
pub mod pipeline;
pub mod search;

use thiserror::Error;

/// Main error type for slidecraft
#[derive(Error, Debug)]
pub enum SlidecraftError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Search error: {0}")]
    Search(String),

    /// The chat-completion call failed. `body` holds the raw response, if any.
    #[error("LLM error: {message}{}", response_suffix(.body))]
    Llm {
        message: String,
        body: Option<String>,
    },

    #[error("Deck error: {0}")]
    Deck(String),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn response_suffix(body: &Option<String>) -> String {
    match body {
        Some(body) if !body.trim().is_empty() => format!("\nResponse: {}", body.trim()),
        _ => String::new(),
    }
}

pub type Result<T> = std::result::Result<T, SlidecraftError>;

/// Application name
pub const APP_NAME: &str = "slidecraft";

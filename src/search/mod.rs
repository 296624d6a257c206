//! Web search module for slidecraft
//!
//! Fetches organic result snippets that ground the LLM prompt.

mod client;
mod serpapi;

pub use client::{build_provider, join_snippets, SearchProvider};
pub use serpapi::{extract_snippets, OrganicResult, SerpApiClient, SerpApiResponse};

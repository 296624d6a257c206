//! Configuration module for slidecraft
//!
//! Handles loading settings from a TOML file with environment overrides for API keys.

mod settings;

pub use settings::{Settings, LLM_API_KEY_ENV, SEARCH_API_KEY_ENV};

//! Application settings management

use anyhow::{Context, Result};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Environment variable consulted when `search.api_key` is empty.
pub const SEARCH_API_KEY_ENV: &str = "SERPAPI_API_KEY";

/// Environment variable consulted when `llm.api_key` is empty.
pub const LLM_API_KEY_ENV: &str = "OPENROUTER_API_KEY";

/// Main application settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Settings {
    /// General settings
    #[serde(default)]
    pub general: GeneralSettings,

    /// Web search settings
    #[serde(default)]
    pub search: SearchSettings,

    /// LLM settings
    #[serde(default)]
    pub llm: LlmSettings,

    /// Deck output settings
    #[serde(default)]
    pub deck: DeckSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralSettings {
    /// Log level (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchSettings {
    /// Search provider (serpapi)
    #[serde(default = "default_search_provider")]
    pub provider: String,

    /// API key for the search provider
    #[serde(default)]
    pub api_key: String,

    /// Search engine selector passed to the provider
    #[serde(default = "default_search_engine")]
    pub engine: String,

    /// Number of organic results to request
    #[serde(default = "default_num_results")]
    pub num_results: u32,

    /// API endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Request timeout in seconds (0 = no client-side timeout)
    #[serde(default = "default_search_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    /// LLM provider (openrouter)
    #[serde(default = "default_llm_provider")]
    pub provider: String,

    /// API key (bearer token)
    #[serde(default)]
    pub api_key: String,

    /// Model name
    #[serde(default = "default_llm_model")]
    pub model: String,

    /// API base endpoint (empty = provider default)
    #[serde(default)]
    pub endpoint: String,

    /// Optional HTTP-Referer header sent with each request
    #[serde(default)]
    pub referer: String,

    /// System instruction (empty = built-in default)
    #[serde(default)]
    pub system_prompt: String,

    /// Request timeout in seconds (0 = no client-side timeout)
    #[serde(default = "default_llm_timeout")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeckSettings {
    /// Number of slides requested from the LLM
    #[serde(default = "default_slide_count")]
    pub slide_count: usize,

    /// Directory where generated decks are written
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
}

// Default value functions

fn default_log_level() -> String {
    "info".to_string()
}

fn default_search_provider() -> String {
    "serpapi".to_string()
}

fn default_search_engine() -> String {
    "google".to_string()
}

fn default_num_results() -> u32 {
    5
}

fn default_search_timeout() -> u64 {
    30
}

fn default_llm_provider() -> String {
    "openrouter".to_string()
}

fn default_llm_model() -> String {
    "mistralai/mistral-7b-instruct".to_string()
}

fn default_llm_timeout() -> u64 {
    120
}

fn default_slide_count() -> usize {
    5
}

fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}

impl Default for GeneralSettings {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            api_key: String::new(),
            engine: default_search_engine(),
            num_results: default_num_results(),
            endpoint: String::new(),
            timeout_secs: default_search_timeout(),
        }
    }
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            provider: default_llm_provider(),
            api_key: String::new(),
            model: default_llm_model(),
            endpoint: String::new(),
            referer: String::new(),
            system_prompt: String::new(),
            timeout_secs: default_llm_timeout(),
        }
    }
}

impl Default for DeckSettings {
    fn default() -> Self {
        Self {
            slide_count: default_slide_count(),
            output_dir: default_output_dir(),
        }
    }
}

impl Settings {
    /// Load settings from the configuration file
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;
        Self::load_from(&config_path)
    }

    /// Load settings from an explicit path, falling back to defaults when it is absent.
    pub fn load_from(config_path: &Path) -> Result<Self> {
        if !config_path.exists() {
            let mut settings = Self::default();
            settings.apply_env_overrides();
            return Ok(settings);
        }

        let content = std::fs::read_to_string(config_path)
            .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

        let mut settings: Settings = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

        settings.apply_env_overrides();

        Ok(settings)
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        fill_from_env(&mut self.search.api_key, SEARCH_API_KEY_ENV);
        fill_from_env(&mut self.llm.api_key, LLM_API_KEY_ENV);
    }

    /// Get the path to the configuration file
    pub fn config_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("com", "slidecraft", "slidecraft")
            .context("Could not determine config directory")?;

        let config_dir = dirs.config_dir();
        Ok(config_dir.join("config.toml"))
    }

    /// Write default configuration to a file
    pub fn write_default(path: &Path) -> Result<()> {
        let settings = Self::default();
        let content = toml::to_string_pretty(&settings)?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        std::fs::write(path, content)?;
        Ok(())
    }

    /// Resolve where a deck for `file_name` should be written.
    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.deck.output_dir.join(file_name)
    }
}

fn fill_from_env(slot: &mut String, var: &str) {
    if !slot.trim().is_empty() {
        return;
    }
    if let Ok(value) = std::env::var(var) {
        if !value.trim().is_empty() {
            *slot = value;
        }
    }
}

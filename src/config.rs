//! Runtime settings.
//!
//! Layered with `figment`: built-in defaults, then an optional TOML file, then
//! `RESEARCH_`-prefixed environment variables (`__` separates nesting levels,
//! e.g. `RESEARCH_RESEARCH__MAX_CONTENT_CHARS=4000`). The usual
//! `OPENAI_API_KEY` and `TAVILY_API_KEY` variables are honoured as well.

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::error::ConfigError;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub llm: LlmSettings,
    pub search: SearchSettings,
    pub research: ResearchSettings,
    pub server: ServerSettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    pub model: String,
    pub temperature: f64,
    pub summary_max_tokens: u64,
    pub api_key: Option<String>,
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            temperature: 0.3,
            summary_max_tokens: 500,
            api_key: None,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchBackend {
    /// Tavily when an API key is configured, DuckDuckGo otherwise.
    #[default]
    Auto,
    Tavily,
    DuckDuckGo,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchSettings {
    pub provider: SearchBackend,
    pub tavily_api_key: Option<String>,
    pub tavily_endpoint: String,
    pub duckduckgo_endpoint: String,
}

impl Default for SearchSettings {
    fn default() -> Self {
        Self {
            provider: SearchBackend::Auto,
            tavily_api_key: None,
            tavily_endpoint: "https://api.tavily.com/search".to_string(),
            duckduckgo_endpoint: "https://html.duckduckgo.com/html/".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchSettings {
    pub min_sources: usize,
    pub max_sources: usize,
    pub default_sources: usize,
    pub max_topic_length: usize,
    pub fetch_timeout_secs: u64,
    /// Per-source content budget, roughly 2000 tokens.
    pub max_content_chars: usize,
    /// 1 processes sources one at a time.
    pub max_concurrent_sources: usize,
    pub request_timeout_secs: Option<u64>,
    pub progress_poll_interval_ms: u64,
}

impl Default for ResearchSettings {
    fn default() -> Self {
        Self {
            min_sources: 3,
            max_sources: 10,
            default_sources: 5,
            max_topic_length: 500,
            fetch_timeout_secs: 15,
            max_content_chars: 8000,
            max_concurrent_sources: 1,
            request_timeout_secs: None,
            progress_poll_interval_ms: 500,
        }
    }
}

impl ResearchSettings {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn progress_poll_interval(&self) -> Duration {
        Duration::from_millis(self.progress_poll_interval_ms)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

impl ServerSettings {
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

/// Build the layered figment without extracting it.
pub fn figment(config_file: Option<&Path>) -> Figment {
    let mut figment = Figment::from(Serialized::defaults(Settings::default()));

    if let Some(path) = config_file {
        figment = figment.merge(Toml::file(path));
    }

    figment
        .merge(Env::prefixed("RESEARCH_").split("__"))
        .merge(
            Env::raw()
                .only(&["OPENAI_API_KEY"])
                .map(|_| "llm.api_key".into()),
        )
        .merge(
            Env::raw()
                .only(&["TAVILY_API_KEY"])
                .map(|_| "search.tavily_api_key".into()),
        )
}

/// Load settings, reading a `.env` file first when one is present.
pub fn load_settings(config_file: Option<&Path>) -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();
    figment(config_file)
        .extract()
        .map_err(|e| ConfigError::Load(Box::new(e)))
}

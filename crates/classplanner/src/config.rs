/// Configuration for the planner server
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::info;

use crate::error::{Result, ScheduleError};
use crate::offering::TrailingLecture;

/// Environment variable naming a JSON config file
pub const CONFIG_PATH_ENV: &str = "CLASSPLANNER_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// SQLite file holding saved offerings
    pub db_path: String,
    /// Term code searched when a request does not name one (e.g. "2251")
    pub term: String,
    pub provider: ProviderConfig,
    pub suggestion: SuggestionConfig,
    pub search_cache_ttl_secs: u64,
    pub trailing_lecture: TrailingLecture,
}

/// Course-data provider endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

/// Text-generation service used for schedule suggestions
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuggestionConfig {
    /// OpenAI-compatible API root; `/chat/completions` is appended
    pub base_url: String,
    pub model: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    pub timeout_secs: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
            db_path: "classplanner.db".to_string(),
            term: "2251".to_string(),
            provider: ProviderConfig::default(),
            suggestion: SuggestionConfig::default(),
            search_cache_ttl_secs: 30 * 60,
            trailing_lecture: TrailingLecture::default(),
        }
    }
}

impl Default for ProviderConfig {
    fn default() -> Self {
        ProviderConfig {
            base_url: "http://127.0.0.1:8000/course".to_string(),
            timeout_secs: 30,
        }
    }
}

impl Default for SuggestionConfig {
    fn default() -> Self {
        SuggestionConfig {
            base_url: "https://openrouter.ai/api/v1".to_string(),
            model: "openai/gpt-4o-mini".to_string(),
            api_key_env: "OPENROUTER_API_KEY".to_string(),
            timeout_secs: 60,
        }
    }
}

impl AppConfig {
    /// Loads configuration from a JSON file. Missing fields take defaults.
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| ScheduleError::Config {
            message: format!("Failed to read {}: {}", path.display(), e),
        })?;
        Self::from_json(&content)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        serde_json::from_str(content).map_err(|e| ScheduleError::Config {
            message: format!("Invalid config: {}", e),
        })
    }

    /// Builds the configuration from the file named by `CLASSPLANNER_CONFIG`
    /// (if set), then applies `HOST`, `PORT`, `DATABASE_PATH` and
    /// `CLASSPLANNER_TERM` overrides.
    pub fn from_env() -> Result<Self> {
        let mut config = match env::var(CONFIG_PATH_ENV) {
            Ok(path) => {
                info!(path = %path, "Loading config file");
                Self::load_from_file(Path::new(&path))?
            }
            Err(_) => AppConfig::default(),
        };
        config.apply_overrides(|name| env::var(name).ok())?;
        Ok(config)
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(host) = var("HOST") {
            self.host = host;
        }
        if let Some(port) = var("PORT") {
            self.port = port.parse().map_err(|_| ScheduleError::Config {
                message: format!("PORT is not a valid port: {:?}", port),
            })?;
        }
        if let Some(path) = var("DATABASE_PATH") {
            self.db_path = path;
        }
        if let Some(term) = var("CLASSPLANNER_TERM") {
            self.term = term;
        }
        Ok(())
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    pub fn search_cache_ttl(&self) -> Duration {
        Duration::from_secs(self.search_cache_ttl_secs)
    }
}

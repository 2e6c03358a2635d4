//! Study Buddy Configuration
//!
//! Config file: $XDG_CONFIG_HOME/study-buddy/config.toml (usually ~/.config/study-buddy/config.toml)
//!
//! The access credential never lives in code. It is resolved once, when the
//! HTTP transport is built, from either an inline `api_key` or the
//! environment variable named by `api_key_env`.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// GitHub Models chat completions endpoint
pub const DEFAULT_ENDPOINT: &str = "https://models.inference.ai.azure.com/chat/completions";

/// Model candidates, tried in order
pub const DEFAULT_MODELS: &[&str] = &["gpt-4o", "gpt-4o-mini", "Phi-3-medium-4k-instruct"];

pub const DEFAULT_API_KEY_ENV: &str = "GITHUB_TOKEN";

pub const DEFAULT_HISTORY_LIMIT: usize = 50;

/// LLM backend configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// OpenAI-compatible chat completions URL
    pub endpoint: String,

    /// Ordered model candidate list
    pub models: Vec<String>,

    /// Sampling temperature (kept low for repeatable JSON)
    pub temperature: f64,

    /// Output length cap per completion
    pub max_tokens: u32,

    /// Request timeout; `None` leaves the transport default in place
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Environment variable holding the bearer token
    pub api_key_env: String,

    /// Inline token, takes precedence over `api_key_env`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            models: DEFAULT_MODELS.iter().map(|m| m.to_string()).collect(),
            temperature: 0.2,
            max_tokens: 1000,
            timeout_secs: None,
            api_key_env: DEFAULT_API_KEY_ENV.to_string(),
            api_key: None,
        }
    }
}

impl LlmConfig {
    /// Resolve the access credential (inline key first, then environment)
    ///
    /// Returns `None` when neither source yields a non-blank value.
    pub fn resolve_api_key(&self) -> Option<String> {
        if let Some(key) = self.api_key.as_deref().map(str::trim) {
            if !key.is_empty() {
                return Some(key.to_string());
            }
        }

        std::env::var(&self.api_key_env)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }
}

/// Activity log storage configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory holding the key-value files
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Maximum history entries kept
    pub history_limit: usize,

    /// Maximum quiz score entries kept; 0 keeps every score
    pub quiz_score_limit: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            quiz_score_limit: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl StorageConfig {
    /// Quiz score cap as an option, `None` meaning unbounded
    pub fn quiz_score_cap(&self) -> Option<usize> {
        (self.quiz_score_limit > 0).then_some(self.quiz_score_limit)
    }

    /// Effective data directory: configured path, else $XDG_DATA_HOME/study-buddy
    pub fn resolved_data_dir(&self) -> PathBuf {
        if let Some(dir) = &self.data_dir {
            return dir.clone();
        }

        dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("study-buddy")
    }
}

/// Main Study Buddy configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StudyConfig {
    #[serde(default)]
    pub llm: LlmConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

impl StudyConfig {
    /// Get default user config path: $XDG_CONFIG_HOME/study-buddy/config.toml
    pub fn user_config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Cannot determine config directory")?;
        Ok(config_dir.join("study-buddy").join("config.toml"))
    }

    /// Load configuration
    ///
    /// Priority:
    /// 1. Explicit path (must exist)
    /// 2. User config
    /// 3. Defaults
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        if let Some(path) = explicit {
            return Self::load_from(path);
        }

        if let Ok(user_path) = Self::user_config_path() {
            if user_path.exists() {
                return Self::load_from(&user_path);
            }
        }

        Ok(Self::default())
    }

    /// Load configuration from a specific file
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        Self::from_toml(&contents).with_context(|| format!("Failed to parse {}", path.display()))
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save configuration to the given file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory {}", parent.display()))?;
        }

        let toml_string =
            toml::to_string_pretty(self).context("Failed to serialize configuration")?;

        fs::write(path, toml_string)
            .with_context(|| format!("Failed to write {}", path.display()))?;

        Ok(())
    }

    /// Copy with the inline credential masked, for display
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if copy.llm.api_key.is_some() {
            copy.llm.api_key = Some("********".to_string());
        }
        copy
    }
}

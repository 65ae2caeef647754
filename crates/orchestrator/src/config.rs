//! Configuration for the recommendation chain.
//!
//! Values come from three layers, later ones winning:
//! 1. defaults (below) or a TOML file
//! 2. environment (`DATABRICKS_HOST`, `DATABRICKS_TOKEN`)
//! 3. command-line flags (`ModelOverrides`)

use std::path::Path;
use std::time::Duration;

use providers::{ChatModelSettings, WikipediaSettings, YoutubeSettings};
use serde::Deserialize;
use thiserror::Error;

pub const HOST_ENV: &str = "DATABRICKS_HOST";
pub const TOKEN_ENV: &str = "DATABRICKS_TOKEN";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration, mapping directly to the TOML file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ChainConfig {
    pub model: ModelConfig,
    pub encyclopedia: EncyclopediaConfig,
    pub video: VideoConfig,
    /// Per-request timeout for every external call.
    pub timeout_secs: u64,
}

/// The hosted language model (a Databricks-style serving endpoint).
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ModelConfig {
    /// Workspace URL, e.g. `https://my-workspace.cloud.databricks.com`.
    pub host: String,
    pub endpoint: String,
    pub token: Option<String>,
    pub max_tokens: u32,
    pub temperature: Option<f32>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EncyclopediaConfig {
    pub base_url: String,
    pub top_k_results: usize,
    pub max_chars: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VideoBackend {
    Youtube,
    /// External program printing a list of links.
    Command,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct VideoConfig {
    pub backend: VideoBackend,
    pub base_url: String,
    pub max_results: usize,
    /// Program and leading arguments for the `command` backend.
    pub command: Vec<String>,
}

/// Model settings given on the command line; `None` keeps the current value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOverrides {
    pub host: Option<String>,
    pub token: Option<String>,
    pub endpoint: Option<String>,
    pub max_tokens: Option<u32>,
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            model: ModelConfig::default(),
            encyclopedia: EncyclopediaConfig::default(),
            video: VideoConfig::default(),
            timeout_secs: 60,
        }
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            host: String::new(),
            endpoint: "databricks-meta-llama-3-1-405b-instruct".to_string(),
            token: None,
            max_tokens: 500,
            temperature: None,
        }
    }
}

impl Default for EncyclopediaConfig {
    fn default() -> Self {
        Self {
            base_url: "https://en.wikipedia.org".to_string(),
            top_k_results: 3,
            max_chars: 4000,
        }
    }
}

impl Default for VideoConfig {
    fn default() -> Self {
        Self {
            backend: VideoBackend::Youtube,
            base_url: "https://www.youtube.com".to_string(),
            max_results: 2,
            command: Vec::new(),
        }
    }
}

impl ChainConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Override model host and token from the environment, when set.
    ///
    /// `lookup` is `std::env::var(..).ok()` in the binary.
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let non_empty = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        if let Some(host) = non_empty(HOST_ENV) {
            self.model.host = host;
        }
        if let Some(token) = non_empty(TOKEN_ENV) {
            self.model.token = Some(token);
        }
    }

    /// Apply command-line values on top of file and environment.
    pub fn apply_overrides(&mut self, overrides: ModelOverrides) {
        if let Some(host) = overrides.host {
            self.model.host = host;
        }
        if let Some(token) = overrides.token {
            self.model.token = Some(token);
        }
        if let Some(endpoint) = overrides.endpoint {
            self.model.endpoint = endpoint;
        }
        if let Some(max_tokens) = overrides.max_tokens {
            self.model.max_tokens = max_tokens;
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.model.host.trim().is_empty() {
            return Err(ConfigError::Invalid(format!(
                "model host is not set (use --host or {HOST_ENV})"
            )));
        }
        if self.model.max_tokens == 0 {
            return Err(ConfigError::Invalid("max_tokens must be positive".into()));
        }
        if self.encyclopedia.top_k_results == 0 {
            return Err(ConfigError::Invalid("top_k_results must be positive".into()));
        }
        if self.video.max_results == 0 {
            return Err(ConfigError::Invalid("video max_results must be positive".into()));
        }
        if self.video.backend == VideoBackend::Command && self.video.command.is_empty() {
            return Err(ConfigError::Invalid(
                "video backend `command` needs a command to run".into(),
            ));
        }
        Ok(())
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn chat_settings(&self) -> ChatModelSettings {
        ChatModelSettings {
            api_url: self.model.invocations_url(),
            model: self.model.endpoint.clone(),
            api_key: self.model.token.clone(),
            max_tokens: self.model.max_tokens,
            temperature: self.model.temperature,
            timeout: self.timeout(),
        }
    }

    pub fn wikipedia_settings(&self) -> WikipediaSettings {
        WikipediaSettings {
            base_url: self.encyclopedia.base_url.clone(),
            top_k_results: self.encyclopedia.top_k_results,
            max_chars: self.encyclopedia.max_chars,
            timeout: self.timeout(),
        }
    }

    pub fn youtube_settings(&self) -> YoutubeSettings {
        YoutubeSettings {
            base_url: self.video.base_url.clone(),
            max_results: self.video.max_results,
            timeout: self.timeout(),
        }
    }
}

impl ModelConfig {
    /// `{host}/serving-endpoints/{endpoint}/invocations`
    pub fn invocations_url(&self) -> String {
        let host = self.host.trim_end_matches('/');
        let host = if host.starts_with("http://") || host.starts_with("https://") {
            host.to_string()
        } else {
            format!("https://{host}")
        };
        format!("{host}/serving-endpoints/{}/invocations", self.endpoint)
    }
}

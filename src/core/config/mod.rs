use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing_subscriber::filter::Directive;
use url::Url;

use crate::Result;

/// File consulted when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "mapdoc.toml";

/// Main mapdoc configuration loaded from mapdoc.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct MapdocConfig {
    /// Model API configuration
    #[serde(default)]
    pub api: ApiConfig,

    /// Output configuration
    #[serde(default)]
    pub output: OutputConfig,

    /// Code generation configuration
    #[serde(default)]
    pub generate: GenerateConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Model API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Base URL of the OpenAI-compatible endpoint
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier sent with each completion request
    #[serde(default = "default_model")]
    pub model: String,

    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,

    /// Inline API key, overriding the environment variable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
}

/// Output configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Directory where artifacts are written
    #[serde(default = "default_output_dir")]
    pub dir: PathBuf,
}

/// Code generation configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateConfig {
    /// Character count per mapping chunk sent to the model
    #[serde(default = "default_chunk_size")]
    pub chunk_size: usize,

    /// Path to the sample code file included in prompts
    #[serde(default = "default_sample_code")]
    pub sample_code: PathBuf,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Default tracing level when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Write logs to a file alongside the console
    #[serde(default)]
    pub file: bool,
}

// Default functions
fn default_base_url() -> String {
    "https://models.inference.ai.azure.com".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("output")
}

fn default_chunk_size() -> usize {
    1000
}

fn default_sample_code() -> PathBuf {
    PathBuf::from("resources/sample_code.py")
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            base_url: default_base_url(),
            model: default_model(),
            api_key_env: default_api_key_env(),
            api_key: None,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            dir: default_output_dir(),
        }
    }
}

impl Default for GenerateConfig {
    fn default() -> Self {
        GenerateConfig {
            chunk_size: default_chunk_size(),
            sample_code: default_sample_code(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        LoggingConfig {
            level: default_log_level(),
            file: false,
        }
    }
}

impl MapdocConfig {
    /// Load configuration with deterministic precedence: explicit path, ./mapdoc.toml, defaults.
    ///
    /// An explicit path must exist; the implicit mapdoc.toml is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(explicit) => Self::from_file(explicit)?
                .ok_or_else(|| anyhow!("config file not found: {}", explicit.display()))?,
            None => Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?.unwrap_or_default(),
        };
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Option<Self>> {
        if !path.exists() {
            return Ok(None);
        }
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let config: MapdocConfig = toml::from_str(&content)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        Ok(Some(config))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.api.model.trim().is_empty() {
            return Err(anyhow!("api.model cannot be empty"));
        }

        let parsed = Url::parse(&self.api.base_url)
            .map_err(|err| anyhow!("invalid api.base_url: {}", err))?;
        if parsed.scheme() != "http" && parsed.scheme() != "https" {
            return Err(anyhow!("api.base_url must use http or https"));
        }

        if self.api.api_key_env.trim().is_empty() {
            return Err(anyhow!("api.api_key_env cannot be empty"));
        }

        if self.generate.chunk_size == 0 {
            return Err(anyhow!("generate.chunk_size must be at least 1"));
        }

        Directive::from_str(&self.logging.level)
            .map_err(|_| anyhow!("logging.level must be a valid tracing directive"))?;

        Ok(())
    }
}

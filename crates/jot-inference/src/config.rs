//! Inference configuration system.
//!
//! Selects and configures the generation backend. Configuration can be
//! loaded from:
//! - a TOML file (default: ~/.config/jot/inference.toml)
//! - environment variables (JOT_* prefixed)
//!
//! # Example
//!
//! ```rust,no_run
//! use jot_inference::config::InferenceConfig;
//!
//! // Load from the default path or fall back to env vars
//! let config = InferenceConfig::load().expect("Failed to load config");
//! ```

use serde::{Deserialize, Serialize};
use std::env;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, info};

use jot_core::defaults;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    FileRead(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("Invalid backend: {0}")]
    InvalidBackend(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Missing configuration for default backend: {0}")]
    MissingBackend(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Generation backend type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Ollama,
    OpenAI,
}

impl FromStr for BackendKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ollama" => Ok(Self::Ollama),
            "openai" => Ok(Self::OpenAI),
            _ => Err(ConfigError::InvalidBackend(s.to_string())),
        }
    }
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

/// Ollama backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OllamaConfig {
    /// Base URL for the Ollama API.
    pub base_url: String,
    /// Model to use for text generation.
    pub generation_model: String,
}

impl Default for OllamaConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OLLAMA_URL.to_string(),
            generation_model: defaults::OLLAMA_GEN_MODEL.to_string(),
        }
    }
}

impl OllamaConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_base_url("Ollama", &self.base_url)?;
        if self.generation_model.is_empty() {
            return Err(ConfigError::Validation(
                "Ollama generation_model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// OpenAI-compatible backend configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    /// Base URL for the OpenAI-compatible API.
    pub base_url: String,
    /// API key for authentication (optional for local endpoints).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    /// Model to use for text generation.
    pub generation_model: String,
}

impl Default for OpenAIConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::OPENAI_URL.to_string(),
            api_key: None,
            generation_model: defaults::OPENAI_GEN_MODEL.to_string(),
        }
    }
}

impl OpenAIConfig {
    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        validate_base_url("OpenAI", &self.base_url)?;
        if self.generation_model.is_empty() {
            return Err(ConfigError::Validation(
                "OpenAI generation_model cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_base_url(backend: &str, base_url: &str) -> ConfigResult<()> {
    if base_url.is_empty() {
        return Err(ConfigError::Validation(format!(
            "{} base_url cannot be empty",
            backend
        )));
    }
    if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{} base_url must start with http:// or https://, got: {}",
            backend, base_url
        )));
    }
    Ok(())
}

/// Main inference configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Default backend to use.
    pub default: BackendKind,
    /// Ollama configuration (if enabled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ollama: Option<OllamaConfig>,
    /// OpenAI configuration (if enabled).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub openai: Option<OpenAIConfig>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            default: BackendKind::Ollama,
            ollama: Some(OllamaConfig::default()),
            openai: None,
        }
    }
}

impl InferenceConfig {
    /// Get the default config file path.
    ///
    /// Returns: ~/.config/jot/inference.toml
    pub fn default_config_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from(".config"));
        path.push("jot");
        path.push("inference.toml");
        path
    }

    /// Load configuration from the default path, falling back to environment
    /// variables when the file does not exist.
    pub fn load() -> ConfigResult<Self> {
        let path = Self::default_config_path();

        if path.exists() {
            info!("Loading inference config from: {}", path.display());
            Self::from_file(&path)
        } else {
            debug!(
                "Config file not found at {}, using environment variables",
                path.display()
            );
            Ok(Self::from_env())
        }
    }

    /// Load configuration from a TOML file.
    pub fn from_file(path: &std::path::Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path)?;
        let content = Self::substitute_env_vars(&content);

        #[derive(Deserialize)]
        struct TomlRoot {
            inference: TomlInferenceConfig,
        }

        #[derive(Deserialize)]
        struct TomlInferenceConfig {
            default: String,
            #[serde(default)]
            ollama: Option<OllamaConfig>,
            #[serde(default)]
            openai: Option<OpenAIConfig>,
        }

        let root: TomlRoot = toml::from_str(&content)?;
        let default = root.inference.default.parse()?;

        let config = Self {
            default,
            ollama: root.inference.ollama,
            openai: root.inference.openai,
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let default = env::var("JOT_INFERENCE_DEFAULT")
            .ok()
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();

        let ollama = Some(OllamaConfig {
            base_url: env::var("JOT_OLLAMA_URL")
                .unwrap_or_else(|_| defaults::OLLAMA_URL.to_string()),
            generation_model: env::var("JOT_OLLAMA_GENERATION_MODEL")
                .unwrap_or_else(|_| defaults::OLLAMA_GEN_MODEL.to_string()),
        });

        let openai = match default {
            BackendKind::OpenAI => Some(OpenAIConfig {
                base_url: env::var("JOT_OPENAI_URL")
                    .unwrap_or_else(|_| defaults::OPENAI_URL.to_string()),
                api_key: env::var("JOT_OPENAI_API_KEY").ok(),
                generation_model: env::var("JOT_OPENAI_GENERATION_MODEL")
                    .unwrap_or_else(|_| defaults::OPENAI_GEN_MODEL.to_string()),
            }),
            BackendKind::Ollama => None,
        };

        Self {
            default,
            ollama,
            openai,
        }
    }

    /// Validate the configuration.
    pub fn validate(&self) -> ConfigResult<()> {
        match self.default {
            BackendKind::Ollama => {
                if self.ollama.is_none() {
                    return Err(ConfigError::MissingBackend(
                        "Ollama is set as default but not configured".to_string(),
                    ));
                }
            }
            BackendKind::OpenAI => {
                if self.openai.is_none() {
                    return Err(ConfigError::MissingBackend(
                        "OpenAI is set as default but not configured".to_string(),
                    ));
                }
            }
        }

        if let Some(ref ollama) = self.ollama {
            ollama.validate()?;
        }
        if let Some(ref openai) = self.openai {
            openai.validate()?;
        }

        Ok(())
    }

    /// Substitute environment variables in the format ${VAR_NAME}.
    fn substitute_env_vars(content: &str) -> String {
        let re = regex::Regex::new(r"\$\{([A-Z_][A-Z0-9_]*)\}").unwrap();
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .to_string()
    }
}

//! OpenAI-compatible generation backend implementation.
//!
//! Works with any chat-completions endpoint: the OpenAI cloud API, Ollama in
//! OpenAI compatibility mode, vLLM, LM Studio, and friends.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument};

use jot_core::{defaults, Error, GenerationBackend, Result};

use crate::config::OpenAIConfig;

/// Default OpenAI API endpoint.
pub const DEFAULT_OPENAI_URL: &str = defaults::OPENAI_URL;

/// Default generation model.
pub const DEFAULT_GEN_MODEL: &str = defaults::OPENAI_GEN_MODEL;

/// OpenAI-compatible generation backend.
#[derive(Debug)]
pub struct OpenAIBackend {
    client: Client,
    config: OpenAIConfig,
}

impl OpenAIBackend {
    /// Create a new OpenAI backend with the given configuration.
    ///
    /// A key is required unless the endpoint looks local (http://); this is
    /// checked up front so a missing key fails the request before any
    /// network traffic, as a configuration error.
    pub fn new(config: OpenAIConfig) -> Result<Self> {
        if config.api_key.is_none() && !config.base_url.starts_with("http://") {
            return Err(Error::Config(
                "OpenAI API key is not set. Set JOT_OPENAI_API_KEY or add api_key to \
                 inference.toml, or point base_url at a local endpoint."
                    .to_string(),
            ));
        }

        let client = Client::builder()
            .timeout(Duration::from_secs(defaults::GEN_TIMEOUT_SECS))
            .build()
            .map_err(|e| Error::Inference(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            "Initializing OpenAI backend: url={}, gen={}",
            config.base_url, config.generation_model
        );

        Ok(Self { client, config })
    }

    /// Create from environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(OpenAIConfig {
            base_url: std::env::var("JOT_OPENAI_URL")
                .unwrap_or_else(|_| DEFAULT_OPENAI_URL.to_string()),
            api_key: std::env::var("JOT_OPENAI_API_KEY").ok(),
            generation_model: std::env::var("JOT_OPENAI_GENERATION_MODEL")
                .unwrap_or_else(|_| DEFAULT_GEN_MODEL.to_string()),
        })
    }

    /// Get the current configuration.
    pub fn config(&self) -> &OpenAIConfig {
        &self.config
    }

    async fn chat(&self, system: &str, prompt: &str) -> Result<String> {
        let mut messages = Vec::new();
        if !system.is_empty() {
            messages.push(ChatMessage {
                role: "system".to_string(),
                content: system.to_string(),
            });
        }
        messages.push(ChatMessage {
            role: "user".to_string(),
            content: prompt.to_string(),
        });

        let request = ChatCompletionRequest {
            model: self.config.generation_model.clone(),
            messages,
        };

        let mut builder = self
            .client
            .post(format!("{}/chat/completions", self.config.base_url))
            .json(&request);
        if let Some(key) = &self.config.api_key {
            builder = builder.bearer_auth(key);
        }

        let response = builder
            .send()
            .await
            .map_err(|e| Error::Inference(format!("Request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            // 401/403 are configuration problems (bad or missing key), not
            // transient inference failures.
            if status.as_u16() == 401 || status.as_u16() == 403 {
                return Err(Error::Config(format!(
                    "Authentication failed ({}): {}",
                    status, body
                )));
            }
            return Err(Error::Inference(format!(
                "OpenAI returned {}: {}",
                status, body
            )));
        }

        let result: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| Error::Inference(format!("Failed to parse response: {}", e)))?;

        let content = result
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| Error::Inference("Response contained no choices".to_string()))?;

        debug!(response_len = content.len(), "Generation complete");
        Ok(content)
    }
}

#[derive(Serialize, Deserialize, Clone)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessage>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[async_trait]
impl GenerationBackend for OpenAIBackend {
    #[instrument(skip(self, prompt), fields(subsystem = "inference", component = "openai", op = "generate", model = %self.config.generation_model))]
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.chat("", prompt).await
    }

    #[instrument(skip(self, system, prompt), fields(subsystem = "inference", component = "openai", op = "generate_with_system", model = %self.config.generation_model))]
    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.chat(system, prompt).await
    }

    fn model_name(&self) -> &str {
        &self.config.generation_model
    }
}

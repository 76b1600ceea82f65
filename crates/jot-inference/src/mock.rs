//! Mock generation backend for deterministic testing.
//!
//! Returns canned responses (optionally keyed by prompt substring) and logs
//! every call so tests can assert on what was sent.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use jot_inference::mock::MockGenerationBackend;
//!
//! let backend = MockGenerationBackend::new()
//!     .with_fixed_response(r#"[{"type":"search","payload":{"query":"milk"}}]"#);
//! ```

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use jot_core::{Error, GenerationBackend, Result};

#[derive(Debug, Clone)]
struct MockConfig {
    /// Responses keyed by prompt substring, checked in insertion order.
    mapped_responses: Vec<(String, String)>,
    default_response: String,
    /// When set, every call fails with this inference error message.
    failure: Option<String>,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            mapped_responses: Vec::new(),
            default_response: "[]".to_string(),
            failure: None,
        }
    }
}

/// One recorded generation call.
#[derive(Debug, Clone)]
pub struct MockCall {
    pub system: String,
    pub prompt: String,
}

/// Mock generation backend.
#[derive(Clone, Default)]
pub struct MockGenerationBackend {
    config: Arc<MockConfig>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockGenerationBackend {
    /// Create a new mock backend returning an empty action array.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the response returned for any unmapped prompt.
    pub fn with_fixed_response(mut self, response: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).default_response = response.into();
        self
    }

    /// Add a response used when the prompt contains `needle`.
    pub fn with_response_for(
        mut self,
        needle: impl Into<String>,
        response: impl Into<String>,
    ) -> Self {
        Arc::make_mut(&mut self.config)
            .mapped_responses
            .push((needle.into(), response.into()));
        self
    }

    /// Make every call fail with the given inference error message.
    pub fn with_failure(mut self, message: impl Into<String>) -> Self {
        Arc::make_mut(&mut self.config).failure = Some(message.into());
        self
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    /// Number of generation calls made.
    pub fn call_count(&self) -> usize {
        self.call_log.lock().unwrap().len()
    }

    fn respond(&self, system: &str, prompt: &str) -> Result<String> {
        self.call_log.lock().unwrap().push(MockCall {
            system: system.to_string(),
            prompt: prompt.to_string(),
        });

        if let Some(message) = &self.config.failure {
            return Err(Error::Inference(message.clone()));
        }

        for (needle, response) in &self.config.mapped_responses {
            if prompt.contains(needle.as_str()) {
                return Ok(response.clone());
            }
        }
        Ok(self.config.default_response.clone())
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, prompt: &str) -> Result<String> {
        self.respond("", prompt)
    }

    async fn generate_with_system(&self, system: &str, prompt: &str) -> Result<String> {
        self.respond(system, prompt)
    }

    fn model_name(&self) -> &str {
        "mock"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fixed_response() {
        let backend = MockGenerationBackend::new().with_fixed_response("canned");
        assert_eq!(backend.generate("anything").await.unwrap(), "canned");
    }

    #[tokio::test]
    async fn test_mapped_response_wins_over_default() {
        let backend = MockGenerationBackend::new()
            .with_fixed_response("default")
            .with_response_for("milk", "got milk");

        assert_eq!(backend.generate("buy milk today").await.unwrap(), "got milk");
        assert_eq!(backend.generate("unrelated").await.unwrap(), "default");
    }

    #[tokio::test]
    async fn test_failure_mode() {
        let backend = MockGenerationBackend::new().with_failure("connection refused");
        let err = backend.generate("x").await.unwrap_err();
        assert!(matches!(err, Error::Inference(_)));
        assert!(err.to_string().contains("connection refused"));
    }

    #[tokio::test]
    async fn test_call_logging() {
        let backend = MockGenerationBackend::new();
        backend.generate_with_system("sys", "user msg").await.unwrap();

        let calls = backend.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].system, "sys");
        assert_eq!(calls[0].prompt, "user msg");
        assert_eq!(backend.call_count(), 1);
    }
}

//! # jot-inference
//!
//! LLM generation backend abstraction for jot.
//!
//! This crate provides:
//! - Ollama implementation of [`jot_core::GenerationBackend`] (default)
//! - OpenAI-compatible implementation (optional, feature `openai`)
//! - Unified backend configuration from TOML file or environment
//! - Deterministic mock backend for tests (feature `mock`)
//!
//! # Feature Flags
//!
//! - `ollama` (default): Enable the Ollama backend
//! - `openai`: Enable the OpenAI-compatible backend
//! - `mock`: Enable the mock backend outside this crate's own tests
//!
//! # Example
//!
//! ```rust,no_run
//! use jot_inference::OllamaBackend;
//! use jot_core::GenerationBackend;
//!
//! #[tokio::main]
//! async fn main() {
//!     let backend = OllamaBackend::from_env();
//!     let reply = backend.generate("Say hello").await.unwrap();
//!     println!("{}", reply);
//! }
//! ```

pub mod config;

#[cfg(feature = "ollama")]
pub mod ollama;

#[cfg(feature = "openai")]
pub mod openai;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export core types
pub use jot_core::*;

pub use config::{BackendKind, InferenceConfig, OllamaConfig, OpenAIConfig};

#[cfg(feature = "ollama")]
pub use ollama::OllamaBackend;

#[cfg(feature = "openai")]
pub use openai::OpenAIBackend;

#[cfg(any(test, feature = "mock"))]
pub use mock::MockGenerationBackend;

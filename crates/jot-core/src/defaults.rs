//! Centralized default constants for jot.
//!
//! **This module is the single source of truth** for shared default values.
//! All crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// NOTES
// =============================================================================

/// Content prefix marking a note as an embedded image blob.
///
/// Image notes are excluded from text search and rendered as placeholders in
/// backend context, but remain addressable by id.
pub const IMAGE_DATA_PREFIX: &str = "data:image/";

/// Maximum characters of note content included per note in backend context.
pub const CONTEXT_EXCERPT_LENGTH: usize = 500;

// =============================================================================
// PLANNING
// =============================================================================

/// Maximum characters of the user instruction reused as a fallback search
/// query when the backend response yields no action array.
pub const FALLBACK_QUERY_LENGTH: usize = 80;

/// Query used when the instruction reduces to an empty fallback query.
pub const FALLBACK_QUERY_DEFAULT: &str = "notes";

// =============================================================================
// INFERENCE
// =============================================================================

/// Default Ollama endpoint.
pub const OLLAMA_URL: &str = "http://localhost:11434";

/// Default Ollama generation model.
pub const OLLAMA_GEN_MODEL: &str = "llama3.2";

/// Default OpenAI-compatible endpoint.
pub const OPENAI_URL: &str = "https://api.openai.com/v1";

/// Default OpenAI generation model.
pub const OPENAI_GEN_MODEL: &str = "gpt-4o-mini";

/// Timeout for generation requests (seconds).
pub const GEN_TIMEOUT_SECS: u64 = 120;

// =============================================================================
// DATABASE
// =============================================================================

/// Default maximum number of connections in the pool.
pub const POOL_MAX_CONNECTIONS: u32 = 10;

/// Default connection acquire timeout in seconds.
pub const POOL_CONNECT_TIMEOUT_SECS: u64 = 30;

//! Provider Constants
//!
//! Constants specific to provider adapters. Defaults shared with the routing
//! core live in `relay_domain::constants`.

/// JSON content type
pub const CONTENT_TYPE_JSON: &str = "application/json";

/// Maximum number of response-body bytes quoted in an error message
pub const ERROR_BODY_PREVIEW_LIMIT: usize = 512;

// ============================================================================
// ANTHROPIC
// ============================================================================

/// Public Anthropic API base URL
pub const ANTHROPIC_DEFAULT_ENDPOINT: &str = "https://api.anthropic.com";

/// `anthropic-version` header value
pub const ANTHROPIC_API_VERSION: &str = "2023-06-01";

/// Completion token cap sent with every Anthropic request
pub const ANTHROPIC_MAX_TOKENS: u32 = 4096;

// ============================================================================
// OPENAI
// ============================================================================

/// Public OpenAI API base URL
pub const OPENAI_DEFAULT_ENDPOINT: &str = "https://api.openai.com";

// ============================================================================
// OLLAMA
// ============================================================================

/// Default Ollama daemon address
pub const OLLAMA_DEFAULT_ENDPOINT: &str = "http://localhost:11434";

//! # relay - Provider Adapters
//!
//! Implementations of the `GenerationProvider` port defined in `relay-domain`.
//! Every adapter normalizes its backend's failures into a `ProviderError` and
//! registers a factory in [`registry::GENERATION_PROVIDERS`], so the backend
//! behind a provider is picked by configuration at load time.
//!
//! | Backend | Adapter | Class |
//! |---------|---------|-------|
//! | Anthropic Messages API | [`generation::AnthropicProvider`] | cloud |
//! | OpenAI chat completions | [`generation::OpenAiProvider`] | cloud |
//! | Ollama | [`generation::OllamaProvider`] | local daemon |
//! | Scripted | [`generation::MockProvider`] | mock |
//!
//! ## Usage
//!
//! ```ignore
//! use relay_domain::{BackendKind, ProviderConfig};
//! use relay_providers::resolve_provider;
//!
//! let config = ProviderConfig::new("local", BackendKind::Ollama, "llama3.1");
//! let provider = resolve_provider(&config)?;
//! ```

pub use relay_domain::error::{Error, Result};
pub use relay_domain::ports::providers::{GenerationProvider, SharedGenerationProvider};

/// Provider-specific constants
pub mod constants;

/// Generation provider implementations
pub mod generation;

/// HTTP client configuration shared by API-based providers
pub mod http;

/// linkme-based provider registry
pub mod registry;

/// Shared utilities for provider implementations
pub mod utils;

pub use registry::{GENERATION_PROVIDERS, ProviderEntry, list_providers, resolve_provider};

//! Generation Provider Implementations
//!
//! | Provider | Type | Credential |
//! |----------|------|------------|
//! | [`AnthropicProvider`] | Cloud | required |
//! | [`OpenAiProvider`] | Cloud | required |
//! | [`OllamaProvider`] | Local daemon | none |
//! | [`MockProvider`] | Testing | none |

#[cfg(feature = "generation-anthropic")]
pub mod anthropic;
pub mod mock;
#[cfg(feature = "generation-ollama")]
pub mod ollama;
#[cfg(feature = "generation-openai")]
pub mod openai;

#[cfg(feature = "generation-anthropic")]
pub use anthropic::AnthropicProvider;
pub use mock::{MockOutcome, MockProvider};
#[cfg(feature = "generation-ollama")]
pub use ollama::OllamaProvider;
#[cfg(feature = "generation-openai")]
pub use openai::OpenAiProvider;

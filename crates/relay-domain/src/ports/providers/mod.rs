//! External Provider Ports
//!
//! | Port | Description |
//! |------|-------------|
//! | [`GenerationProvider`] | Text generation backends (Anthropic, OpenAI, Ollama, mock) |

/// Generation provider port
pub mod generation;

pub use generation::{GenerationProvider, SharedGenerationProvider};

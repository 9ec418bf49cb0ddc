use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::constants::PROBE_PROMPT;
use crate::error::ProviderError;
use crate::value_objects::{GenerationOutput, ProviderIdentity};

/// Text generation backend
///
/// Every backend the router can fall back to implements this contract. The
/// router never inspects backend-specific errors: implementations normalize
/// each failure into a [`ProviderError`] with one of the known kinds.
///
/// `deadline` is the absolute instant by which the call must return. Adapters
/// size their own I/O timeout from it; the router additionally enforces it,
/// so an adapter that overruns is recorded as a timeout.
///
/// # Example
///
/// ```ignore
/// let provider: Arc<dyn GenerationProvider> = resolve_provider(&config)?;
/// let deadline = Instant::now() + Duration::from_secs(10);
/// let output = provider.generate("Explain ownership", None, deadline).await?;
/// println!("{}: {}", provider.identity().name, output.content);
/// ```
#[async_trait]
pub trait GenerationProvider: Send + Sync {
    /// Name, backend kind and model of this provider
    fn identity(&self) -> &ProviderIdentity;

    /// Generate a completion for `prompt`
    async fn generate(
        &self,
        prompt: &str,
        system_prompt: Option<&str>,
        deadline: Instant,
    ) -> Result<GenerationOutput, ProviderError>;

    /// Minimal request used by the background health probe
    async fn ping(&self, deadline: Instant) -> Result<(), ProviderError> {
        self.generate(PROBE_PROMPT, None, deadline).await?;
        Ok(())
    }
}

/// Shared adapter handle
pub type SharedGenerationProvider = Arc<dyn GenerationProvider>;

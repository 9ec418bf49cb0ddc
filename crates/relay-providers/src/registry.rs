//! Generation Provider Registry
//!
//! Auto-registration of provider adapters using linkme distributed slices.
//! Each adapter module submits a [`ProviderEntry`] keyed by its
//! [`BackendKind`]; configuration then selects the factory. Nothing is
//! inferred from which adapters happen to be compiled in.

use relay_domain::error::{Error, Result};
use relay_domain::ports::providers::SharedGenerationProvider;
use relay_domain::value_objects::{BackendKind, ProviderConfig};

/// Factory building an adapter from a validated provider config
pub type ProviderFactory = fn(&ProviderConfig) -> std::result::Result<SharedGenerationProvider, String>;

/// Registry entry for a generation backend
///
/// Registered with `#[linkme::distributed_slice(GENERATION_PROVIDERS)]`.
pub struct ProviderEntry {
    /// Backend kind this entry builds
    pub kind: BackendKind,
    /// Human-readable description
    pub description: &'static str,
    /// Factory function to create an adapter instance
    pub factory: ProviderFactory,
}

// Auto-collection via linkme distributed slices - adapters submit entries at compile time
#[linkme::distributed_slice]
pub static GENERATION_PROVIDERS: [ProviderEntry] = [..];

/// Build the adapter for `config` using the factory registered for its backend kind
///
/// # Example
///
/// ```ignore
/// let config = ProviderConfig::new("claude", BackendKind::Anthropic, "claude-sonnet-4-5")
///     .with_credential(Credential::new(key));
/// let provider = resolve_provider(&config)?;
/// ```
pub fn resolve_provider(config: &ProviderConfig) -> Result<SharedGenerationProvider> {
    let kind = config.backend_kind();

    let entry = GENERATION_PROVIDERS
        .iter()
        .find(|entry| entry.kind == kind)
        .ok_or_else(|| {
            let available: Vec<&str> = GENERATION_PROVIDERS.iter().map(|e| e.kind.as_str()).collect();
            Error::configuration(format!(
                "Provider '{}': backend kind '{kind}' is not available. Available kinds: {available:?}",
                config.name()
            ))
        })?;

    (entry.factory)(config)
        .map_err(|e| Error::configuration(format!("Provider '{}': {e}", config.name())))
}

/// List all registered backend kinds with their descriptions
pub fn list_providers() -> Vec<(BackendKind, &'static str)> {
    let mut providers: Vec<_> = GENERATION_PROVIDERS
        .iter()
        .map(|entry| (entry.kind, entry.description))
        .collect();
    providers.sort_by_key(|(kind, _)| kind.as_str());
    providers
}

//! Configuration
//!
//! Figment-based loading (defaults, TOML file, `RELAY_` environment), typed
//! sections, provider validation and credential resolution.

pub mod credentials;
pub mod loader;
pub mod types;
pub mod validation;

pub use credentials::CredentialResolver;
pub use loader::ConfigLoader;
pub use types::{AppConfig, HealthConfig, LoggingConfig, ProviderDefinition, RoutingConfig};
pub use validation::{DroppedProvider, ProviderSet, validate_providers};

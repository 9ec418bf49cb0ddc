//! Application configuration root

use serde::{Deserialize, Serialize};

use super::{HealthConfig, LoggingConfig, ProviderDefinition, RoutingConfig};

/// Complete relay configuration
///
/// ```toml
/// [health]
/// failure_threshold = 3
///
/// [[providers]]
/// name = "claude"
/// backend_kind = "anthropic"
/// model_id = "claude-sonnet-4-5"
/// credential_ref = "env:ANTHROPIC_API_KEY"
/// priority = 1
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Logging configuration
    pub logging: LoggingConfig,

    /// Health tracking and background probing
    pub health: HealthConfig,

    /// Request routing defaults
    pub routing: RoutingConfig,

    /// Provider blocks, in declaration order
    pub providers: Vec<ProviderDefinition>,
}

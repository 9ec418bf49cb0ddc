//! Infrastructure layer constants
//!
//! Contains constants that are part of the infrastructure implementation.
//! Routing defaults shared with other layers are defined in
//! `relay_domain::constants`.

// ============================================================================
// CONFIGURATION CONSTANTS
// ============================================================================

/// Default configuration file name
pub const DEFAULT_CONFIG_FILENAME: &str = "relay.toml";

/// Default configuration directory name
pub const DEFAULT_CONFIG_DIR: &str = "relay";

/// Environment variable prefix for configuration
pub const CONFIG_ENV_PREFIX: &str = "RELAY";

/// Separator between nesting levels in environment keys (`RELAY_HEALTH__FAILURE_THRESHOLD`)
pub const CONFIG_ENV_SEPARATOR: &str = "__";

// ============================================================================
// LOGGING CONSTANTS
// ============================================================================

/// Default log level
pub const DEFAULT_LOG_LEVEL: &str = "info";

/// Environment variable overriding the log filter
pub const LOG_FILTER_ENV: &str = "RELAY_LOG";

/// File name prefix for rolled log files
pub const LOG_FILE_PREFIX: &str = "relay";

// ============================================================================
// EVENT CONSTANTS
// ============================================================================

/// Default capacity of the broadcast event channel
pub const EVENT_CHANNEL_CAPACITY: usize = 1024;

// ============================================================================
// CREDENTIAL CONSTANTS
// ============================================================================

/// Credential reference prefix for environment variables
pub const CREDENTIAL_ENV_PREFIX: &str = "env:";

/// Credential reference prefix for files
pub const CREDENTIAL_FILE_PREFIX: &str = "file:";

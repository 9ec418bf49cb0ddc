//! Configuration types module

pub mod app;
pub mod health;
pub mod logging;
pub mod provider;
pub mod routing;

// Re-export main types
pub use app::AppConfig;
pub use health::HealthConfig;
pub use logging::LoggingConfig;
pub use provider::ProviderDefinition;
pub use routing::RoutingConfig;

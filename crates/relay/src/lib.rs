//! # relay
//!
//! Routes text-generation requests across several LLM backends with
//! health-aware failover.
//!
//! Providers are declared in configuration, each naming its backend kind
//! (`anthropic`, `openai`, `ollama`, `mock`). Requests go to the healthiest
//! provider first and fall back down the priority order on failure, within an
//! overall deadline. A background probe loop keeps health current so that
//! providers recover even without live traffic.
//!
//! ## Example
//!
//! ```ignore
//! use relay::infrastructure::{config::ConfigLoader, init_relay};
//!
//! let relay = init_relay(ConfigLoader::new().load()?).await?;
//! let response = relay.router().generate(relay.request("Explain lifetimes")).await?;
//! println!("{} (via {:?})", response.content, response.fallback_chain_used);
//! ```
//!
//! ## Architecture
//!
//! - `domain` - value objects, errors, events and ports
//! - `providers` - backend adapters and their linkme registry
//! - `infrastructure` - configuration, logging, health tracking, routing, bootstrap

/// Domain layer - core types and ports
///
/// Re-exports from the domain crate for convenience
pub mod domain {
    pub use relay_domain::*;
}

/// Provider adapters
///
/// Re-exports from the providers crate for convenience
pub mod providers {
    pub use relay_providers::*;
}

/// Infrastructure layer - configuration, routing and bootstrap
///
/// Re-exports from the infrastructure crate for convenience
pub mod infrastructure {
    pub use relay_infrastructure::*;
}

pub mod cli;

// Re-export commonly used domain types at the crate root
pub use domain::*;

// Re-export main entry points at the crate root
pub use infrastructure::{Relay, init_relay};

//! # Infrastructure Layer
//!
//! Configuration, logging, event sinks and the failover router for relay.
//! Provider adapters live in `relay-providers` and are resolved through its
//! linkme registry at bootstrap.
//!
//! ## Module Categories
//!
//! ### Configuration & Bootstrap
//! | Module | Description |
//! |--------|-------------|
//! | [`config`] | Figment configuration, provider validation, credential resolution |
//! | [`bootstrap`] | Composition root wiring adapters, health table, router and probe loop |
//! | [`constants`] | Centralized configuration constants |
//!
//! ### Observability
//! | Module | Description |
//! |--------|-------------|
//! | [`logging`] | Structured logging with tracing |
//! | [`events`] | Routing event sinks |
//!
//! ### Routing
//! | Module | Description |
//! |--------|-------------|
//! | [`routing`] | Health table, probe loop, candidate ordering, failover router |

pub mod bootstrap;
pub mod config;
pub mod constants;
pub mod error_ext;
pub mod events;
pub mod logging;
pub mod routing;

// Re-export commonly used types
pub use bootstrap::{Relay, init_relay, init_relay_with};
pub use error_ext::ErrorContext;

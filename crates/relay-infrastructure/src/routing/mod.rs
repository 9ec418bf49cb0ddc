//! Provider Routing Infrastructure
//!
//! Health-aware failover across generation providers.
//!
//! ## Components
//!
//! - [`HealthTable`] - copy-on-write health records, one per configured provider
//! - [`HealthMonitor`] - background probe loop feeding the table
//! - [`PriorityOrder`] / [`order_candidates`] - static priority and per-request candidate ordering
//! - [`Router`] - executes a request across the ordered candidates
//!
//! ## Usage
//!
//! ```ignore
//! let response = relay.router().generate(GenerationRequest::new("Summarize this")).await?;
//! println!("{} answered after trying {:?}", response.provider.name, response.fallback_chain_used);
//! ```

mod health;
mod monitor;
mod ordering;
mod router;

pub use health::{HealthSnapshot, HealthTable};
pub use monitor::{HealthMonitor, ProbeReport, ProbeSettings};
pub use ordering::{PriorityOrder, order_candidates};
pub use router::{RoutedProvider, Router};

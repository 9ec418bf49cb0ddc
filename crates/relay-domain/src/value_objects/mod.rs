//! Value Objects
//!
//! Immutable domain values passed between the router, the health monitor and
//! provider adapters.

pub mod generation;
pub mod health;
pub mod provider;

pub use generation::{
    GenerationOutput, GenerationRequest, GenerationResponse, TokenUsage, deadline_after,
};
pub use health::{HealthRecord, HealthStatus, HealthSummaryEntry};
pub use provider::{BackendClass, BackendKind, Credential, ProviderConfig, ProviderIdentity};

//! # relay - Domain Layer
//!
//! Core types and port definitions for routing text-generation requests across
//! several heterogeneous backends. This crate has no I/O: infrastructure crates
//! implement the ports defined here and never add routing rules of their own.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`value_objects`] | Provider identities and configuration, requests/responses, health records |
//! | [`error`] | Domain error, provider error taxonomy, aggregate failures |
//! | [`events`] | Structured routing events (health transitions, fallback attempts, exhaustion) |
//! | [`ports`] | `GenerationProvider` and `RoutingEventSink` traits |
//! | [`constants`] | Defaults shared across layers |

pub mod constants;
pub mod error;
pub mod events;
pub mod ports;
pub mod value_objects;

// Re-export commonly used types at the crate root
pub use error::{
    AggregateFailure, Error, FailureRecord, ProviderError, ProviderErrorKind, Result, RoutingError,
};
pub use events::RoutingEvent;
pub use ports::{
    GenerationProvider, RoutingEventSink, SharedEventSink, SharedGenerationProvider,
};
pub use value_objects::{
    BackendClass, BackendKind, Credential, GenerationOutput, GenerationRequest,
    GenerationResponse, HealthRecord, HealthStatus, HealthSummaryEntry, ProviderConfig,
    ProviderIdentity, TokenUsage,
};

//! Domain Events
//!
//! Routing events are immutable facts emitted by the router, the health
//! monitor and the configuration loader. Sinks decide what to do with them.
//!
//! | Event | Description |
//! |-------|-------------|
//! | [`RoutingEvent`] | Everything observable about routing and provider health |

/// Routing and health event definitions
pub mod routing_events;

pub use routing_events::RoutingEvent;

//! Routing Event Sink Port
//!
//! The router and health table emit events from inside their hot paths, so
//! `emit` is synchronous and must not block. Implementations that forward to
//! slow consumers buffer or drop.

use std::sync::Arc;

use crate::events::RoutingEvent;

/// Observer of routing events
pub trait RoutingEventSink: Send + Sync {
    /// Deliver one event
    fn emit(&self, event: RoutingEvent);

    /// Whether anything is listening
    ///
    /// Emitters may skip building expensive events when this is `false`.
    fn has_subscribers(&self) -> bool {
        true
    }
}

/// Shared sink handle
pub type SharedEventSink = Arc<dyn RoutingEventSink>;

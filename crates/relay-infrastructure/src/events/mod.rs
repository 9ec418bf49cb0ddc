//! Routing event sinks
//!
//! Implementations of the `RoutingEventSink` port.
//!
//! | Sink | Purpose |
//! |------|---------|
//! | [`TracingEventSink`] | Structured `tracing` events (default) |
//! | [`BroadcastEventSink`] | tokio broadcast channel for dashboards and tests |
//! | [`NullEventSink`] | Discards everything |
//! | [`FanoutEventSink`] | Forwards to several sinks |

mod broadcast;
mod fanout;
mod null;
mod tracing_sink;

pub use broadcast::{BroadcastEventSink, RoutingEventStream};
pub use fanout::FanoutEventSink;
pub use null::NullEventSink;
pub use tracing_sink::TracingEventSink;

//! Event bus adapters.
//!
//! - `InMemoryEventBus` - Synchronous, in-process bus with event capture
//! - `TracingEventHandler` - Logs every event it is subscribed to

mod in_memory;
mod tracing_handler;

pub use in_memory::{InMemoryEventBus, ALL_EVENTS};
pub use tracing_handler::TracingEventHandler;

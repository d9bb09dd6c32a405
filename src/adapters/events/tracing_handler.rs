//! Event handler that writes every domain event to the log.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};
use crate::ports::EventHandler;

/// Logs each event it receives at info level.
///
/// Subscribe it with `ALL_EVENTS` to get an audit trail of every change.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventHandler;

#[async_trait]
impl EventHandler for TracingEventHandler {
    async fn handle(&self, event: EventEnvelope) -> Result<(), DomainError> {
        tracing::info!(
            event_id = %event.event_id,
            event_type = %event.event_type,
            aggregate_type = %event.aggregate_type,
            aggregate_id = %event.aggregate_id,
            correlation_id = event.metadata.correlation_id.as_deref().unwrap_or("-"),
            "Domain event"
        );
        tracing::debug!(payload = %event.payload, "Domain event payload");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "TracingEventHandler"
    }
}

//! EventPublisher port - Interface for publishing domain events.
//!
//! Application handlers publish through this port without knowing who is
//! listening or how events travel.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, EventEnvelope};

/// Port for publishing domain events.
///
/// Implementations deliver events in the order given and propagate
/// errors to the caller.
///
/// # Example
///
/// ```ignore
/// let envelope = CartEvent::PhaseChanged(changed).to_envelope()?;
/// publisher.publish(envelope).await?;
/// ```
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Publish a single event.
    async fn publish(&self, event: EventEnvelope) -> Result<(), DomainError>;

    /// Publish several events in order.
    ///
    /// Stops at the first failure; earlier events stay published.
    async fn publish_all(&self, events: Vec<EventEnvelope>) -> Result<(), DomainError>;
}

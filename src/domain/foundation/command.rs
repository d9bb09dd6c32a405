//! Command infrastructure for application handlers.
//!
//! `CommandMetadata` travels with every command so that the events it
//! produces can be correlated and attributed to a source.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::EventEnvelope;

/// Metadata context for command handlers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandMetadata {
    /// Links every event emitted while handling one command.
    #[serde(skip_serializing_if = "Option::is_none")]
    correlation_id: Option<String>,

    /// Source of this command (e.g., "cli", "ui", "import").
    #[serde(skip_serializing_if = "Option::is_none")]
    source: Option<String>,
}

impl CommandMetadata {
    /// Creates empty metadata; a correlation ID is generated lazily.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder: Add correlation ID.
    pub fn with_correlation_id(mut self, id: impl Into<String>) -> Self {
        self.correlation_id = Some(id.into());
        self
    }

    /// Builder: Add source identifier.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }

    /// Returns the correlation ID, generating one if not set.
    pub fn correlation_id(&self) -> String {
        self.correlation_id
            .clone()
            .unwrap_or_else(|| Uuid::new_v4().to_string())
    }

    /// Returns the source if set.
    pub fn source(&self) -> Option<&str> {
        self.source.as_deref()
    }

    /// Stamps an envelope with this command's correlation context.
    ///
    /// Callers stamping several envelopes should resolve the correlation ID
    /// once so they all share it; see [`CommandMetadata::resolved`].
    pub fn stamp(&self, envelope: EventEnvelope) -> EventEnvelope {
        let envelope = envelope.with_correlation_id(self.correlation_id());
        match &self.source {
            Some(source) => envelope.with_source(source.clone()),
            None => envelope,
        }
    }

    /// Returns a copy whose correlation ID is fixed.
    pub fn resolved(&self) -> Self {
        Self {
            correlation_id: Some(self.correlation_id()),
            source: self.source.clone(),
        }
    }
}

#[cfg(test)]
impl CommandMetadata {
    /// Creates a test fixture with fixed correlation and source.
    pub fn test_fixture() -> Self {
        Self::new()
            .with_correlation_id("test-correlation-id")
            .with_source("test")
    }
}

//! Error types for the outbox core.

use thiserror::Error;

use crate::channel::ChannelError;
use crate::event_type::EventType;

/// Result alias for outbox operations.
pub type OutboxResult<T> = Result<T, OutboxError>;

/// Errors that can occur when registering channels or handling events.
#[derive(Debug, Error)]
pub enum OutboxError {
    /// A channel is already bound to this event type.
    #[error("event channel already registered for event type {0}")]
    DuplicateRegistration(EventType),

    /// No channel is bound to this event type.
    #[error("outbox event channel not found for event type {0}")]
    ChannelNotFound(EventType),

    /// The event type name is invalid.
    #[error("invalid event type: {0}")]
    InvalidEventType(String),

    /// The event status string is not one of the known literals.
    #[error("invalid event status: '{0}' (expected pending, closed, or failed)")]
    InvalidStatus(String),

    /// Serialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Channel configuration could not be loaded.
    #[error("invalid channel configuration: {0}")]
    Config(String),

    /// The channel rejected the event.
    #[error(transparent)]
    Channel(#[from] ChannelError),
}

impl OutboxError {
    /// Returns true if this error reports a duplicate registration.
    pub fn is_duplicate_registration(&self) -> bool {
        matches!(self, OutboxError::DuplicateRegistration(_))
    }

    /// Returns true if this error reports a missing channel binding.
    pub fn is_not_found(&self) -> bool {
        matches!(self, OutboxError::ChannelNotFound(_))
    }
}

impl From<serde_json::Error> for OutboxError {
    fn from(err: serde_json::Error) -> Self {
        OutboxError::Serialization(err.to_string())
    }
}

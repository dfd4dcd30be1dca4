//! The event channel contract.
//!
//! A channel accepts one event and makes it durable or delivered according to
//! its own transport: an outbox table, a broker publish, a cache write, a
//! stream append. The core only ever calls [`OutboxEventChannel::register_event`];
//! retry, batching, and ordering are properties of each implementation.

use std::error::Error as StdError;
use std::fmt;

use async_trait::async_trait;
use tracing::info;

use crate::config::CancellationContext;
use crate::event::OutboxEvent;

type BoxError = Box<dyn StdError + Send + Sync + 'static>;

/// Transport for outbox events.
///
/// Calls are asynchronous. A channel that completes in memory just returns
/// without awaiting anything. Transport-specific operations belong on the
/// concrete type, not on this trait.
#[async_trait]
pub trait OutboxEventChannel: Send + Sync {
    /// Accept one event for delivery.
    async fn register_event(&self, event: OutboxEvent) -> Result<(), ChannelError>;
}

/// Consumer-side processing of one delivered event.
///
/// Where a channel puts events into a transport, a handler takes them out:
/// whatever reads the outbox table or the broker subscription calls
/// `handle` for each event, passing its cancellation context along.
#[async_trait]
pub trait OutboxEventHandler: Send + Sync {
    /// Process one event.
    async fn handle(
        &self,
        ctx: &CancellationContext,
        event: &OutboxEvent,
    ) -> Result<(), ChannelError>;
}

/// Error returned by a channel, carried to the caller unchanged.
///
/// `Display` and `source()` are those of the wrapped error.
pub struct ChannelError {
    inner: BoxError,
}

impl ChannelError {
    /// Wraps a transport error.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<BoxError>,
    {
        Self {
            inner: error.into(),
        }
    }

    /// Creates an error from a message.
    pub fn msg(message: impl Into<String>) -> Self {
        let message: String = message.into();
        Self {
            inner: message.into(),
        }
    }

    /// Returns the wrapped error.
    pub fn get_ref(&self) -> &(dyn StdError + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Attempts to view the wrapped error as a concrete type.
    pub fn downcast_ref<E: StdError + 'static>(&self) -> Option<&E> {
        self.inner.downcast_ref::<E>()
    }

    /// Consumes the error, returning the wrapped error.
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Debug for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.inner, f)
    }
}

impl fmt::Display for ChannelError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl StdError for ChannelError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.inner.source()
    }
}

/// A channel that writes each event to the `tracing` log and accepts it.
#[derive(Debug, Clone)]
pub struct LogChannel {
    name: String,
}

impl LogChannel {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

#[async_trait]
impl OutboxEventChannel for LogChannel {
    async fn register_event(&self, event: OutboxEvent) -> Result<(), ChannelError> {
        info!(
            channel = %self.name,
            event_id = %event.event_id(),
            event_type = event.event_type(),
            aggregate_type = event.aggregate_type(),
            aggregate_id = event.aggregate_id(),
            payload = %event.payload(),
            "Outbox event registered"
        );
        Ok(())
    }
}

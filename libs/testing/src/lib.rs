//! # outbox-testing
//!
//! Channel test doubles for exercising code that routes events through an
//! [`OutboxEventManager`](outbox_core::OutboxEventManager).
//!
//! - [`RecordingChannel`] keeps every accepted event, in order
//! - [`FailingChannel`] rejects every event with a fixed message

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use outbox_core::{ChannelError, OutboxEvent, OutboxEventChannel};
use tracing::trace;

/// A channel that records every event it accepts.
#[derive(Debug, Default)]
pub struct RecordingChannel {
    events: Mutex<Vec<OutboxEvent>>,
}

impl RecordingChannel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of the accepted events, in arrival order.
    pub fn events(&self) -> Vec<OutboxEvent> {
        self.lock().to_vec()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Ids of the accepted events, in arrival order.
    pub fn event_ids(&self) -> Vec<outbox_core::EventId> {
        self.lock().iter().map(OutboxEvent::event_id).collect()
    }

    // A panicking test thread must not hide what was recorded before it.
    fn lock(&self) -> MutexGuard<'_, Vec<OutboxEvent>> {
        self.events.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

#[async_trait]
impl OutboxEventChannel for RecordingChannel {
    async fn register_event(&self, event: OutboxEvent) -> Result<(), ChannelError> {
        trace!(event_id = %event.event_id(), event_type = event.event_type(), "Recorded event");
        self.lock().push(event);
        Ok(())
    }
}

/// A channel that rejects every event.
#[derive(Debug)]
pub struct FailingChannel {
    message: String,
    attempts: AtomicUsize,
}

impl FailingChannel {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            attempts: AtomicUsize::new(0),
        }
    }

    /// Number of events offered so far.
    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl OutboxEventChannel for FailingChannel {
    async fn register_event(&self, event: OutboxEvent) -> Result<(), ChannelError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        trace!(event_id = %event.event_id(), "Rejected event");
        Err(ChannelError::msg(self.message.clone()))
    }
}

#[cfg(test)]
mod tests {
    use outbox_core::EventType;
    use serde_json::json;

    use super::*;

    fn event(n: u32) -> OutboxEvent {
        let event_type = EventType::from_static("Counted", 1);
        OutboxEvent::new(&event_type, "Counter", format!("c-{n}"), json!(n))
    }

    #[tokio::test]
    async fn test_recording_channel_keeps_order() {
        let channel = RecordingChannel::new();
        assert!(channel.is_empty());

        let first = event(1);
        let second = event(2);
        let expected = vec![first.event_id(), second.event_id()];

        channel.register_event(first).await.unwrap();
        channel.register_event(second).await.unwrap();

        assert_eq!(channel.len(), 2);
        assert_eq!(channel.event_ids(), expected);
        assert_eq!(channel.events()[1].aggregate_id(), "c-2");
    }

    #[tokio::test]
    async fn test_failing_channel_counts_attempts() {
        let channel = FailingChannel::new("queue full");

        let err = channel.register_event(event(1)).await.unwrap_err();
        assert_eq!(err.to_string(), "queue full");
        assert!(channel.register_event(event(2)).await.is_err());
        assert_eq!(channel.attempts(), 2);
    }
}

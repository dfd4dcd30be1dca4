//! Registry binding event types to channels.
//!
//! Each event type is bound to at most one channel. The first registration
//! wins; later attempts fail and leave the binding in place. Bindings are
//! never removed or replaced.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, warn};

use crate::channel::OutboxEventChannel;
use crate::error::{OutboxError, OutboxResult};
use crate::event::OutboxEvent;
use crate::event_type::{EventType, OutboxEventType};

type ChannelMap = HashMap<EventType, Arc<dyn OutboxEventChannel>>;

/// Keyed lookup from event type to channel.
///
/// Safe to share across tasks; registration and lookup are serialized by an
/// internal lock. Construct one per application and pass it where needed.
#[derive(Default)]
pub struct OutboxEventManager {
    channels: RwLock<ChannelMap>,
}

impl OutboxEventManager {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `channel` to `event_type`.
    ///
    /// Fails with [`OutboxError::DuplicateRegistration`] if the event type
    /// already has a channel; the existing binding is kept. An event type
    /// with an empty name is rejected with [`OutboxError::InvalidEventType`].
    pub fn register<T: OutboxEventType + ?Sized>(
        &self,
        event_type: &T,
        channel: Arc<dyn OutboxEventChannel>,
    ) -> OutboxResult<()> {
        let key = EventType::of(event_type);
        if key.name().is_empty() {
            return Err(OutboxError::InvalidEventType(format!(
                "event type {} has an empty name",
                key.id()
            )));
        }

        match self.write().entry(key) {
            Entry::Occupied(entry) => {
                warn!(event_type = %entry.key(), "Event channel already registered");
                Err(OutboxError::DuplicateRegistration(entry.key().clone()))
            }
            Entry::Vacant(entry) => {
                debug!(event_type = %entry.key(), "Event channel registered");
                entry.insert(channel);
                Ok(())
            }
        }
    }

    /// Returns the channel bound to `event_type`.
    ///
    /// Fails with [`OutboxError::ChannelNotFound`] if nothing is bound.
    pub fn get_channel<T: OutboxEventType + ?Sized>(
        &self,
        event_type: &T,
    ) -> OutboxResult<Arc<dyn OutboxEventChannel>> {
        let key = EventType::of(event_type);

        match self.read().get(&key) {
            Some(channel) => Ok(Arc::clone(channel)),
            None => {
                debug!(event_type = %key, "No event channel registered");
                Err(OutboxError::ChannelNotFound(key))
            }
        }
    }

    /// Resolves the channel for `event_type` and hands it `event`.
    ///
    /// Same as `get_channel` followed by `register_event`; the event itself
    /// is not inspected. Errors returned by the channel are passed through as
    /// [`OutboxError::Channel`].
    pub async fn dispatch<T: OutboxEventType + ?Sized>(
        &self,
        event_type: &T,
        event: OutboxEvent,
    ) -> OutboxResult<()> {
        let channel = self.get_channel(event_type)?;
        debug!(
            event_type = event_type.name(),
            event_id = %event.event_id(),
            "Dispatching outbox event"
        );
        channel.register_event(event).await?;
        Ok(())
    }

    /// Returns true if `event_type` has a channel.
    pub fn is_registered<T: OutboxEventType + ?Sized>(&self, event_type: &T) -> bool {
        self.read().contains_key(&EventType::of(event_type))
    }

    /// Number of bound event types.
    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Bound event types, ordered by id then name.
    pub fn event_types(&self) -> Vec<EventType> {
        let mut types: Vec<EventType> = self.read().keys().cloned().collect();
        types.sort();
        types
    }

    // Writers only ever insert a complete entry, so a poisoned map is intact.
    fn read(&self) -> RwLockReadGuard<'_, ChannelMap> {
        self.channels.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, ChannelMap> {
        self.channels.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl fmt::Debug for OutboxEventManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutboxEventManager")
            .field("event_types", &self.event_types())
            .finish()
    }
}

//! # outbox-core
//!
//! A minimal contract for the outbox messaging pattern: domain code creates
//! events, and a registry decides which channel publishes them.
//!
//! ## Design Principles
//!
//! - Events are immutable records of something that happened in the domain
//! - Every event is `pending` when created; status changes belong to the
//!   channel's own storage
//! - One channel per event type; the first registration wins
//! - The core performs no I/O; transports live behind [`OutboxEventChannel`]
//!
//! ## Components
//!
//! - [`OutboxEventType`] / [`EventType`]: name + numeric id, the registry key
//! - [`OutboxEvent`]: the unit of communication
//! - [`OutboxEventChannel`]: the single-method transport contract
//! - [`OutboxEventManager`]: the event type → channel registry
//! - [`OutboxEventHandler`]: consumer-side processing of delivered events
//!
//! ## Example
//!
//! ```ignore
//! define_event_type!(OrderPlaced, "OrderPlaced", 1);
//!
//! let manager = OutboxEventManager::new();
//! manager.register(&OrderPlaced, Arc::new(LogChannel::new("orders")))?;
//!
//! let event = OutboxEvent::new(&OrderPlaced, "Order", "order-42", json!({"total": 1299}));
//! manager.get_channel(&OrderPlaced)?.register_event(event).await?;
//! ```

mod channel;
mod config;
mod error;
mod event;
mod event_type;
mod manager;

pub use channel::{ChannelError, LogChannel, OutboxEventChannel, OutboxEventHandler};
pub use config::{CancellationContext, ChannelConfig};
pub use error::{OutboxError, OutboxResult};
pub use event::{OutboxEvent, OutboxEventStatus};
pub use event_type::{EventType, OutboxEventType};
pub use manager::OutboxEventManager;

/// Re-export the event ID type so channel implementations need only this crate
pub use outbox_id::EventId;

/// Re-exported for implementing [`OutboxEventChannel`]
pub use async_trait::async_trait;

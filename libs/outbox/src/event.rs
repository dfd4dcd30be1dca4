//! The outbox event record and its status label.

use std::sync::atomic::{AtomicI64, Ordering};

use chrono::{DateTime, Utc};
use outbox_id::EventId;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::OutboxError;
use crate::event_type::OutboxEventType;

/// Delivery status of an outbox event.
///
/// This is a label only. The core never transitions it; whoever stores the
/// event decides when it becomes `closed` or `failed`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutboxEventStatus {
    /// Created and not yet delivered.
    #[default]
    Pending,
    /// Delivered.
    Closed,
    /// Delivery gave up.
    Failed,
}

impl OutboxEventStatus {
    /// Returns the canonical lowercase literal.
    pub const fn as_str(&self) -> &'static str {
        match self {
            OutboxEventStatus::Pending => "pending",
            OutboxEventStatus::Closed => "closed",
            OutboxEventStatus::Failed => "failed",
        }
    }

    pub fn is_pending(&self) -> bool {
        matches!(self, OutboxEventStatus::Pending)
    }

    /// Returns true for `closed` and `failed`.
    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl std::fmt::Display for OutboxEventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OutboxEventStatus {
    type Err = OutboxError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OutboxEventStatus::Pending),
            "closed" => Ok(OutboxEventStatus::Closed),
            "failed" => Ok(OutboxEventStatus::Failed),
            other => Err(OutboxError::InvalidStatus(other.to_string())),
        }
    }
}

/// Latest `created_at` handed out by this process, in microseconds.
static LAST_CREATED_AT_MICROS: AtomicI64 = AtomicI64::new(i64::MIN);

/// Current time, never earlier than a previously returned value.
fn next_created_at() -> DateTime<Utc> {
    let now = Utc::now();
    let micros = now.timestamp_micros();
    let previous = LAST_CREATED_AT_MICROS.fetch_max(micros, Ordering::AcqRel);
    DateTime::from_timestamp_micros(previous.max(micros)).unwrap_or(now)
}

/// An immutable record of something that happened in the domain.
///
/// Construct with [`OutboxEvent::new`] or [`OutboxEvent::with_payload`]; the
/// id, status, and timestamp are assigned there and never change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutboxEvent {
    /// Unique id generated at construction.
    event_id: EventId,

    /// Name of the event type at construction time.
    event_type: String,

    /// Always `pending` when constructed.
    event_status: OutboxEventStatus,

    /// Kind of domain entity this event is about (e.g. "Order").
    aggregate_type: String,

    /// Identifier of that entity.
    aggregate_id: String,

    /// Business content.
    payload: serde_json::Value,

    /// When the event was constructed.
    created_at: DateTime<Utc>,
}

impl OutboxEvent {
    /// Creates a pending event of the given type.
    ///
    /// Aggregate references are not validated; empty strings are accepted.
    /// The event type's name must not be empty (see [`OutboxEventType`]).
    pub fn new<T: OutboxEventType + ?Sized>(
        event_type: &T,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        payload: impl Into<serde_json::Value>,
    ) -> Self {
        let event_type = event_type.name().to_owned();
        debug_assert!(!event_type.is_empty(), "event type name cannot be empty");

        Self {
            event_id: EventId::new(),
            event_type,
            event_status: OutboxEventStatus::Pending,
            aggregate_type: aggregate_type.into(),
            aggregate_id: aggregate_id.into(),
            payload: payload.into(),
            created_at: next_created_at(),
        }
    }

    /// Creates a pending event from any serializable payload.
    ///
    /// Fails only if `payload` cannot be represented as JSON.
    pub fn with_payload<T, P>(
        event_type: &T,
        aggregate_type: impl Into<String>,
        aggregate_id: impl Into<String>,
        payload: &P,
    ) -> Result<Self, OutboxError>
    where
        T: OutboxEventType + ?Sized,
        P: Serialize + ?Sized,
    {
        let payload = serde_json::to_value(payload)?;
        Ok(Self::new(event_type, aggregate_type, aggregate_id, payload))
    }

    pub fn event_id(&self) -> EventId {
        self.event_id
    }

    pub fn event_type(&self) -> &str {
        &self.event_type
    }

    pub fn event_status(&self) -> OutboxEventStatus {
        self.event_status
    }

    pub fn aggregate_type(&self) -> &str {
        &self.aggregate_type
    }

    pub fn aggregate_id(&self) -> &str {
        &self.aggregate_id
    }

    pub fn payload(&self) -> &serde_json::Value {
        &self.payload
    }

    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Decodes the payload into a typed value.
    pub fn payload_as<P: DeserializeOwned>(&self) -> Result<P, OutboxError> {
        Ok(P::deserialize(&self.payload)?)
    }

    /// Consumes the event, returning its payload.
    pub fn into_payload(self) -> serde_json::Value {
        self.payload
    }

    /// Serializes the event to its JSON representation.
    pub fn to_json(&self) -> Result<String, OutboxError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parses an event from its JSON representation.
    pub fn from_json(json: &str) -> Result<Self, OutboxError> {
        Ok(serde_json::from_str(json)?)
    }
}

//! # outbox-id
//!
//! Event identifiers for outbox events.
//!
//! ## Design Principles
//!
//! - IDs are system-generated at event construction and never reassigned
//! - IDs have one canonical string form with strict parsing
//! - IDs roundtrip through serialization (parse → format → parse)
//!
//! ## ID Format
//!
//! Event IDs are random (v4) UUIDs rendered in hyphenated lowercase form:
//!
//! - `3f2b8c1e-9a4d-4c6b-8e21-5d7f0a9b1c23`
//!
//! 122 bits of randomness make collisions negligible without any
//! coordination between processes.

mod error;
mod types;

pub use error::IdError;
pub use types::EventId;

/// Re-export uuid for consumers that need raw UUID operations
pub use uuid::Uuid;

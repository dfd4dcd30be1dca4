//! Event type identity: the registry key and the event's declared type.

use std::borrow::Cow;

use crate::error::OutboxError;

/// Identity of a category of domain event.
///
/// Implementors expose a stable display name and a stable numeric id. The
/// name is copied into every [`OutboxEvent`] created from this type.
///
/// An empty name violates this contract. [`OutboxEventManager::register`]
/// rejects such a type with [`OutboxError::InvalidEventType`], so events of
/// it can never be routed; [`define_event_type!`] and [`EventType::try_new`]
/// cannot produce one.
///
/// [`OutboxEvent`]: crate::OutboxEvent
/// [`OutboxEventManager::register`]: crate::OutboxEventManager::register
/// [`define_event_type!`]: crate::define_event_type
pub trait OutboxEventType {
    /// Display name, e.g. `"OrderPlaced"`.
    fn name(&self) -> &str;

    /// Stable numeric identifier.
    fn id(&self) -> u32;
}

/// Value form of an event type, compared structurally by id and name.
///
/// This is the key the [`OutboxEventManager`] binds channels to. Any
/// [`OutboxEventType`] converts into one with [`EventType::of`].
///
/// [`OutboxEventManager`]: crate::OutboxEventManager
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventType {
    id: u32,
    name: Cow<'static, str>,
}

impl EventType {
    /// Creates an event type from a static name.
    ///
    /// # Panics
    ///
    /// Panics if `name` is empty. In const context this is a compile error.
    pub const fn from_static(name: &'static str, id: u32) -> Self {
        assert!(!name.is_empty(), "event type name cannot be empty");
        Self {
            id,
            name: Cow::Borrowed(name),
        }
    }

    /// Creates an event type, rejecting an empty name.
    pub fn try_new(name: impl Into<Cow<'static, str>>, id: u32) -> Result<Self, OutboxError> {
        let name = name.into();
        if name.is_empty() {
            return Err(OutboxError::InvalidEventType(
                "event type name cannot be empty".to_string(),
            ));
        }
        Ok(Self { id, name })
    }

    /// Captures the identity of any event type implementation.
    pub fn of<T: OutboxEventType + ?Sized>(event_type: &T) -> Self {
        Self {
            id: event_type.id(),
            name: Cow::Owned(event_type.name().to_owned()),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> u32 {
        self.id
    }
}

impl OutboxEventType for EventType {
    fn name(&self) -> &str {
        &self.name
    }

    fn id(&self) -> u32 {
        self.id
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}({})", self.name, self.id)
    }
}

/// Declares a zero-size marker type for one kind of domain event.
///
/// The generated type implements [`OutboxEventType`] and exposes `NAME`,
/// `ID`, and `event_type()`. An empty name fails to compile.
///
/// # Example
///
/// ```ignore
/// define_event_type!(OrderPlaced, "OrderPlaced", 1);
/// define_event_type!(pub PaymentDone, "PaymentDone", 2);
///
/// assert_eq!(OrderPlaced::event_type().to_string(), "OrderPlaced(1)");
/// ```
#[macro_export]
macro_rules! define_event_type {
    ($(#[$meta:meta])* $vis:vis $marker:ident, $name:literal, $id:expr) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
        $vis struct $marker;

        #[allow(dead_code)]
        impl $marker {
            /// Display name of this event type.
            pub const NAME: &'static str = $name;

            /// Numeric id of this event type.
            pub const ID: u32 = $id;

            /// Returns the registry key for this event type.
            pub const fn event_type() -> $crate::EventType {
                $crate::EventType::from_static(Self::NAME, Self::ID)
            }
        }

        const _: () = assert!(!$name.is_empty(), "event type name cannot be empty");

        impl $crate::OutboxEventType for $marker {
            fn name(&self) -> &str {
                Self::NAME
            }

            fn id(&self) -> u32 {
                Self::ID
            }
        }

        impl From<$marker> for $crate::EventType {
            fn from(_: $marker) -> Self {
                $marker::event_type()
            }
        }
    };
}

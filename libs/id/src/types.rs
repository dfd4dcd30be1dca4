//! Event identifier type.
//!
//! Event IDs are UUID v4 based and rendered in canonical hyphenated form.

use uuid::Uuid;

use crate::IdError;

/// Globally unique identifier assigned to an outbox event at construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventId(Uuid);

impl EventId {
    /// Creates a new ID from a fresh random UUID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates an ID from a raw UUID.
    ///
    /// Returns [`IdError::Nil`] for the nil UUID.
    pub fn from_uuid(uuid: Uuid) -> Result<Self, IdError> {
        if uuid.is_nil() {
            return Err(IdError::Nil);
        }
        Ok(Self(uuid))
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn uuid(&self) -> Uuid {
        self.0
    }

    /// Parses an ID from its canonical string form.
    ///
    /// Only the lowercase hyphenated form produced by [`Display`] is accepted.
    ///
    /// [`Display`]: std::fmt::Display
    pub fn parse(s: &str) -> Result<Self, IdError> {
        if s.is_empty() {
            return Err(IdError::Empty);
        }

        let uuid = Uuid::try_parse(s).map_err(|e| IdError::InvalidUuid(e.to_string()))?;

        if uuid.hyphenated().to_string() != s {
            return Err(IdError::InvalidUuid(format!(
                "expected canonical hyphenated form, got '{s}'"
            )));
        }

        Self::from_uuid(uuid)
    }
}

impl Default for EventId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EventId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.hyphenated())
    }
}

impl std::str::FromStr for EventId {
    type Err = IdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl From<EventId> for Uuid {
    fn from(id: EventId) -> Self {
        id.0
    }
}

impl serde::Serialize for EventId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> serde::Deserialize<'de> for EventId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl AsRef<Uuid> for EventId {
    fn as_ref(&self) -> &Uuid {
        &self.0
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use proptest::prelude::*;

    use super::*;

    #[test]
    fn test_event_id_is_v4() {
        let id = EventId::new();
        assert_eq!(id.uuid().get_version_num(), 4);
    }

    #[test]
    fn test_event_id_parse_roundtrip() {
        let id = EventId::new();
        let s = id.to_string();
        let parsed: EventId = s.parse().unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_event_id_parse_empty() {
        let result = EventId::parse("");
        assert!(result.unwrap_err().is_empty());
    }

    #[test]
    fn test_event_id_parse_invalid() {
        let result: Result<EventId, _> = "not-a-uuid".parse();
        assert!(matches!(result.unwrap_err(), IdError::InvalidUuid(_)));
    }

    #[test]
    fn test_event_id_rejects_non_canonical_forms() {
        let id = EventId::new();
        let upper = id.to_string().to_uppercase();
        let simple = id.uuid().simple().to_string();

        assert!(matches!(
            EventId::parse(&upper).unwrap_err(),
            IdError::InvalidUuid(_)
        ));
        assert!(matches!(
            EventId::parse(&simple).unwrap_err(),
            IdError::InvalidUuid(_)
        ));
    }

    #[test]
    fn test_event_id_rejects_nil() {
        assert_eq!(EventId::from_uuid(Uuid::nil()).unwrap_err(), IdError::Nil);
        assert_eq!(
            EventId::parse("00000000-0000-0000-0000-000000000000").unwrap_err(),
            IdError::Nil
        );
    }

    #[test]
    fn test_event_id_json_roundtrip() {
        let id = EventId::new();
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, format!("\"{id}\""));
        let parsed: EventId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, parsed);
    }

    #[test]
    fn test_event_id_json_rejects_garbage() {
        let result: Result<EventId, _> = serde_json::from_str("\"evt_123\"");
        assert!(result.is_err());
    }

    proptest! {
        #[test]
        fn prop_generated_ids_are_distinct(n in 2usize..256) {
            let ids: HashSet<EventId> = (0..n).map(|_| EventId::new()).collect();
            prop_assert_eq!(ids.len(), n);
        }

        #[test]
        fn prop_any_non_nil_uuid_roundtrips(bytes in any::<[u8; 16]>()) {
            let uuid = Uuid::from_bytes(bytes);
            prop_assume!(!uuid.is_nil());
            let id = EventId::from_uuid(uuid).unwrap();
            prop_assert_eq!(EventId::parse(&id.to_string()).unwrap(), id);
        }
    }
}

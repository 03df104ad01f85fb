//! # Record Identifiers
//!
//! `RecordId` is the identity of a record within one collection. It is
//! assigned once at creation and never changes afterwards.
//!
//! Ids are compared by exact string equality. Freshly generated ids are
//! UUID v4 strings, but ids arriving from an imported document are kept
//! verbatim whatever their shape. A numeric id in imported JSON is read
//! as its decimal string.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Identifier of a record within a collection.
///
/// The empty string means "not yet assigned": a record carrying a blank
/// id is treated as new by the repository and receives a generated id.
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Generate a new random identifier.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Wrap an existing identifier string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The unassigned identifier.
    pub fn unassigned() -> Self {
        Self(String::new())
    }

    /// Whether this id has been assigned (is not blank).
    pub fn is_assigned(&self) -> bool {
        !self.0.trim().is_empty()
    }

    /// Access the id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RecordId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for RecordId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl PartialEq<str> for RecordId {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for RecordId {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Option::<Value>::deserialize(deserializer)?;
        Ok(match value {
            Some(Value::String(s)) => Self(s),
            Some(Value::Number(n)) => Self(n.to_string()),
            _ => Self::unassigned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_assigned_and_unique() {
        let a = RecordId::generate();
        let b = RecordId::generate();
        assert!(a.is_assigned());
        assert_ne!(a, b);
        assert!(Uuid::parse_str(a.as_str()).is_ok());
    }

    #[test]
    fn blank_ids_are_unassigned() {
        assert!(!RecordId::unassigned().is_assigned());
        assert!(!RecordId::new("   ").is_assigned());
        assert!(RecordId::new("x").is_assigned());
    }

    #[test]
    fn deserializes_string_number_and_null() {
        let s: RecordId = serde_json::from_str("\"abc\"").unwrap();
        assert_eq!(s, "abc");
        let n: RecordId = serde_json::from_str("42").unwrap();
        assert_eq!(n, "42");
        let null: RecordId = serde_json::from_str("null").unwrap();
        assert!(!null.is_assigned());
        let obj: RecordId = serde_json::from_str("{\"a\":1}").unwrap();
        assert!(!obj.is_assigned());
    }

    #[test]
    fn serializes_as_plain_string() {
        let id = RecordId::new("r-1");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"r-1\"");
    }
}

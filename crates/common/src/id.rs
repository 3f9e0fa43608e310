//! Identity and ID generation utilities.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// Opaque identity of a user, as issued by the external user directory.
///
/// Nothing is assumed about its structure beyond equality, ordering and a
/// stable string form, which is what gets persisted.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(String);

impl UserId {
    /// Wrap an identity string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The stored string form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the stored string form.
    #[must_use]
    pub fn into_inner(self) -> String {
        self.0
    }

    /// Order two identities so that an unordered pair has one canonical key.
    #[must_use]
    pub fn ordered_pair<'a>(a: &'a Self, b: &'a Self) -> (&'a Self, &'a Self) {
        if a <= b { (a, b) } else { (b, a) }
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for UserId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for UserId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl AsRef<str> for UserId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// ID generator for entities.
#[derive(Debug, Clone, Default)]
pub struct IdGenerator {
    _private: (),
}

impl IdGenerator {
    /// Create a new ID generator.
    #[must_use]
    pub const fn new() -> Self {
        Self { _private: () }
    }

    /// Generate a new ULID-based ID.
    ///
    /// ULIDs are:
    /// - Lexicographically sortable
    /// - Monotonically increasing within the same millisecond
    /// - Shorter than UUIDs when represented as strings
    #[must_use]
    pub fn generate(&self) -> String {
        Ulid::new().to_string().to_lowercase()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_ulid() {
        let id_gen = IdGenerator::new();
        let id1 = id_gen.generate();
        let id2 = id_gen.generate();

        assert_eq!(id1.len(), 26);
        assert_eq!(id2.len(), 26);
        assert_ne!(id1, id2);
        assert_eq!(id1, id1.to_lowercase());
    }

    #[test]
    fn test_user_id_equality_is_structural() {
        let a = UserId::from("alice");
        let b = UserId::new(String::from("alice"));
        assert_eq!(a, b);
        assert_ne!(a, UserId::from("Alice"));
    }

    #[test]
    fn test_ordered_pair_is_direction_independent() {
        let alice = UserId::from("alice");
        let bob = UserId::from("bob");

        assert_eq!(
            UserId::ordered_pair(&alice, &bob),
            UserId::ordered_pair(&bob, &alice)
        );
        assert_eq!(UserId::ordered_pair(&bob, &alice).0, &alice);
    }

    #[test]
    fn test_user_id_serializes_transparently() {
        let id = UserId::from("01hzy");
        let json = serde_json::to_string(&id).unwrap();
        assert_eq!(json, "\"01hzy\"");

        let back: UserId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, id);
        assert_eq!(id.to_string(), "01hzy");
    }
}

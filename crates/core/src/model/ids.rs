use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Storage key addressing one persisted study slot (quiz, session, notes).
///
/// The original frontend kept everything under fixed browser-storage keys;
/// a `SlotKey` is the typed equivalent, so callers cannot hand an empty or
/// whitespace-only key to a repository.
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SlotKey(String);

impl SlotKey {
    /// Creates a new `SlotKey` from a non-blank string.
    ///
    /// # Errors
    ///
    /// Returns `ParseSlotKeyError` when the key is empty or whitespace-only.
    pub fn new(key: impl Into<String>) -> Result<Self, ParseSlotKeyError> {
        let key = key.into();
        if key.trim().is_empty() {
            return Err(ParseSlotKeyError);
        }
        Ok(Self(key))
    }

    /// Returns the underlying string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "SlotKey({})", self.0)
    }
}

impl fmt::Display for SlotKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Error type for parsing a `SlotKey` from a string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseSlotKeyError;

impl fmt::Display for ParseSlotKeyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "slot key must not be blank")
    }
}

impl std::error::Error for ParseSlotKeyError {}

impl FromStr for SlotKey {
    type Err = ParseSlotKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SlotKey::new(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slot_key_display_roundtrip() {
        let key = SlotKey::new("converted-mcq").unwrap();
        assert_eq!(key.to_string(), "converted-mcq");
        let parsed: SlotKey = "converted-mcq".parse().unwrap();
        assert_eq!(parsed, key);
    }

    #[test]
    fn slot_key_rejects_blank() {
        assert!(SlotKey::new("").is_err());
        assert!(SlotKey::new("   ").is_err());
        assert!("  ".parse::<SlotKey>().is_err());
    }
}

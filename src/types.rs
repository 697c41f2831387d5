//! Newtype wrappers used across the crate.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Identifier of one board configuration in the value table.
///
/// One character per cell in row-major order: `X`, `O`, or `.` for an empty
/// cell. Two boards with the same cells always produce the same key; rotated
/// or reflected boards produce different keys.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StateKey(String);

impl StateKey {
    /// Wrap an already-encoded key.
    ///
    /// No validation is performed: keys restored from an import are accepted
    /// as they are.
    pub fn new(key: impl Into<String>) -> Self {
        StateKey(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for StateKey {
    fn from(value: &str) -> Self {
        StateKey(value.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_key_serializes_as_plain_string() {
        let key = StateKey::new("X...O....");
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"X...O....\"");

        let back: StateKey = serde_json::from_str(&json).unwrap();
        assert_eq!(back, key);
    }
}

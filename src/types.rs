//! Core identifier types for the workspace file store.
//!
//! Node identifiers wrap UUIDv4: opaque, generated at creation, immutable
//! thereafter. They serialize as standard UUID text so export payloads keep
//! string keys, and `short()` gives an 8-char form for log lines.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Opaque identifier for a file or directory node.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FileId(Uuid);

impl FileId {
    /// Generate a fresh identifier.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 8 hex characters, for human-facing log output only.
    pub fn short(&self) -> String {
        self.0.as_simple().to_string()[..8].to_string()
    }

    /// The raw 16 bytes, used as the durable store key.
    pub fn as_bytes(&self) -> &[u8; 16] {
        self.0.as_bytes()
    }

    /// Reconstruct from the raw 16 bytes.
    pub fn from_bytes(bytes: [u8; 16]) -> Self {
        Self(Uuid::from_bytes(bytes))
    }

    /// Reconstruct from a byte slice; must be exactly 16 bytes.
    pub fn try_from_slice(bytes: &[u8]) -> Option<Self> {
        if bytes.len() == 16 {
            let mut arr = [0u8; 16];
            arr.copy_from_slice(bytes);
            Some(Self::from_bytes(arr))
        } else {
            None
        }
    }

    /// Parse from standard UUID text.
    pub fn parse(s: &str) -> Result<Self, uuid::Error> {
        Uuid::parse_str(s).map(Self)
    }
}

impl fmt::Display for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.as_hyphenated())
    }
}

impl fmt::Debug for FileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "FileId({})", self.0.as_hyphenated())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fresh_ids_are_unique() {
        let a = FileId::new();
        let b = FileId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn test_byte_roundtrip() {
        let id = FileId::new();
        assert_eq!(FileId::from_bytes(*id.as_bytes()), id);
        assert_eq!(FileId::try_from_slice(id.as_bytes()), Some(id));
        assert_eq!(FileId::try_from_slice(&[0u8; 5]), None);
    }

    #[test]
    fn test_serializes_as_uuid_text() {
        let id = FileId::new();
        let json = serde_json::to_string(&id).unwrap();
        let parsed: FileId = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, id);
        assert!(json.contains('-'));
    }

    #[test]
    fn test_short_form() {
        let id = FileId::new();
        assert_eq!(id.short().len(), 8);
    }
}

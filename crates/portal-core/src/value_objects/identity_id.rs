//! Identity ID - stable reference to a person
//!
//! Provider identifiers are opaque strings (object GUIDs or principal names),
//! so the value object only enforces shape: trimmed, non-empty, bounded.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Opaque identifier of a person known to the presence provider
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IdentityId(String);

impl IdentityId {
    /// Maximum accepted length in characters
    pub const MAX_LEN: usize = 128;

    /// Parse and validate an identity ID
    pub fn parse(raw: &str) -> Result<Self, IdentityIdError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(IdentityIdError::Empty);
        }
        if trimmed.chars().count() > Self::MAX_LEN {
            return Err(IdentityIdError::TooLong { max: Self::MAX_LEN });
        }
        if trimmed.chars().any(char::is_control) {
            return Err(IdentityIdError::InvalidCharacter);
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Borrow the inner string
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume into the inner string
    #[inline]
    pub fn into_inner(self) -> String {
        self.0
    }
}

/// Error when parsing an identity ID
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum IdentityIdError {
    #[error("identity id must not be empty")]
    Empty,

    #[error("identity id exceeds {max} characters")]
    TooLong { max: usize },

    #[error("identity id contains control characters")]
    InvalidCharacter,
}

impl fmt::Display for IdentityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for IdentityId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::str::FromStr for IdentityId {
    type Err = IdentityIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for IdentityId {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for IdentityId {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_trims_whitespace() {
        let id = IdentityId::parse("  eng-001 ").unwrap();
        assert_eq!(id.as_str(), "eng-001");
        assert_eq!(id.to_string(), "eng-001");
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(IdentityId::parse(""), Err(IdentityIdError::Empty));
        assert_eq!(IdentityId::parse("   "), Err(IdentityIdError::Empty));
    }

    #[test]
    fn test_parse_rejects_too_long() {
        let raw = "a".repeat(IdentityId::MAX_LEN + 1);
        assert_eq!(
            IdentityId::parse(&raw),
            Err(IdentityIdError::TooLong { max: IdentityId::MAX_LEN })
        );
        assert!(IdentityId::parse(&"a".repeat(IdentityId::MAX_LEN)).is_ok());
    }

    #[test]
    fn test_parse_rejects_control_characters() {
        assert_eq!(
            IdentityId::parse("eng\n001"),
            Err(IdentityIdError::InvalidCharacter)
        );
    }

    #[test]
    fn test_serde_roundtrip_validates() {
        let id: IdentityId = serde_json::from_str("\"user@contoso.com\"").unwrap();
        assert_eq!(id.as_str(), "user@contoso.com");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"user@contoso.com\"");

        let bad: Result<IdentityId, _> = serde_json::from_str("\"\"");
        assert!(bad.is_err());
    }
}

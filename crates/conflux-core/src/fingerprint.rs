use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Stable identifier of one external configuration repository's material.
///
/// Fingerprints are opaque to the merge engine; they only need to be
/// non-empty, free of whitespace, and stable across poll cycles. They are
/// the unique key for every cache and watch-list operation.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    pub fn new(value: impl Into<String>) -> Result<Self> {
        let value = value.into();
        if value.is_empty() {
            return Err(CoreError::invalid_fingerprint("empty"));
        }
        if value.chars().any(char::is_whitespace) {
            return Err(CoreError::invalid_fingerprint(value));
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for Fingerprint {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl Serialize for Fingerprint {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Fingerprint {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Fingerprint::new(s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_fingerprint() {
        let fp = Fingerprint::new("9a3b5c7d").unwrap();
        assert_eq!(fp.as_str(), "9a3b5c7d");
        assert_eq!(fp.to_string(), "9a3b5c7d");
    }

    #[test]
    fn test_empty_rejected() {
        assert!(Fingerprint::new("").is_err());
    }

    #[test]
    fn test_whitespace_rejected() {
        assert!(Fingerprint::new("abc 123").is_err());
        assert!(Fingerprint::new("abc\n123").is_err());
    }

    #[test]
    fn test_serde_roundtrip() {
        let fp = Fingerprint::new("f1").unwrap();
        let json = serde_json::to_string(&fp).unwrap();
        assert_eq!(json, "\"f1\"");
        let back: Fingerprint = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fp);
    }

    #[test]
    fn test_deserialize_invalid() {
        assert!(serde_json::from_str::<Fingerprint>("\"\"").is_err());
    }
}

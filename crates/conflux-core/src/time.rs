use crate::error::{CoreError, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// UTC timestamp serialized as RFC 3339
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UtcTime(pub OffsetDateTime);

impl UtcTime {
    pub fn new(datetime: OffsetDateTime) -> Self {
        Self(datetime)
    }

    pub fn inner(&self) -> &OffsetDateTime {
        &self.0
    }

    pub fn timestamp(&self) -> i64 {
        self.0.unix_timestamp()
    }
}

impl fmt::Display for UtcTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(|_| fmt::Error)?;
        write!(f, "{formatted}")
    }
}

impl FromStr for UtcTime {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        let datetime = OffsetDateTime::parse(s, &time::format_description::well_known::Rfc3339)?;
        Ok(UtcTime(datetime))
    }
}

impl Serialize for UtcTime {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let formatted = self
            .0
            .format(&time::format_description::well_known::Rfc3339)
            .map_err(serde::ser::Error::custom)?;
        serializer.serialize_str(&formatted)
    }
}

impl<'de> Deserialize<'de> for UtcTime {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        UtcTime::from_str(&s).map_err(serde::de::Error::custom)
    }
}

pub fn now_utc() -> UtcTime {
    UtcTime(OffsetDateTime::now_utc())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_roundtrip() {
        let ts: UtcTime = "2026-01-15T10:30:00Z".parse().unwrap();
        assert_eq!(ts.to_string(), "2026-01-15T10:30:00Z");
    }

    #[test]
    fn test_parse_invalid() {
        assert!("not a timestamp".parse::<UtcTime>().is_err());
    }

    #[test]
    fn test_ordering() {
        let earlier: UtcTime = "2026-01-15T10:30:00Z".parse().unwrap();
        let later = now_utc();
        assert!(earlier < later);
    }

    #[test]
    fn test_serde() {
        let ts: UtcTime = "2026-01-15T10:30:00Z".parse().unwrap();
        let json = serde_json::to_string(&ts).unwrap();
        assert_eq!(json, "\"2026-01-15T10:30:00Z\"");
        let back: UtcTime = serde_json::from_str(&json).unwrap();
        assert_eq!(back, ts);
    }
}

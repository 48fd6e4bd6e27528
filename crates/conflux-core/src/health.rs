use crate::fingerprint::Fingerprint;
use crate::time::{UtcTime, now_utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scope a health record is attached to.
///
/// Currently every record produced by the merge engine is scoped to one
/// configuration repository, keyed by its fingerprint.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HealthScope(String);

impl HealthScope {
    pub fn config_repo(fingerprint: &Fingerprint) -> Self {
        Self(format!("config-repo/{fingerprint}"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for HealthScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A named, scoped error state recorded for operators.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthRecord {
    scope: HealthScope,
    kind: String,
    message: String,
    #[serde(rename = "recordedAt")]
    recorded_at: UtcTime,
}

impl HealthRecord {
    pub fn error(scope: HealthScope, kind: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            scope,
            kind: kind.into(),
            message: message.into(),
            recorded_at: now_utc(),
        }
    }

    pub fn scope(&self) -> &HealthScope {
        &self.scope
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn recorded_at(&self) -> &UtcTime {
        &self.recorded_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scope_formatting() {
        let fp = Fingerprint::new("9a3b").unwrap();
        let scope = HealthScope::config_repo(&fp);
        assert_eq!(scope.as_str(), "config-repo/9a3b");
        assert_eq!(scope.to_string(), "config-repo/9a3b");
    }

    #[test]
    fn test_record_construction() {
        let fp = Fingerprint::new("f1").unwrap();
        let record = HealthRecord::error(
            HealthScope::config_repo(&fp),
            "Invalid merged configuration",
            "duplicate pipeline",
        );
        assert_eq!(record.kind(), "Invalid merged configuration");
        assert_eq!(record.message(), "duplicate pipeline");
        assert_eq!(record.scope().as_str(), "config-repo/f1");
    }

    #[test]
    fn test_record_serialization() {
        let fp = Fingerprint::new("f1").unwrap();
        let record = HealthRecord::error(HealthScope::config_repo(&fp), "kind", "msg");
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["scope"], "config-repo/f1");
        assert!(json["recordedAt"].is_string());
    }
}

use crate::fingerprint::Fingerprint;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Provenance of a configuration fragment: which repository produced it,
/// at which revision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepoOrigin {
    fingerprint: Fingerprint,
    locator: String,
    revision: String,
}

impl RepoOrigin {
    pub fn new(
        fingerprint: Fingerprint,
        locator: impl Into<String>,
        revision: impl Into<String>,
    ) -> Self {
        Self {
            fingerprint,
            locator: locator.into(),
            revision: revision.into(),
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn revision(&self) -> &str {
        &self.revision
    }

    /// Human-readable origin used in operator-facing messages.
    pub fn display_name(&self) -> String {
        format!("{} at {}", self.locator, self.revision)
    }
}

impl fmt::Display for RepoOrigin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

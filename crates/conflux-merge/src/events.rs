//! Events consumed and produced by the merge engine

use conflux_core::{ConfigRepo, Fingerprint, Fragment, UtcTime, now_utc};
use serde::{Deserialize, Serialize};

/// Outcome of one poll-and-parse cycle for a configuration repository.
///
/// Delivered per fingerprint, in per-fingerprint arrival order, by the
/// polling layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum FragmentOutcome {
    /// The repository's material parsed into a fragment.
    Succeeded {
        repo: ConfigRepo,
        fragment: Fragment,
    },
    /// Parsing failed; no fragment was produced this cycle.
    Failed { repo: ConfigRepo, error: String },
}

impl FragmentOutcome {
    pub fn fingerprint(&self) -> &Fingerprint {
        match self {
            Self::Succeeded { repo, .. } | Self::Failed { repo, .. } => repo.fingerprint(),
        }
    }
}

/// A replacement of the full set of tracked configuration repositories.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WatchListChange {
    repos: Vec<ConfigRepo>,
}

impl WatchListChange {
    pub fn new(repos: Vec<ConfigRepo>) -> Self {
        Self { repos }
    }

    pub fn repos(&self) -> &[ConfigRepo] {
        &self.repos
    }

    pub fn into_repos(self) -> Vec<ConfigRepo> {
        self.repos
    }
}

/// Broadcast to subscribers whenever a fragment is merged into the live
/// configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigChangeEvent {
    /// Repository whose contribution changed
    pub fingerprint: Fingerprint,
    /// Revision of the merged fragment
    pub revision: String,
    /// Timestamp of the change
    pub timestamp: UtcTime,
}

impl ConfigChangeEvent {
    pub fn merged(fragment: &Fragment) -> Self {
        Self {
            fingerprint: fragment.origin().fingerprint().clone(),
            revision: fragment.origin().revision().to_string(),
            timestamp: now_utc(),
        }
    }
}

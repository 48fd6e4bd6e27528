//! Watch list: the live set of tracked configuration repositories
//!
//! Held as an immutable snapshot behind an atomic pointer so lookups on the
//! hot event path never take a lock; configuration changes replace the whole
//! snapshot at once.

use arc_swap::ArcSwap;
use conflux_core::{ConfigRepo, Fingerprint};
use std::collections::HashMap;
use std::sync::Arc;

#[derive(Debug, Default)]
pub struct WatchList {
    repos: ArcSwap<HashMap<Fingerprint, ConfigRepo>>,
}

impl WatchList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_repos(repos: Vec<ConfigRepo>) -> Self {
        let list = Self::new();
        list.replace(repos);
        list
    }

    /// Atomically replace the full repository set.
    pub fn replace(&self, repos: Vec<ConfigRepo>) {
        let map: HashMap<Fingerprint, ConfigRepo> = repos
            .into_iter()
            .map(|r| (r.fingerprint().clone(), r))
            .collect();
        self.repos.store(Arc::new(map));
    }

    pub fn has_repo(&self, fingerprint: &Fingerprint) -> bool {
        self.repos.load().contains_key(fingerprint)
    }

    pub fn get(&self, fingerprint: &Fingerprint) -> Option<ConfigRepo> {
        self.repos.load().get(fingerprint).cloned()
    }

    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.repos.load().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.repos.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.load().is_empty()
    }
}

//! Per-fingerprint cache of last known and last valid fragments
//!
//! A precise ledger with no merge logic: `known` always reflects the most
//! recently received fragment regardless of outcome, `valid` the most recent
//! fragment that survived rule evaluation and structural merge validation.
//! The two slots diverge exactly when the latest merge attempt failed.

use conflux_core::{Fingerprint, Fragment};
use dashmap::DashMap;

#[derive(Debug, Default)]
struct CacheEntry {
    known: Option<Fragment>,
    valid: Option<Fragment>,
}

impl CacheEntry {
    fn is_empty(&self) -> bool {
        self.known.is_none() && self.valid.is_none()
    }
}

/// Fragment cache keyed by repository fingerprint.
///
/// Entries for different fingerprints are independent; operations on one
/// fingerprint are linearizable through the backing map's per-key locking.
#[derive(Debug, Default)]
pub struct FragmentCache {
    entries: DashMap<Fingerprint, CacheEntry>,
}

impl FragmentCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_known(&self, fingerprint: &Fingerprint) -> Option<Fragment> {
        self.entries
            .get(fingerprint)
            .and_then(|e| e.known.clone())
    }

    pub fn get_valid(&self, fingerprint: &Fingerprint) -> Option<Fragment> {
        self.entries
            .get(fingerprint)
            .and_then(|e| e.valid.clone())
    }

    pub fn set_known(&self, fingerprint: &Fingerprint, fragment: Fragment) {
        self.entries
            .entry(fingerprint.clone())
            .or_default()
            .known = Some(fragment);
    }

    pub fn mark_valid(&self, fingerprint: &Fingerprint, fragment: Fragment) {
        self.entries
            .entry(fingerprint.clone())
            .or_default()
            .valid = Some(fragment);
    }

    pub fn remove_known(&self, fingerprint: &Fingerprint) {
        self.entries
            .remove_if_mut(fingerprint, |_, entry| {
                entry.known = None;
                entry.is_empty()
            });
    }

    pub fn remove_valid(&self, fingerprint: &Fingerprint) {
        self.entries
            .remove_if_mut(fingerprint, |_, entry| {
                entry.valid = None;
                entry.is_empty()
            });
    }

    /// All fingerprints currently holding a known or valid entry.
    pub fn fingerprints(&self) -> Vec<Fingerprint> {
        self.entries.iter().map(|e| e.key().clone()).collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use conflux_core::{PipelineGroup, RepoOrigin};

    fn fingerprint(s: &str) -> Fingerprint {
        Fingerprint::new(s).unwrap()
    }

    fn fragment(fp: &str, pipeline: &str) -> Fragment {
        let origin = RepoOrigin::new(fingerprint(fp), format!("{fp}.git"), "rev1");
        Fragment::new(
            origin,
            vec![PipelineGroup::new("group", vec![pipeline.to_string()])],
            Vec::new(),
        )
    }

    #[test]
    fn test_empty_cache() {
        let cache = FragmentCache::new();
        let fp = fingerprint("f1");
        assert!(cache.get_known(&fp).is_none());
        assert!(cache.get_valid(&fp).is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_known_and_valid_slots_independent() {
        let cache = FragmentCache::new();
        let fp = fingerprint("f1");

        cache.set_known(&fp, fragment("f1", "new"));
        cache.mark_valid(&fp, fragment("f1", "old"));

        // Known ahead of valid is a legal, expected divergence
        let known = cache.get_known(&fp).unwrap();
        let valid = cache.get_valid(&fp).unwrap();
        assert!(!known.same_definitions(&valid));
    }

    #[test]
    fn test_remove_known_keeps_valid() {
        let cache = FragmentCache::new();
        let fp = fingerprint("f1");
        cache.set_known(&fp, fragment("f1", "a"));
        cache.mark_valid(&fp, fragment("f1", "a"));

        cache.remove_known(&fp);
        assert!(cache.get_known(&fp).is_none());
        assert!(cache.get_valid(&fp).is_some());
        assert_eq!(cache.fingerprints(), vec![fp]);
    }

    #[test]
    fn test_entry_dropped_when_both_slots_empty() {
        let cache = FragmentCache::new();
        let fp = fingerprint("f1");
        cache.set_known(&fp, fragment("f1", "a"));
        cache.mark_valid(&fp, fragment("f1", "a"));

        cache.remove_known(&fp);
        cache.remove_valid(&fp);
        assert!(cache.is_empty());
        assert!(cache.fingerprints().is_empty());
    }

    #[test]
    fn test_remove_on_missing_fingerprint_is_noop() {
        let cache = FragmentCache::new();
        cache.remove_known(&fingerprint("nope"));
        cache.remove_valid(&fingerprint("nope"));
        assert!(cache.is_empty());
    }

    #[test]
    fn test_fingerprints_enumerates_both_slots() {
        let cache = FragmentCache::new();
        cache.set_known(&fingerprint("f1"), fragment("f1", "a"));
        cache.mark_valid(&fingerprint("f2"), fragment("f2", "b"));

        let mut fps = cache.fingerprints();
        fps.sort();
        assert_eq!(fps, vec![fingerprint("f1"), fingerprint("f2")]);
    }
}

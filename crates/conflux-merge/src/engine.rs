//! Merge engine orchestration
//!
//! Per fragment-succeeded event: decide whether a merge is warranted, record
//! the rule verdict, cache the fragment as last known, attempt the atomic
//! structural merge, then either cache it as last valid or fall back while
//! recording a scoped health error. A broken fragment degrades to "last
//! known good" for its own repository only.

use crate::cache::FragmentCache;
use crate::equivalence::equivalent;
use crate::health::HealthReporter;
use crate::rules::RuleEvaluator;
use crate::signal::MaterialChangeSignal;
use crate::sink::{ConfigUpdateSink, FragmentUpdate};
use crate::watch::WatchList;
use crate::Result;
use conflux_core::{
    ConfigRepo, Fingerprint, Fragment, HealthRecord, HealthScope, MergedConfiguration,
};
use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Health record kind for rejected merges.
pub const INVALID_MERGE: &str = "Invalid merged configuration";

/// What a fragment-succeeded event did to the live configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeOutcome {
    /// Stale fingerprint or equivalent content; nothing was attempted.
    Skipped,
    /// The fragment was merged and is now the valid contribution.
    Merged,
    /// The merge was attempted and rejected; previous state stands.
    Failed,
}

pub struct MergeEngine {
    watch_list: Arc<WatchList>,
    cache: Arc<FragmentCache>,
    sink: Arc<dyn ConfigUpdateSink>,
    rules: Arc<dyn RuleEvaluator>,
    health: Arc<dyn HealthReporter>,
    signal: Arc<dyn MaterialChangeSignal>,
    // Serializes the decide/cache/apply sequence per fingerprint; events for
    // different fingerprints proceed independently.
    locks: DashMap<Fingerprint, Arc<Mutex<()>>>,
}

impl MergeEngine {
    pub fn new(
        watch_list: Arc<WatchList>,
        cache: Arc<FragmentCache>,
        sink: Arc<dyn ConfigUpdateSink>,
        rules: Arc<dyn RuleEvaluator>,
        health: Arc<dyn HealthReporter>,
        signal: Arc<dyn MaterialChangeSignal>,
    ) -> Self {
        Self {
            watch_list,
            cache,
            sink,
            rules,
            health,
            signal,
            locks: DashMap::new(),
        }
    }

    pub fn cache(&self) -> &Arc<FragmentCache> {
        &self.cache
    }

    pub fn watch_list(&self) -> &Arc<WatchList> {
        &self.watch_list
    }

    fn fingerprint_lock(&self, fingerprint: &Fingerprint) -> Arc<Mutex<()>> {
        self.locks
            .entry(fingerprint.clone())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Handle a successfully parsed fragment for one repository.
    pub async fn on_fragment_succeeded(&self, repo: &ConfigRepo, incoming: Fragment) -> MergeOutcome {
        let fingerprint = repo.fingerprint().clone();

        // Stale event from a repository removed mid-flight
        if !self.watch_list.has_repo(&fingerprint) {
            debug!(%fingerprint, "ignoring fragment for untracked repository");
            return MergeOutcome::Skipped;
        }

        let lock = self.fingerprint_lock(&fingerprint);
        let _guard = lock.lock().await;

        let known = self.cache.get_known(&fingerprint);
        let should_merge = !equivalent(known.as_ref(), Some(&incoming))
            || self.signal.changed_since_last_update(&fingerprint);
        if !should_merge {
            debug!(%fingerprint, "fragment equivalent to last known, skipping merge");
            return MergeOutcome::Skipped;
        }

        // Rule verdict taken before any cache mutation so the fallback
        // decision below compares against the pre-attempt valid fragment.
        let incoming_violates = self.rules.violates_rules(repo, Some(&incoming));

        self.cache.set_known(&fingerprint, incoming.clone());

        let update = FragmentUpdate::new(incoming.clone(), fingerprint.clone());
        match self.sink.apply(update).await {
            Ok(()) => {
                // The watch list may have dropped this repository while the
                // apply was in flight; caching the result would resurrect an
                // entry the prune just removed.
                if !self.watch_list.has_repo(&fingerprint) {
                    debug!(%fingerprint, "repository removed during merge, discarding result");
                    self.cache.remove_known(&fingerprint);
                    return MergeOutcome::Skipped;
                }
                self.cache.mark_valid(&fingerprint, incoming);
                self.health.clear(&HealthScope::config_repo(&fingerprint));
                info!(%fingerprint, "fragment merged into configuration");
                MergeOutcome::Merged
            }
            Err(e) => {
                warn!(%fingerprint, error = %e, "fragment merge rejected");
                let message =
                    format!("{e} - for config repo: {}", incoming.origin().display_name());
                self.health.set_error(HealthRecord::error(
                    HealthScope::config_repo(&fingerprint),
                    INVALID_MERGE,
                    message,
                ));

                // An old fragment must not stay authoritative once its own
                // permissions are revoked; any future merge re-earns
                // validity from a clean slate.
                let previous_valid = self.cache.get_valid(&fingerprint);
                if incoming_violates
                    && self.rules.violates_rules(repo, previous_valid.as_ref())
                {
                    self.cache.remove_valid(&fingerprint);
                }
                MergeOutcome::Failed
            }
        }
    }

    /// Handle a failed poll-and-parse cycle. The previously cached known and
    /// valid state stands; scheduling decisions triggered by the failure
    /// belong to the polling layer.
    pub fn on_fragment_failed(&self, repo: &ConfigRepo, error: &str) {
        debug!(
            fingerprint = %repo.fingerprint(),
            error,
            "fragment parse failed, keeping previous state"
        );
    }

    /// React to a replacement of the tracked repository set: publish the new
    /// watch list and drop cache entries for fingerprints no longer on it.
    /// Idempotent and order-independent across fingerprints.
    pub fn on_watch_list_changed(&self, new_repos: Vec<ConfigRepo>) {
        self.watch_list.replace(new_repos);

        for fingerprint in self.cache.fingerprints() {
            if !self.watch_list.has_repo(&fingerprint) {
                debug!(%fingerprint, "pruning cache for removed repository");
                self.cache.remove_known(&fingerprint);
                self.cache.remove_valid(&fingerprint);
                self.locks.remove(&fingerprint);
            }
        }
    }

    /// Pure merge: fold a fragment into a caller-supplied configuration
    /// snapshot under the same semantics as the event-driven path, without
    /// touching the cache or the live configuration.
    pub fn merge(
        &self,
        fragment: &Fragment,
        fingerprint: &Fingerprint,
        mut config: MergedConfiguration,
    ) -> Result<MergedConfiguration> {
        FragmentUpdate::new(fragment.clone(), fingerprint.clone()).apply_to(&mut config)?;
        Ok(config)
    }
}

//! Configuration update sink: the single serialization point for mutation
//! of the live merged configuration.

use crate::{MergeError, Result};
use arc_swap::ArcSwap;
use async_trait::async_trait;
use conflux_core::{Fingerprint, Fragment, MergedConfiguration};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::debug;

/// A proposed mutation of the full configuration: replace the contribution
/// stored under one fingerprint with a new fragment.
///
/// The same operation backs both the event-driven path and the pure preview
/// merge, so their semantics cannot drift apart.
#[derive(Debug, Clone)]
pub struct FragmentUpdate {
    fragment: Fragment,
    fingerprint: Fingerprint,
}

impl FragmentUpdate {
    pub fn new(fragment: Fragment, fingerprint: Fingerprint) -> Self {
        Self {
            fragment,
            fingerprint,
        }
    }

    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }

    pub fn fragment(&self) -> &Fragment {
        &self.fragment
    }

    /// Fold this update into a configuration document and validate the
    /// whole result. On error the document may hold the partial mutation;
    /// callers mutate a private copy and discard it on failure.
    pub fn apply_to(&self, config: &mut MergedConfiguration) -> Result<()> {
        config.remove_contribution(&self.fingerprint);
        config.set_contribution(self.fingerprint.clone(), self.fragment.clone());
        config.validate()?;
        Ok(())
    }
}

/// Atomically applies a proposed update: either the full configuration is
/// replaced with a valid document incorporating it, or it is left completely
/// unchanged and a failure reason is returned.
#[async_trait]
pub trait ConfigUpdateSink: Send + Sync {
    async fn apply(&self, update: FragmentUpdate) -> Result<()>;
}

/// Update sink over a versioned immutable snapshot.
///
/// Readers load the current snapshot without locking; writers serialize on
/// one mutex, mutate a private clone, validate, and swap the pointer only on
/// success. Concurrent `apply` calls therefore never observe a half-applied
/// intermediate state.
#[derive(Debug)]
pub struct SnapshotUpdateSink {
    current: ArcSwap<MergedConfiguration>,
    writer: Mutex<()>,
}

impl SnapshotUpdateSink {
    pub fn new(initial: MergedConfiguration) -> Self {
        Self {
            current: ArcSwap::from_pointee(initial),
            writer: Mutex::new(()),
        }
    }

    /// The live configuration snapshot.
    pub fn current(&self) -> Arc<MergedConfiguration> {
        self.current.load_full()
    }
}

#[async_trait]
impl ConfigUpdateSink for SnapshotUpdateSink {
    async fn apply(&self, update: FragmentUpdate) -> Result<()> {
        let _guard = self.writer.lock().await;
        let mut candidate = MergedConfiguration::clone(&self.current.load());
        update.apply_to(&mut candidate)?;
        self.current.store(Arc::new(candidate));
        debug!(fingerprint = %update.fingerprint(), "configuration snapshot updated");
        Ok(())
    }
}

/// Sink adapter that rejects every update with a fixed reason. Useful for
/// exercising failure paths without constructing an invalid document.
#[derive(Debug)]
pub struct RejectingSink {
    reason: String,
}

impl RejectingSink {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

#[async_trait]
impl ConfigUpdateSink for RejectingSink {
    async fn apply(&self, _update: FragmentUpdate) -> Result<()> {
        Err(MergeError::rejected(self.reason.clone()))
    }
}

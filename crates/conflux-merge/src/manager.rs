//! Merge manager
//!
//! Wires the engine to its inbound event channels and broadcasts accepted
//! configuration changes to subscribers. Fragment outcomes are consumed by a
//! single task, which preserves per-fingerprint arrival order.

use crate::cache::FragmentCache;
use crate::engine::{MergeEngine, MergeOutcome};
use crate::events::{ConfigChangeEvent, FragmentOutcome, WatchListChange};
use crate::health::{HealthReporter, InMemoryHealthReporter};
use crate::rules::{DirectiveEvaluator, RuleEvaluator};
use crate::signal::{MaterialChangeSignal, NoChangeSignal};
use crate::sink::SnapshotUpdateSink;
use crate::watch::WatchList;

use conflux_core::{ConfigRepo, MergedConfiguration};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::{debug, info};

const DEFAULT_CHANNEL_CAPACITY: usize = 100;

/// Merge manager builder
pub struct MergeManagerBuilder {
    initial: MergedConfiguration,
    repos: Vec<ConfigRepo>,
    rules: Option<Arc<dyn RuleEvaluator>>,
    health: Option<Arc<dyn HealthReporter>>,
    signal: Option<Arc<dyn MaterialChangeSignal>>,
    channel_capacity: usize,
}

impl MergeManagerBuilder {
    pub fn new() -> Self {
        Self {
            initial: MergedConfiguration::new(),
            repos: Vec::new(),
            rules: None,
            health: None,
            signal: None,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
        }
    }

    /// Set the initial (locally defined) configuration.
    pub fn with_initial(mut self, initial: MergedConfiguration) -> Self {
        self.initial = initial;
        self
    }

    /// Set the initially tracked configuration repositories.
    pub fn with_repos(mut self, repos: Vec<ConfigRepo>) -> Self {
        self.repos = repos;
        self
    }

    /// Override the rule evaluator.
    pub fn with_rules(mut self, rules: Arc<dyn RuleEvaluator>) -> Self {
        self.rules = Some(rules);
        self
    }

    /// Override the health reporter.
    pub fn with_health(mut self, health: Arc<dyn HealthReporter>) -> Self {
        self.health = Some(health);
        self
    }

    /// Override the force-remerge signal.
    pub fn with_signal(mut self, signal: Arc<dyn MaterialChangeSignal>) -> Self {
        self.signal = Some(signal);
        self
    }

    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn build(self) -> MergeManager {
        let sink = Arc::new(SnapshotUpdateSink::new(self.initial));
        let engine = Arc::new(MergeEngine::new(
            Arc::new(WatchList::with_repos(self.repos)),
            Arc::new(FragmentCache::new()),
            sink.clone(),
            self.rules
                .unwrap_or_else(|| Arc::new(DirectiveEvaluator::new())),
            self.health
                .unwrap_or_else(|| Arc::new(InMemoryHealthReporter::new())),
            self.signal.unwrap_or_else(|| Arc::new(NoChangeSignal::new())),
        ));
        let (event_tx, _) = broadcast::channel(self.channel_capacity);

        MergeManager {
            engine,
            sink,
            event_bus: event_tx,
            channel_capacity: self.channel_capacity,
        }
    }
}

impl Default for MergeManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Inbound channel endpoints handed to the polling and configuration layers.
pub struct InboundChannels {
    pub fragment_outcomes: mpsc::Sender<FragmentOutcome>,
    pub watch_list_changes: mpsc::Sender<WatchListChange>,
}

/// Central coordinator for the merge engine's event flow
pub struct MergeManager {
    engine: Arc<MergeEngine>,
    sink: Arc<SnapshotUpdateSink>,
    event_bus: broadcast::Sender<ConfigChangeEvent>,
    channel_capacity: usize,
}

impl MergeManager {
    /// Create a new builder
    pub fn builder() -> MergeManagerBuilder {
        MergeManagerBuilder::new()
    }

    pub fn engine(&self) -> &Arc<MergeEngine> {
        &self.engine
    }

    /// The live merged configuration snapshot.
    pub fn current(&self) -> Arc<MergedConfiguration> {
        self.sink.current()
    }

    /// Subscribe to accepted configuration changes.
    pub fn subscribe(&self) -> broadcast::Receiver<ConfigChangeEvent> {
        self.event_bus.subscribe()
    }

    /// Start consuming events. Returns the inbound channel endpoints; the
    /// consumers stop when all senders are dropped.
    pub fn start(&self) -> InboundChannels {
        let (outcome_tx, mut outcome_rx) = mpsc::channel::<FragmentOutcome>(self.channel_capacity);
        let (watch_tx, mut watch_rx) = mpsc::channel::<WatchListChange>(self.channel_capacity);

        let engine = Arc::clone(&self.engine);
        let event_bus = self.event_bus.clone();
        tokio::spawn(async move {
            while let Some(outcome) = outcome_rx.recv().await {
                match outcome {
                    FragmentOutcome::Succeeded { repo, fragment } => {
                        let event = ConfigChangeEvent::merged(&fragment);
                        let result = engine.on_fragment_succeeded(&repo, fragment).await;
                        if result == MergeOutcome::Merged && event_bus.send(event).is_err() {
                            debug!("no subscribers for configuration change event");
                        }
                    }
                    FragmentOutcome::Failed { repo, error } => {
                        engine.on_fragment_failed(&repo, &error);
                    }
                }
            }
            debug!("fragment outcome channel closed");
        });

        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            while let Some(change) = watch_rx.recv().await {
                engine.on_watch_list_changed(change.into_repos());
            }
            debug!("watch list channel closed");
        });

        info!("merge manager started");
        InboundChannels {
            fragment_outcomes: outcome_tx,
            watch_list_changes: watch_tx,
        }
    }
}

impl std::fmt::Debug for MergeManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MergeManager")
            .field("tracked_repos", &self.engine.watch_list().len())
            .field("cached_fingerprints", &self.engine.cache().len())
            .finish()
    }
}

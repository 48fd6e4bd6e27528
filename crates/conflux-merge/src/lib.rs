//! Partial-configuration merge-and-cache engine
//!
//! This crate reconciles configuration fragments contributed by
//! independently polled configuration repositories into one authoritative
//! merged configuration:
//! - Caches the last known and last valid fragment per repository
//! - Suppresses redundant merges when incoming content is equivalent
//! - Applies updates atomically through a validate-then-swap sink
//! - Records scoped health errors instead of propagating failures
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                         MergeManager                           │
//! │   fragment outcomes ──┐          ┌── watch-list changes        │
//! │                       ▼          ▼                             │
//! │                  ┌──────────────────┐                          │
//! │                  │   MergeEngine    │                          │
//! │                  └───┬─────┬─────┬──┘                          │
//! │          FragmentCache  RuleEvaluator  HealthReporter          │
//! │                      │                                         │
//! │               ┌──────▼─────────┐                               │
//! │               │ConfigUpdateSink│  validate-then-swap           │
//! │               └──────┬─────────┘                               │
//! └──────────────────────┼─────────────────────────────────────────┘
//!                        ▼
//!              MergedConfiguration snapshot
//! ```

pub mod cache;
pub mod engine;
pub mod equivalence;
pub mod events;
pub mod health;
pub mod manager;
pub mod rules;
pub mod signal;
pub mod sink;
pub mod watch;

// Re-export main types
pub use cache::FragmentCache;
pub use engine::{MergeEngine, MergeOutcome};
pub use equivalence::equivalent;
pub use events::{ConfigChangeEvent, FragmentOutcome, WatchListChange};
pub use health::{HealthReporter, InMemoryHealthReporter};
pub use manager::{InboundChannels, MergeManager, MergeManagerBuilder};
pub use rules::{DirectiveEvaluator, RuleEvaluator};
pub use signal::{MaterialChangeSignal, NoChangeSignal};
pub use sink::{ConfigUpdateSink, FragmentUpdate, RejectingSink, SnapshotUpdateSink};
pub use watch::WatchList;

/// Error types for merge operations
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("Merged configuration is invalid: {0}")]
    Validation(#[from] conflux_core::CoreError),

    #[error("Update rejected: {0}")]
    Rejected(String),
}

impl MergeError {
    pub fn rejected(msg: impl Into<String>) -> Self {
        Self::Rejected(msg.into())
    }
}

/// Result type for merge operations
pub type Result<T> = std::result::Result<T, MergeError>;

//! Health reporting seam
//!
//! The engine records a scoped error when a merge fails and clears it when a
//! later attempt for the same scope succeeds; rendering is someone else's
//! concern.

use conflux_core::{HealthRecord, HealthScope};
use dashmap::DashMap;

pub trait HealthReporter: Send + Sync {
    /// Record (or supersede) the error state for the record's scope.
    fn set_error(&self, record: HealthRecord);

    /// Drop any error state for the scope.
    fn clear(&self, scope: &HealthScope);
}

/// Map-backed reporter suitable for in-process operator surfaces and tests.
#[derive(Debug, Default)]
pub struct InMemoryHealthReporter {
    records: DashMap<HealthScope, HealthRecord>,
}

impl InMemoryHealthReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, scope: &HealthScope) -> Option<HealthRecord> {
        self.records.get(scope).map(|r| r.value().clone())
    }

    /// Snapshot of all current error states, for operator-facing listings.
    pub fn records(&self) -> Vec<HealthRecord> {
        self.records.iter().map(|r| r.value().clone()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl HealthReporter for InMemoryHealthReporter {
    fn set_error(&self, record: HealthRecord) {
        self.records.insert(record.scope().clone(), record);
    }

    fn clear(&self, scope: &HealthScope) {
        self.records.remove(scope);
    }
}

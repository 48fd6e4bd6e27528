//! External force-remerge signal
//!
//! The polling layer may require a re-merge even when the incoming fragment
//! is byte-identical to the cached one, e.g. because the repository's own
//! configuration (such as its rules) changed since the last update. The
//! conditions under which the signal fires are owned by that layer; the
//! engine treats it as an opaque boolean input.

use conflux_core::Fingerprint;

pub trait MaterialChangeSignal: Send + Sync {
    fn changed_since_last_update(&self, fingerprint: &Fingerprint) -> bool;
}

/// Default wiring: never forces a re-merge.
#[derive(Debug, Default)]
pub struct NoChangeSignal;

impl NoChangeSignal {
    pub fn new() -> Self {
        Self
    }
}

impl MaterialChangeSignal for NoChangeSignal {
    fn changed_since_last_update(&self, _fingerprint: &Fingerprint) -> bool {
        false
    }
}

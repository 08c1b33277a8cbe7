//! Shared engine state: definition cache plus the cycle guard.

use std::sync::atomic::{AtomicBool, Ordering};

use crate::cache::DefinitionCache;

/// Mutable state of one sync engine instance.
///
/// Constructed per engine and passed by reference; there is no process-wide
/// singleton. The cache grows for the lifetime of the process, the guard is
/// taken and released around every cycle.
#[derive(Debug, Default)]
pub struct SyncState {
    cache: DefinitionCache,
    running: AtomicBool,
}

impl SyncState {
    /// Create fresh state with an empty cache and the guard released.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The definition cache.
    #[must_use]
    pub fn cache(&self) -> &DefinitionCache {
        &self.cache
    }

    /// Try to take the cycle guard.
    ///
    /// Returns `false` when a cycle is already in flight; the caller must
    /// then drop the tick instead of queueing it.
    pub fn begin_cycle(&self) -> bool {
        self.running
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    /// Release the cycle guard.
    pub fn end_cycle(&self) {
        self.running.store(false, Ordering::Release);
    }

    /// Whether a cycle is currently running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::Acquire)
    }
}

//! Process-lifetime definition cache.

use std::collections::HashSet;
use std::sync::{Mutex, MutexGuard};

use meteotree_types::PointId;

/// Set of point ids whose metadata has already been defined in this process.
///
/// The cache only avoids redundant define calls to the store; it is an
/// optimization, not a correctness mechanism. It never evicts: a restart
/// clears it, after which each point is redefined once (a store-level no-op
/// for unchanged metadata). Value writes bypass it entirely.
#[derive(Debug, Default)]
pub struct DefinitionCache {
    inner: Mutex<HashSet<String>>,
}

impl DefinitionCache {
    /// Create an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn locked(&self) -> MutexGuard<'_, HashSet<String>> {
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Whether the id has been marked as defined.
    #[must_use]
    pub fn has(&self, id: &PointId) -> bool {
        self.locked().contains(id.as_str())
    }

    /// Record an id as defined.
    pub fn mark(&self, id: &PointId) {
        self.locked().insert(id.as_str().to_string());
    }

    /// Number of cached ids.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locked().len()
    }

    /// Whether nothing has been marked yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locked().is_empty()
    }
}

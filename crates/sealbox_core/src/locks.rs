//! In-process per-key mutual exclusion.
//!
//! Concurrent writes or deletes against the *same* key would otherwise
//! race on the filesystem: two writers can both pass the existence check
//! before either creates artifacts. The lock table closes that race within
//! a process. Cross-process coordination is out of scope.

use parking_lot::lock_api::ArcMutexGuard;
use parking_lot::{Mutex, RawMutex};
use std::collections::HashMap;
use std::sync::Arc;

/// A table of locks keyed by entry name.
///
/// Lock entries are created on demand and reclaimed as soon as no guard
/// or waiter references them, so the table stays empty when uncontended.
#[derive(Debug, Default)]
pub(crate) struct KeyLocks {
    entries: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl KeyLocks {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Acquires the lock for `key`, blocking while another holder has it.
    pub(crate) fn lock(&self, key: &str) -> KeyLockGuard<'_> {
        let entry = {
            let mut entries = self.entries.lock();
            Arc::clone(entries.entry(key.to_owned()).or_default())
        };

        // Block outside the table lock so waiters don't stall other keys.
        let guard = entry.lock_arc();

        KeyLockGuard {
            locks: self,
            key: key.to_owned(),
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn entry_count(&self) -> usize {
        self.entries.lock().len()
    }
}

/// Guard for a per-key lock; releases and reclaims the entry on drop.
pub(crate) struct KeyLockGuard<'a> {
    locks: &'a KeyLocks,
    key: String,
    guard: Option<ArcMutexGuard<RawMutex, ()>>,
}

impl Drop for KeyLockGuard<'_> {
    fn drop(&mut self) {
        self.guard = None;

        let mut entries = self.locks.entries.lock();
        if let Some(entry) = entries.get(self.key.as_str()) {
            // Only the table itself still references the entry: no holder,
            // no waiter. Safe to reclaim.
            if Arc::strong_count(entry) == 1 {
                entries.remove(self.key.as_str());
            }
        }
    }
}

//! Per-aggregate async locks.
//!
//! Keys are always acquired in sorted order with duplicates removed, so two
//! callers asking for overlapping sets cannot deadlock. A caller that takes a
//! second set while holding a first one must only ask for keys that sort
//! after everything it already holds.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tppb_shared::types::{InventoryId, SubmissionId};

/// Identity of a lockable aggregate. The variant order is the acquisition order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LockKey {
    /// The chart of accounts.
    Accounts,
    /// The journal (entry sequence and bulk repairs).
    Journal,
    /// The number sequence of one BC document type.
    Numbering(String),
    /// Inventory lookups by item name and serial number.
    Item {
        /// Item name.
        name: String,
        /// Serial number.
        serial: String,
    },
    /// One submission.
    Submission(SubmissionId),
    /// One inventory record.
    Inventory(InventoryId),
}

/// Guards held for the lifetime of a critical section.
#[derive(Debug)]
pub struct LockSet {
    _guards: Vec<OwnedMutexGuard<()>>,
}

/// Registry of aggregate locks.
#[derive(Debug, Default)]
pub struct AggregateLocks {
    locks: DashMap<LockKey, Arc<Mutex<()>>>,
}

impl AggregateLocks {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquires every key, in sorted order.
    pub async fn acquire(&self, keys: impl IntoIterator<Item = LockKey>) -> LockSet {
        let mut keys: Vec<LockKey> = keys.into_iter().collect();
        keys.sort();
        keys.dedup();

        let mut guards = Vec::with_capacity(keys.len());
        for key in keys {
            let mutex = Arc::clone(&*self.locks.entry(key).or_default());
            guards.push(mutex.lock_owned().await);
        }
        LockSet { _guards: guards }
    }

    /// Number of keys ever locked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.locks.len()
    }

    /// Returns true if no key was ever locked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.locks.is_empty()
    }
}

//! Shared handle bundling the store, the lock registry and configuration.

use std::sync::Arc;

use tppb_shared::AppConfig;

use crate::locks::AggregateLocks;
use crate::repositories::{
    InventoryRepository, LedgerRepository, PostingRepository, SubmissionRepository,
};
use crate::store::Store;

/// Cheaply cloneable handle passed to every repository.
#[derive(Debug)]
pub struct Database<S> {
    store: Arc<S>,
    locks: Arc<AggregateLocks>,
    config: Arc<AppConfig>,
}

impl<S> Clone for Database<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
            locks: Arc::clone(&self.locks),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S: Store> Database<S> {
    /// Wraps a store.
    #[must_use]
    pub fn new(store: S, config: AppConfig) -> Self {
        Self::from_arc(Arc::new(store), config)
    }

    /// Wraps a shared store.
    #[must_use]
    pub fn from_arc(store: Arc<S>, config: AppConfig) -> Self {
        Self {
            store,
            locks: Arc::new(AggregateLocks::new()),
            config: Arc::new(config),
        }
    }

    /// The underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        &self.store
    }

    /// The lock registry.
    #[must_use]
    pub fn locks(&self) -> &AggregateLocks {
        &self.locks
    }

    /// Loaded configuration.
    #[must_use]
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Submission lifecycle operations.
    #[must_use]
    pub fn submissions(&self) -> SubmissionRepository<S> {
        SubmissionRepository::new(self.clone())
    }

    /// Inventory operations.
    #[must_use]
    pub fn inventory(&self) -> InventoryRepository<S> {
        InventoryRepository::new(self.clone())
    }

    /// Posting operations.
    #[must_use]
    pub fn postings(&self) -> PostingRepository<S> {
        PostingRepository::new(self.clone())
    }

    /// Chart of accounts and ledger operations.
    #[must_use]
    pub fn ledger(&self) -> LedgerRepository<S> {
        LedgerRepository::new(self.clone())
    }
}

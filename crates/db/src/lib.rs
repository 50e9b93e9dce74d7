//! Storage layer for the TPPB core.
//!
//! This crate provides:
//! - The abstract `Store` interface and an in-memory transactional store
//! - Per-aggregate locks and a unit of work for atomic multi-record writes
//! - Repositories exposing every lifecycle, inventory, posting and ledger operation

pub mod database;
pub mod locks;
pub mod memory;
pub mod record;
pub mod repositories;
pub mod store;
pub mod unit_of_work;

pub use database::Database;
pub use memory::MemoryStore;
pub use repositories::{
    ConfirmOutcome, InventoryRepository, LedgerRepository, MovementOutcome, PostingOutcome,
    PostingRepository, SubmissionFilter, SubmissionRepository, UpdateOutcome,
};
pub use store::{Collection, Filter, Snapshot, Store, StoreError, StoreResult, WriteOp};

use tppb_shared::AppConfig;

/// Opens the store described by the configuration.
///
/// # Errors
///
/// Returns an error if the snapshot file exists but cannot be loaded.
pub async fn connect(config: AppConfig) -> StoreResult<Database<MemoryStore>> {
    let store = match &config.store.snapshot_path {
        Some(path) => MemoryStore::open(path).await?,
        None => MemoryStore::new(),
    };
    Ok(Database::new(store, config))
}

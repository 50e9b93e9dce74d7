//! Repository abstractions for data access.
//!
//! Repositories run the pure rules from `tppb-core` under the right
//! aggregate locks and commit their results through a unit of work.

pub mod inventory;
pub mod ledger;
pub mod posting;
pub mod submission;

pub use inventory::{InventoryRepository, MovementOutcome};
pub use ledger::LedgerRepository;
pub use posting::{PostingOutcome, PostingRepository};
pub use submission::{ConfirmOutcome, SubmissionFilter, SubmissionRepository, UpdateOutcome};

use tppb_core::{DomainError, DomainResult};

use crate::record::{Record, decode, decode_all};
use crate::store::{Filter, Store};

/// Loads one record or fails with a not-found conflict.
pub(crate) async fn load<R: Record, S: Store + ?Sized>(
    store: &S,
    entity: &'static str,
    id: &str,
) -> DomainResult<R> {
    let doc = store
        .find_by_id(R::COLLECTION, id)
        .await?
        .ok_or_else(|| DomainError::not_found(entity, id))?;
    Ok(decode(doc)?)
}

/// Loads every record of `R`'s collection matching `filter`.
pub(crate) async fn find<R: Record, S: Store + ?Sized>(
    store: &S,
    filter: &Filter,
) -> DomainResult<Vec<R>> {
    let docs = store.select_all(R::COLLECTION, Some(filter)).await?;
    Ok(decode_all(docs)?)
}

/// Loads every record of `R`'s collection.
pub(crate) async fn all<R: Record, S: Store + ?Sized>(store: &S) -> DomainResult<Vec<R>> {
    let docs = store.select_all(R::COLLECTION, None).await?;
    Ok(decode_all(docs)?)
}




#[cfg(test)]
#[path = "ledger_tests.rs"]
mod ledger_tests;

#[cfg(test)]
#[path = "test_support.rs"]
pub(crate) mod test_support;

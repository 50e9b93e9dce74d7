//! Posting repository: financial postings with their stock deltas.
//!
//! Lock order: item, journal and document numbering first, then the matched
//! inventory record. The record is re-read once its lock is held.

use chrono::Utc;
use tppb_core::customs::{CustomsDocument, SubmissionService, SubmissionType};
use tppb_core::inventory::{InventoryRecord, MutationLog};
use tppb_core::ledger::{Account, JournalEntry};
use tppb_core::posting::{
    InboundTransaction, OutboundTransaction, PostingAccounts, PostingPlan, PostingService,
};
use tppb_core::{DomainError, DomainResult};
use tracing::{info, warn};

use super::{all, load};
use crate::database::Database;
use crate::locks::{LockKey, LockSet};
use crate::store::Store;
use crate::unit_of_work::{Sequence, UnitOfWork};

/// Records written by one posting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingOutcome {
    /// Journal entries, with their assigned sequence.
    pub entries: Vec<JournalEntry>,
    /// Inventory record after the stock delta.
    pub record: InventoryRecord,
    /// Mutation log entry of the delta.
    pub mutation: MutationLog,
    /// Draft BC document mirroring the posting.
    pub document: CustomsDocument,
}

/// Posting repository.
#[derive(Debug)]
pub struct PostingRepository<S> {
    db: Database<S>,
}

/// Locks and reads shared by both posting directions.
struct Prepared {
    _locks: Vec<LockSet>,
    accounts: PostingAccounts,
    existing: Option<InventoryRecord>,
    numbering: Sequence,
    document_number: u32,
}

impl<S: Store> PostingRepository<S> {
    /// Creates a new posting repository.
    #[must_use]
    pub const fn new(db: Database<S>) -> Self {
        Self { db }
    }

    /// Posts goods bought into the bonded area.
    ///
    /// # Errors
    ///
    /// - `OrphanReference` when a configured posting account is missing.
    /// - `Validation` for a non-positive quantity or a negative amount.
    /// - `Persistence` when the batch fails; nothing is written in that case.
    pub async fn post_inbound(&self, tx: InboundTransaction) -> DomainResult<PostingOutcome> {
        let prepared = self
            .prepare(SubmissionType::Inbound, &tx.item_name, &tx.serial_number)
            .await?;
        let plan = PostingService::plan_inbound(
            &tx,
            &prepared.accounts,
            prepared.existing.as_ref(),
            &self.db.config().customs,
            prepared.document_number,
            Utc::now(),
        )
        .inspect_err(|e| warn!(item = %tx.item_name, error = %e, "inbound posting refused"))?;

        let outcome = self.commit(plan, prepared.numbering).await?;
        info!(
            item = %tx.item_name,
            quantity = %tx.quantity,
            entries = outcome.entries.len(),
            stock = %outcome.record.current_stock,
            document = %outcome.document.number,
            "inbound posted"
        );
        Ok(outcome)
    }

    /// Posts goods sold out of the bonded area.
    ///
    /// # Errors
    ///
    /// - `OrphanReference` when a configured posting account is missing.
    /// - `Validation` for a non-positive quantity or a negative amount.
    /// - `InsufficientStock` when no record matches or its stock is too low.
    /// - `Persistence` when the batch fails; nothing is written in that case.
    pub async fn post_outbound(&self, tx: OutboundTransaction) -> DomainResult<PostingOutcome> {
        let prepared = self
            .prepare(SubmissionType::Outbound, &tx.item_name, &tx.serial_number)
            .await?;
        let plan = PostingService::plan_outbound(
            &tx,
            &prepared.accounts,
            prepared.existing.as_ref(),
            &self.db.config().customs,
            prepared.document_number,
            Utc::now(),
        )
        .inspect_err(|e| warn!(item = %tx.item_name, error = %e, "outbound posting refused"))?;

        let outcome = self.commit(plan, prepared.numbering).await?;
        info!(
            item = %tx.item_name,
            quantity = %tx.quantity,
            entries = outcome.entries.len(),
            stock = %outcome.record.current_stock,
            document = %outcome.document.number,
            "outbound posted"
        );
        Ok(outcome)
    }

    async fn prepare(
        &self,
        direction: SubmissionType,
        item_name: &str,
        serial_number: &str,
    ) -> DomainResult<Prepared> {
        let store = self.db.store();
        let master: Vec<Account> = all(store).await?;
        let accounts = PostingAccounts::resolve(&master, &self.db.config().posting)?;
        let (doc_type, _) = SubmissionService::doc_type_for(direction, &self.db.config().customs);

        let mut held = vec![
            self.db
                .locks()
                .acquire([
                    LockKey::Item {
                        name: item_name.to_string(),
                        serial: serial_number.to_string(),
                    },
                    LockKey::Journal,
                    LockKey::Numbering(doc_type.to_string()),
                ])
                .await,
        ];

        let records: Vec<InventoryRecord> = all(store).await?;
        let existing = match PostingService::find_matching(&records, item_name, serial_number) {
            Some(found) => {
                let id = found.id;
                held.push(self.db.locks().acquire([LockKey::Inventory(id)]).await);
                Some(load(store, "inventory", &id.to_string()).await?)
            }
            None => None,
        };

        let mut numbering = Sequence::load(store, &Sequence::numbering_key(doc_type)).await?;
        let document_number = u32::try_from(numbering.next_value()).map_err(|_| {
            DomainError::conflict("numbering", doc_type, "document sequence exhausted")
        })?;

        Ok(Prepared {
            _locks: held,
            accounts,
            existing,
            numbering,
            document_number,
        })
    }

    async fn commit(&self, plan: PostingPlan, numbering: Sequence) -> DomainResult<PostingOutcome> {
        let store = self.db.store();
        let mut journal = Sequence::load(store, Sequence::JOURNAL).await?;
        let entries: Vec<JournalEntry> = plan
            .entries
            .into_iter()
            .map(|mut entry| {
                entry.sequence = journal.next_value();
                entry
            })
            .collect();

        let mut uow = UnitOfWork::new();
        for entry in &entries {
            uow.insert(entry)?;
        }
        if plan.record_created {
            uow.insert(&plan.record)?;
        } else {
            uow.update(&plan.record)?;
        }
        uow.insert(&plan.mutation)?;
        uow.insert(&plan.document)?;
        uow.counter(&journal)?;
        uow.counter(&numbering)?;
        uow.commit(store).await?;

        Ok(PostingOutcome {
            entries,
            record: plan.record,
            mutation: plan.mutation,
            document: plan.document,
        })
    }
}

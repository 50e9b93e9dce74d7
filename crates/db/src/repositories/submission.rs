//! Submission repository: the customs lifecycle over the store.
//!
//! Every write path holds the submission's lock, re-reads the submission
//! under it and commits side effects and the merged submission in one
//! unit of work, submission last.

use chrono::Utc;
use tppb_core::customs::{
    CustomsDocument, CustomsStatus, DocumentStatus, NewSubmission, Submission, SubmissionPatch,
    SubmissionService, SubmissionType, Transition, TransactionLog,
};
use tppb_core::inventory::InventoryRecord;
use tppb_core::{DomainError, DomainResult};
use tppb_shared::types::SubmissionId;
use tracing::{debug, info, warn};

use super::{find, load};
use crate::database::Database;
use crate::locks::LockKey;
use crate::record::{decode_all, encode};
use crate::store::{Collection, Filter, Store};
use crate::unit_of_work::{Sequence, UnitOfWork};

/// Listing filter for submissions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SubmissionFilter {
    /// Only submissions in this status.
    pub document_status: Option<DocumentStatus>,
    /// Only submissions of this type.
    pub submission_type: Option<SubmissionType>,
}

/// Result of confirming a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfirmOutcome {
    /// The submission after confirmation.
    pub submission: Submission,
    /// Its BC document.
    pub document: CustomsDocument,
    /// False when the submission was already confirmed.
    pub created: bool,
}

/// Result of updating a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOutcome {
    /// The persisted submission.
    pub submission: Submission,
    /// What the status change did.
    pub transition: Transition,
    /// Inventory records opened by an approval.
    pub inventory: Vec<InventoryRecord>,
    /// Transaction log written by an approval or rejection.
    pub transaction_log: Option<TransactionLog>,
}

/// Submission lifecycle repository.
#[derive(Debug)]
pub struct SubmissionRepository<S> {
    db: Database<S>,
}

impl<S: Store> SubmissionRepository<S> {
    /// Creates a new submission repository.
    #[must_use]
    pub const fn new(db: Database<S>) -> Self {
        Self { db }
    }

    /// Creates a submission in `pengajuan`.
    ///
    /// # Errors
    ///
    /// `Validation` for an invalid request, `Persistence` on store failure.
    pub async fn create(&self, input: NewSubmission) -> DomainResult<Submission> {
        let submission = SubmissionService::build(input, Utc::now())?;
        self.db
            .store()
            .insert(Collection::Submissions, encode(&submission)?)
            .await?;

        info!(
            submission_id = %submission.id,
            submission_type = %submission.submission_type,
            packages = submission.packages.len(),
            "submission created"
        );
        Ok(submission)
    }

    /// Loads a submission.
    ///
    /// # Errors
    ///
    /// `StateConflict` (not found) when the id is unknown.
    pub async fn get(&self, id: SubmissionId) -> DomainResult<Submission> {
        load(self.db.store(), "submission", &id.to_string()).await
    }

    /// Lists submissions in insertion order.
    pub async fn list(&self, filter: SubmissionFilter) -> DomainResult<Vec<Submission>> {
        let mut query = Filter::new();
        if let Some(status) = filter.document_status {
            query = query.where_eq("document_status", status.as_str());
        }
        if let Some(submission_type) = filter.submission_type {
            query = query.where_eq("type", submission_type.as_str());
        }
        let docs = self
            .db
            .store()
            .select_all(Collection::Submissions, Some(&query))
            .await?;
        Ok(decode_all(docs)?)
    }

    /// Generates the BC document for a submission.
    ///
    /// Confirming twice returns the document created the first time.
    ///
    /// # Errors
    ///
    /// `StateConflict` when the submission does not exist.
    pub async fn confirm(&self, id: SubmissionId) -> DomainResult<ConfirmOutcome> {
        let current = self.get(id).await?;
        let config = &self.db.config().customs;
        let (doc_type, _) = SubmissionService::doc_type_for(current.submission_type, config);

        let _locks = self
            .db
            .locks()
            .acquire([
                LockKey::Numbering(doc_type.to_string()),
                LockKey::Submission(id),
            ])
            .await;
        let current = self.get(id).await?;

        if current.customs_status == CustomsStatus::Confirmed {
            let document = self
                .documents_for(id)
                .await?
                .into_iter()
                .next()
                .ok_or_else(|| {
                    DomainError::conflict("submission", id, "confirmed without a BC document")
                })?;
            debug!(submission_id = %id, number = %document.number, "already confirmed");
            return Ok(ConfirmOutcome {
                submission: current,
                document,
                created: false,
            });
        }

        let now = Utc::now();
        let mut numbering =
            Sequence::load(self.db.store(), &Sequence::numbering_key(doc_type)).await?;
        let number = u32::try_from(numbering.next_value()).map_err(|_| {
            DomainError::conflict("numbering", doc_type, "document sequence exhausted")
        })?;
        let document =
            SubmissionService::customs_document(&current, config, number, now.date_naive());
        let submission = SubmissionService::confirmed(&current, now);

        let mut uow = UnitOfWork::new();
        uow.insert(&document)?;
        uow.counter(&numbering)?;
        uow.update(&submission)?;
        uow.commit(self.db.store()).await?;

        info!(
            submission_id = %id,
            doc_type = %document.doc_type,
            number = %document.number,
            "submission confirmed"
        );
        Ok(ConfirmOutcome {
            submission,
            document,
            created: true,
        })
    }

    /// Applies a patch, firing approval or rejection side effects on the
    /// first transition into that status.
    ///
    /// # Errors
    ///
    /// - `StateConflict` when the submission does not exist, the transition
    ///   is illegal, or packages change after a decision.
    /// - `Validation` when an approval or rejection precondition is missing.
    /// - `Persistence` when the batch fails; nothing is written in that case.
    pub async fn update(
        &self,
        id: SubmissionId,
        patch: SubmissionPatch,
    ) -> DomainResult<UpdateOutcome> {
        let _locks = self.db.locks().acquire([LockKey::Submission(id)]).await;
        let current = self.get(id).await?;
        let previous_status = current.document_status;
        let now = Utc::now();

        let plan = SubmissionService::apply_patch(&current, patch, now).inspect_err(|e| {
            warn!(submission_id = %id, error = %e, "submission update refused");
        })?;
        let config = &self.db.config().customs;

        let mut uow = UnitOfWork::new();
        let mut inventory = Vec::new();
        let mut transaction_log = None;

        match plan.transition {
            Transition::Approve => {
                let effects = SubmissionService::approval_effects(&plan.submission, config, now)?;
                for (record, mutation) in effects.inventory {
                    uow.insert(&record)?;
                    uow.insert(&mutation)?;
                    inventory.push(record);
                }
                uow.insert(&effects.transaction_log)?;
                transaction_log = Some(effects.transaction_log);
            }
            Transition::Reject => {
                let log = SubmissionService::rejection_effects(&plan.submission, config, now);
                uow.insert(&log)?;
                transaction_log = Some(log);
            }
            Transition::NoOp => {}
        }
        uow.update(&plan.submission)?;
        uow.commit(self.db.store()).await?;

        if plan.transition.has_side_effects() {
            info!(
                submission_id = %id,
                from = %previous_status,
                to = %plan.submission.document_status,
                inventory_records = inventory.len(),
                "submission status changed"
            );
        } else {
            debug!(
                submission_id = %id,
                status = %previous_status,
                "submission updated without transition"
            );
        }

        Ok(UpdateOutcome {
            submission: plan.submission,
            transition: plan.transition,
            inventory,
            transaction_log,
        })
    }

    /// BC documents linked to a submission.
    pub async fn documents_for(&self, id: SubmissionId) -> DomainResult<Vec<CustomsDocument>> {
        find(
            self.db.store(),
            &Filter::new().where_eq("submission_id", id.to_string()),
        )
        .await
    }

    /// Transaction logs of a submission.
    pub async fn transaction_logs_for(
        &self,
        id: SubmissionId,
    ) -> DomainResult<Vec<TransactionLog>> {
        find(
            self.db.store(),
            &Filter::new().where_eq("submission_id", id.to_string()),
        )
        .await
    }
}

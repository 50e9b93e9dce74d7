//! Submission lifecycle rules.
//!
//! Everything here is pure: the functions build the records a transition
//! would write and leave persistence to the caller, which commits the
//! side effects and the merged submission as one unit.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use tppb_shared::config::CustomsConfig;
use tppb_shared::types::{
    CustomsDocumentId, ItemId, Money, PackageId, SubmissionId, TransactionLogId,
};
use tracing::debug;

use super::state::{SubmissionStateMachine, Transition};
use super::types::{
    CustomsDocument, CustomsDocumentStatus, CustomsStatus, DocumentStatus, Item, NewPackage,
    NewSubmission, Package, Submission, SubmissionPatch, SubmissionType, TransactionLog,
    TransactionLogKind,
};
use crate::error::{DomainError, DomainResult};
use crate::inventory::{
    InventoryRecord, MovementType, MutationLog, NewMovement, RecordSeed, StockLedger,
};

/// Destination of goods taken in on approval.
pub const WAREHOUSE: &str = "gudang";

/// A submission after a patch, with the transition the patch requested.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchPlan {
    /// Merged submission, version bumped.
    pub submission: Submission,
    /// Transition resolved from the status change.
    pub transition: Transition,
}

/// Records created by approving a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApprovalEffects {
    /// One record per item, each with its opening movement's log.
    pub inventory: Vec<(InventoryRecord, MutationLog)>,
    /// The inbound or outbound transaction log.
    pub transaction_log: TransactionLog,
}

/// Stateless service for the submission lifecycle.
pub struct SubmissionService;

impl SubmissionService {
    /// Validates a create request.
    ///
    /// # Errors
    ///
    /// `Validation` on a blank customer, no packages, no items at all, or an
    /// invalid item line.
    pub fn validate_new(input: &NewSubmission) -> DomainResult<()> {
        if input.customer.trim().is_empty() {
            return Err(DomainError::validation(
                "submission",
                "customer cannot be empty",
            ));
        }
        Self::validate_packages(&input.packages)
    }

    /// Validates a set of packages.
    ///
    /// # Errors
    ///
    /// `Validation` when the set is empty, holds no item, or an item has a
    /// blank name, a non-positive quantity or a negative value.
    pub fn validate_packages(packages: &[NewPackage]) -> DomainResult<()> {
        if packages.is_empty() {
            return Err(DomainError::validation(
                "submission",
                "at least one package is required",
            ));
        }
        if packages.iter().all(|p| p.items.is_empty()) {
            return Err(DomainError::validation(
                "submission",
                "at least one package must contain an item",
            ));
        }

        for package in packages {
            for item in &package.items {
                if item.name.trim().is_empty() {
                    return Err(DomainError::validation("item", "name cannot be empty"));
                }
                if item.quantity <= Decimal::ZERO {
                    return Err(DomainError::validation(
                        "item",
                        format!("quantity of {} must be positive", item.name),
                    ));
                }
                if item.value < Decimal::ZERO {
                    return Err(DomainError::validation(
                        "item",
                        format!("value of {} cannot be negative", item.name),
                    ));
                }
            }
        }
        Ok(())
    }

    /// Builds a new submission in `pengajuan`/`draft`.
    ///
    /// # Errors
    ///
    /// See [`Self::validate_new`].
    pub fn build(input: NewSubmission, now: DateTime<Utc>) -> DomainResult<Submission> {
        Self::validate_new(&input)?;

        Ok(Submission {
            id: SubmissionId::new(),
            submission_type: input.submission_type,
            customer: input.customer,
            packages: Self::materialize(input.packages),
            document_status: DocumentStatus::Pengajuan,
            bc_document_number: None,
            rejection_reason: None,
            rejection_date: None,
            customs_status: CustomsStatus::Draft,
            created_at: now,
            updated_at: now,
            version: 1,
        })
    }

    fn materialize(packages: Vec<NewPackage>) -> Vec<Package> {
        packages
            .into_iter()
            .map(|p| Package {
                id: PackageId::new(),
                package_number: p.package_number,
                items: p
                    .items
                    .into_iter()
                    .map(|i| Item {
                        id: ItemId::new(),
                        name: i.name,
                        serial_number: i.serial_number,
                        quantity: i.quantity,
                        unit: i.unit,
                        condition: i.condition,
                        value: i.value,
                    })
                    .collect(),
            })
            .collect()
    }

    /// Merges a patch into a submission and resolves the transition.
    ///
    /// Approval needs a BC document number and rejection needs a reason and
    /// a date, taken from the patch or from what is already stored. Plain
    /// fields still apply when the transition is a no-op.
    ///
    /// # Errors
    ///
    /// - `StateConflict` for an illegal transition or a package edit after a decision.
    /// - `Validation` for a missing approval/rejection precondition or invalid packages.
    pub fn apply_patch(
        current: &Submission,
        patch: SubmissionPatch,
        now: DateTime<Utc>,
    ) -> DomainResult<PatchPlan> {
        let target = patch.document_status.unwrap_or(current.document_status);
        let transition =
            SubmissionStateMachine::transition(current.id, current.document_status, target)?;

        let mut merged = current.clone();

        if let Some(packages) = patch.packages {
            SubmissionStateMachine::ensure_editable(current.id, current.document_status)?;
            Self::validate_packages(&packages)?;
            merged.packages = Self::materialize(packages);
        }
        if let Some(customer) = patch.customer {
            if customer.trim().is_empty() {
                return Err(DomainError::validation(
                    "submission",
                    "customer cannot be empty",
                ));
            }
            merged.customer = customer;
        }
        if patch.bc_document_number.is_some() {
            merged.bc_document_number = patch.bc_document_number;
        }
        if patch.rejection_reason.is_some() {
            merged.rejection_reason = patch.rejection_reason;
        }
        if patch.rejection_date.is_some() {
            merged.rejection_date = patch.rejection_date;
        }

        match transition {
            Transition::Approve => {
                if is_blank(merged.bc_document_number.as_deref()) {
                    return Err(DomainError::validation(
                        "submission",
                        "bc document number is required for approval",
                    ));
                }
            }
            Transition::Reject => {
                if is_blank(merged.rejection_reason.as_deref()) {
                    return Err(DomainError::validation(
                        "submission",
                        "rejection reason is required",
                    ));
                }
                if merged.rejection_date.is_none() {
                    return Err(DomainError::validation(
                        "submission",
                        "rejection date is required",
                    ));
                }
            }
            Transition::NoOp => {
                debug!(
                    submission_id = %current.id,
                    status = %target,
                    "status unchanged, no side effects"
                );
            }
        }

        merged.document_status = target;
        merged.updated_at = now;
        merged.version = current.version + 1;

        Ok(PatchPlan {
            submission: merged,
            transition,
        })
    }

    /// Builds the inventory records and transaction log for an approval.
    ///
    /// Every item of every package becomes one record with a single opening
    /// `in` movement into the warehouse.
    ///
    /// # Errors
    ///
    /// `Validation` if an item cannot open a record.
    pub fn approval_effects(
        submission: &Submission,
        config: &CustomsConfig,
        now: DateTime<Utc>,
    ) -> DomainResult<ApprovalEffects> {
        let bc_number = submission.bc_document_number.clone();
        let inventory = submission
            .items()
            .map(|(package, item)| {
                let seed = RecordSeed {
                    submission_id: Some(submission.id),
                    item_name: item.name.clone(),
                    serial_number: item.serial_number.clone(),
                    unit: item.unit.clone(),
                };
                let opening = NewMovement {
                    date: now.date_naive(),
                    time: now.time(),
                    quantity: item.quantity,
                    movement_type: MovementType::In,
                    origin: submission.customer.clone(),
                    destination: WAREHOUSE.to_string(),
                    condition: item.condition.clone(),
                    pic: String::new(),
                    notes: Some(format!(
                        "package {} / {}",
                        package.package_number,
                        bc_number.as_deref().unwrap_or_default()
                    )),
                };
                StockLedger::open_record(seed, opening, now)
            })
            .collect::<DomainResult<Vec<_>>>()?;

        let kind = match submission.submission_type {
            SubmissionType::Inbound => TransactionLogKind::Inbound,
            SubmissionType::Outbound => TransactionLogKind::Outbound,
        };
        let transaction_log = Self::transaction_log(
            submission,
            kind,
            now.date_naive(),
            config,
            bc_number,
            None,
        );

        Ok(ApprovalEffects {
            inventory,
            transaction_log,
        })
    }

    /// Builds the reject transaction log.
    #[must_use]
    pub fn rejection_effects(
        submission: &Submission,
        config: &CustomsConfig,
        now: DateTime<Utc>,
    ) -> TransactionLog {
        let date = submission.rejection_date.unwrap_or_else(|| now.date_naive());
        Self::transaction_log(
            submission,
            TransactionLogKind::Reject,
            date,
            config,
            None,
            submission.rejection_reason.clone(),
        )
    }

    fn transaction_log(
        submission: &Submission,
        kind: TransactionLogKind,
        date: NaiveDate,
        config: &CustomsConfig,
        bc_document_number: Option<String>,
        notes: Option<String>,
    ) -> TransactionLog {
        TransactionLog {
            id: TransactionLogId::new(),
            kind,
            submission_id: submission.id,
            date,
            quantity: submission.total_quantity(),
            value: Money::new(submission.total_value(), config.currency),
            status: submission.document_status,
            bc_document_number,
            notes,
        }
    }

    /// BC document type and number prefix for a submission type.
    #[must_use]
    pub fn doc_type_for(submission_type: SubmissionType, config: &CustomsConfig) -> (&str, &str) {
        match submission_type {
            SubmissionType::Inbound => (&config.inbound_doc_type, &config.inbound_prefix),
            SubmissionType::Outbound => (&config.outbound_doc_type, &config.outbound_prefix),
        }
    }

    /// Formats a document number, e.g. `BC23-001`.
    #[must_use]
    pub fn document_number(prefix: &str, sequence: u32) -> String {
        format!("{prefix}-{sequence:03}")
    }

    /// Builds the confirmed BC document for a submission.
    #[must_use]
    pub fn customs_document(
        submission: &Submission,
        config: &CustomsConfig,
        sequence: u32,
        date: NaiveDate,
    ) -> CustomsDocument {
        let (doc_type, prefix) = Self::doc_type_for(submission.submission_type, config);
        CustomsDocument {
            id: CustomsDocumentId::new(),
            doc_type: doc_type.to_string(),
            number: Self::document_number(prefix, sequence),
            date,
            submission_id: Some(submission.id),
            reference: None,
            status: CustomsDocumentStatus::Confirmed,
        }
    }

    /// Marks a submission confirmed. Returns the updated copy.
    #[must_use]
    pub fn confirmed(current: &Submission, now: DateTime<Utc>) -> Submission {
        let mut submission = current.clone();
        submission.customs_status = CustomsStatus::Confirmed;
        submission.updated_at = now;
        submission.version = current.version + 1;
        submission
    }
}

fn is_blank(value: Option<&str>) -> bool {
    value.is_none_or(|v| v.trim().is_empty())
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

//! Posting rules: transactions into journal entries and stock deltas.
//!
//! A plan holds every record one posting writes. The caller assigns journal
//! sequences and commits the plan as one unit.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use tppb_shared::config::{CustomsConfig, PostingConfig};
use tppb_shared::types::{CustomsDocumentId, JournalEntryId};
use uuid::Uuid;

use super::types::{InboundTransaction, OperationalCosts, OutboundTransaction};
use crate::customs::{CustomsDocument, CustomsDocumentStatus, SubmissionService, SubmissionType};
use crate::error::{DomainError, DomainResult};
use crate::inventory::{
    InventoryRecord, MovementType, MutationLog, NewMovement, RecordSeed, StockLedger,
};
use crate::ledger::{Account, EntryKind, JournalEntry};

/// Master accounts a posting writes to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingAccounts {
    /// Goods purchase expense.
    pub goods_expense: Account,
    /// Operational cost expense.
    pub operational_expense: Account,
    /// Sales revenue.
    pub sales_revenue: Account,
}

impl PostingAccounts {
    /// Resolves the configured account codes against the chart.
    ///
    /// # Errors
    ///
    /// `OrphanReference` naming the first code missing from `master`.
    pub fn resolve(master: &[Account], config: &PostingConfig) -> DomainResult<Self> {
        let find = |rule: &str, code: &str| {
            master
                .iter()
                .find(|a| a.code == code)
                .cloned()
                .ok_or_else(|| DomainError::OrphanReference {
                    reference: format!("posting.{rule}"),
                    account: code.to_string(),
                })
        };

        Ok(Self {
            goods_expense: find("goods_expense_code", &config.goods_expense_code)?,
            operational_expense: find(
                "operational_expense_code",
                &config.operational_expense_code,
            )?,
            sales_revenue: find("sales_revenue_code", &config.sales_revenue_code)?,
        })
    }
}

/// Everything one posting writes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostingPlan {
    /// Id linking the entries to the posting.
    pub source_id: Uuid,
    /// Journal entries, `sequence` still unassigned.
    pub entries: Vec<JournalEntry>,
    /// Inventory record after the delta.
    pub record: InventoryRecord,
    /// True when the record did not exist before.
    pub record_created: bool,
    /// Audit mirror of the delta movement.
    pub mutation: MutationLog,
    /// Draft BC document mirroring the posting.
    pub document: CustomsDocument,
}

/// Stateless posting service.
pub struct PostingService;

impl PostingService {
    /// First record, in insertion order, with the given name and serial.
    #[must_use]
    pub fn find_matching<'a>(
        records: &'a [InventoryRecord],
        item_name: &str,
        serial_number: &str,
    ) -> Option<&'a InventoryRecord> {
        records
            .iter()
            .find(|r| r.item_name == item_name && r.serial_number == serial_number)
    }

    /// Plans an inbound posting.
    ///
    /// Creates a goods expense entry, an operational expense entry when the
    /// costs are positive, and adds the quantity to `existing` (or a new
    /// record when none matches).
    ///
    /// # Errors
    ///
    /// `Validation` for a non-positive quantity or a negative amount.
    pub fn plan_inbound(
        tx: &InboundTransaction,
        accounts: &PostingAccounts,
        existing: Option<&InventoryRecord>,
        customs: &CustomsConfig,
        document_sequence: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<PostingPlan> {
        Self::validate(&tx.item_name, tx.quantity, tx.goods_value, &tx.operational_costs)?;
        let source_id = Uuid::now_v7();

        let mut entries = vec![Self::entry(
            source_id,
            EntryKind::Expense,
            "pembelian barang",
            tx.goods_value,
            &accounts.goods_expense,
            tx,
        )];
        if let Some(costs) = Self::operational_entry(
            source_id,
            &tx.operational_costs,
            &accounts.operational_expense,
            tx,
        ) {
            entries.push(costs);
        }

        let movement = NewMovement {
            date: tx.date,
            time: Self::occurrence_time(tx.date, now),
            quantity: tx.quantity,
            movement_type: MovementType::In,
            origin: tx.origin.clone(),
            destination: tx.destination.clone(),
            condition: String::new(),
            pic: tx.pic.clone(),
            notes: Some(posting_note(&tx.reference)),
        };
        let ((record, mutation), record_created) = match existing {
            Some(record) => (StockLedger::apply_movement(record, movement, now)?, false),
            None => {
                let seed = RecordSeed {
                    submission_id: None,
                    item_name: tx.item_name.clone(),
                    serial_number: tx.serial_number.clone(),
                    unit: tx.unit.clone(),
                };
                (StockLedger::open_record(seed, movement, now)?, true)
            }
        };

        Ok(PostingPlan {
            source_id,
            entries,
            record,
            record_created,
            mutation,
            document: Self::stub_document(
                SubmissionType::Inbound,
                customs,
                document_sequence,
                tx.date,
                &tx.reference,
            ),
        })
    }

    /// Plans an outbound posting.
    ///
    /// # Errors
    ///
    /// - `Validation` for a non-positive quantity or a negative amount.
    /// - `InsufficientStock` when no record matches or its stock is below
    ///   the quantity.
    pub fn plan_outbound(
        tx: &OutboundTransaction,
        accounts: &PostingAccounts,
        existing: Option<&InventoryRecord>,
        customs: &CustomsConfig,
        document_sequence: u32,
        now: DateTime<Utc>,
    ) -> DomainResult<PostingPlan> {
        Self::validate(&tx.item_name, tx.quantity, tx.sale_value, &tx.operational_costs)?;

        let Some(record) = existing else {
            return Err(DomainError::InsufficientStock {
                item: tx.item_name.clone(),
                requested: tx.quantity,
                available: Decimal::ZERO,
            });
        };
        if record.current_stock < tx.quantity {
            return Err(DomainError::InsufficientStock {
                item: record.id.to_string(),
                requested: tx.quantity,
                available: record.current_stock,
            });
        }

        let source_id = Uuid::now_v7();
        let mut entries = vec![Self::entry(
            source_id,
            EntryKind::Income,
            "penjualan",
            tx.sale_value,
            &accounts.sales_revenue,
            tx,
        )];
        if let Some(costs) = Self::operational_entry(
            source_id,
            &tx.operational_costs,
            &accounts.operational_expense,
            tx,
        ) {
            entries.push(costs);
        }

        let movement = NewMovement {
            date: tx.date,
            time: Self::occurrence_time(tx.date, now),
            quantity: tx.quantity,
            movement_type: MovementType::Out,
            origin: record.location.clone(),
            destination: tx.destination.clone(),
            condition: String::new(),
            pic: tx.pic.clone(),
            notes: Some(posting_note(&tx.reference)),
        };
        let (record, mutation) = StockLedger::apply_movement(record, movement, now)?;

        Ok(PostingPlan {
            source_id,
            entries,
            record,
            record_created: false,
            mutation,
            document: Self::stub_document(
                SubmissionType::Outbound,
                customs,
                document_sequence,
                tx.date,
                &tx.reference,
            ),
        })
    }

    /// Time stamped on a posting's movement: the wall clock when the
    /// posting is dated today, start of day otherwise.
    #[must_use]
    pub fn occurrence_time(date: NaiveDate, now: DateTime<Utc>) -> NaiveTime {
        if date == now.date_naive() {
            now.time()
        } else {
            NaiveTime::MIN
        }
    }

    fn validate(
        item_name: &str,
        quantity: Decimal,
        value: Decimal,
        costs: &OperationalCosts,
    ) -> DomainResult<()> {
        if item_name.trim().is_empty() {
            return Err(DomainError::validation("posting", "item name cannot be empty"));
        }
        if quantity <= Decimal::ZERO {
            return Err(DomainError::validation(
                "posting",
                format!("quantity must be positive, got {quantity}"),
            ));
        }
        if value < Decimal::ZERO {
            return Err(DomainError::validation(
                "posting",
                format!("value cannot be negative, got {value}"),
            ));
        }
        if let Some((name, amount)) = costs
            .components
            .iter()
            .find(|(_, v)| **v < Decimal::ZERO)
        {
            return Err(DomainError::validation(
                "posting",
                format!("operational cost {name} cannot be negative, got {amount}"),
            ));
        }
        Ok(())
    }

    fn operational_entry(
        source_id: Uuid,
        costs: &OperationalCosts,
        account: &Account,
        tx: &impl Described,
    ) -> Option<JournalEntry> {
        let total = costs.total();
        (total > Decimal::ZERO).then(|| {
            Self::entry(
                source_id,
                EntryKind::Expense,
                "biaya operasional",
                total,
                account,
                tx,
            )
        })
    }

    fn entry(
        source_id: Uuid,
        kind: EntryKind,
        category: &str,
        amount: Decimal,
        account: &Account,
        tx: &impl Described,
    ) -> JournalEntry {
        let (debit, credit) = match kind {
            EntryKind::Expense => (amount, Decimal::ZERO),
            EntryKind::Income => (Decimal::ZERO, amount),
        };
        JournalEntry {
            id: JournalEntryId::new(),
            sequence: 0,
            kind,
            category: category.to_string(),
            amount,
            date: tx.date(),
            coa_id: Some(account.id),
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            debit,
            credit,
            description: tx.description(),
            source_id: Some(source_id),
        }
    }

    fn stub_document(
        direction: SubmissionType,
        customs: &CustomsConfig,
        sequence: u32,
        date: NaiveDate,
        reference: &str,
    ) -> CustomsDocument {
        let (doc_type, prefix) = SubmissionService::doc_type_for(direction, customs);
        CustomsDocument {
            id: CustomsDocumentId::new(),
            doc_type: doc_type.to_string(),
            number: SubmissionService::document_number(prefix, sequence),
            date,
            submission_id: None,
            reference: (!reference.is_empty()).then(|| reference.to_string()),
            status: CustomsDocumentStatus::Draft,
        }
    }
}

fn posting_note(reference: &str) -> String {
    if reference.is_empty() {
        "posting".to_string()
    } else {
        format!("posting {reference}")
    }
}

/// Date and description shared by both transaction kinds.
trait Described {
    fn date(&self) -> NaiveDate;
    fn description(&self) -> String;
}

impl Described for InboundTransaction {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn description(&self) -> String {
        if self.description.is_empty() {
            format!("Pembelian {} x {}", self.quantity, self.item_name)
        } else {
            self.description.clone()
        }
    }
}

impl Described for OutboundTransaction {
    fn date(&self) -> NaiveDate {
        self.date
    }

    fn description(&self) -> String {
        if self.description.is_empty() {
            format!("Penjualan {} x {}", self.quantity, self.item_name)
        } else {
            self.description.clone()
        }
    }
}

#[cfg(test)]
#[path = "service_tests.rs"]
mod tests;

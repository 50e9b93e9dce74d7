//! Customs submission domain types.
//!
//! A submission (pengajuan) asks customs to let goods into or out of the
//! bonded area. Its document status moves from `pengajuan` to exactly one of
//! `approved` or `rejected`.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tppb_shared::types::{
    CustomsDocumentId, ItemId, Money, PackageId, SubmissionId, TransactionLogId,
};

/// Direction of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    /// Goods entering the bonded area.
    Inbound,
    /// Goods leaving the bonded area.
    Outbound,
}

impl SubmissionType {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Inbound => "inbound",
            Self::Outbound => "outbound",
        }
    }
}

impl fmt::Display for SubmissionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Document approval status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DocumentStatus {
    /// Submitted, awaiting a customs decision.
    Pengajuan,
    /// Approved by customs (terminal).
    Approved,
    /// Rejected by customs (terminal).
    Rejected,
}

impl DocumentStatus {
    /// Returns the string representation.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pengajuan => "pengajuan",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }

    /// Returns true once customs has decided.
    #[must_use]
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }
}

impl fmt::Display for DocumentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Whether the BC document for a submission has been generated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomsStatus {
    /// No BC document yet.
    #[default]
    Draft,
    /// BC document generated.
    Confirmed,
}

/// One line of goods inside a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    /// Item id.
    pub id: ItemId,
    /// Item name.
    pub name: String,
    /// Serial number, empty when not serialised.
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of measure.
    #[serde(default)]
    pub unit: String,
    /// Condition of the goods.
    #[serde(default)]
    pub condition: String,
    /// Declared value of the line.
    #[serde(default)]
    pub value: Decimal,
}

/// A package grouping items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Package {
    /// Package id.
    pub id: PackageId,
    /// Package number printed on the goods.
    #[serde(alias = "packageNumber")]
    pub package_number: String,
    /// Items.
    #[serde(default)]
    pub items: Vec<Item>,
}

/// A customs submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Submission {
    /// Submission id.
    pub id: SubmissionId,
    /// Inbound or outbound.
    #[serde(rename = "type", alias = "submission_type")]
    pub submission_type: SubmissionType,
    /// Customer name.
    pub customer: String,
    /// Packages.
    #[serde(default)]
    pub packages: Vec<Package>,
    /// Approval status.
    #[serde(alias = "documentStatus")]
    pub document_status: DocumentStatus,
    /// BC document number assigned by customs on approval.
    #[serde(default, alias = "bcDocumentNumber")]
    pub bc_document_number: Option<String>,
    /// Reason given on rejection.
    #[serde(default, alias = "rejectionReason")]
    pub rejection_reason: Option<String>,
    /// Date of rejection.
    #[serde(default, alias = "rejectionDate")]
    pub rejection_date: Option<NaiveDate>,
    /// Whether the BC document has been generated.
    #[serde(default, alias = "customsStatus")]
    pub customs_status: CustomsStatus,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Incremented on every persisted change.
    #[serde(default)]
    pub version: u64,
}

impl Submission {
    /// Iterates over every item in every package.
    pub fn items(&self) -> impl Iterator<Item = (&Package, &Item)> {
        self.packages
            .iter()
            .flat_map(|p| p.items.iter().map(move |i| (p, i)))
    }

    /// Sum of item quantities.
    #[must_use]
    pub fn total_quantity(&self) -> Decimal {
        self.items().map(|(_, i)| i.quantity).sum()
    }

    /// Sum of item values.
    #[must_use]
    pub fn total_value(&self) -> Decimal {
        self.items().map(|(_, i)| i.value).sum()
    }
}

/// Item input for a new submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewItem {
    /// Item name.
    pub name: String,
    /// Serial number.
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Quantity.
    pub quantity: Decimal,
    /// Unit of measure.
    #[serde(default)]
    pub unit: String,
    /// Condition.
    #[serde(default)]
    pub condition: String,
    /// Declared value.
    #[serde(default)]
    pub value: Decimal,
}

/// Package input for a new submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPackage {
    /// Package number.
    #[serde(alias = "packageNumber")]
    pub package_number: String,
    /// Items.
    #[serde(default)]
    pub items: Vec<NewItem>,
}

/// Input for creating a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubmission {
    /// Inbound or outbound.
    #[serde(rename = "type", alias = "submission_type")]
    pub submission_type: SubmissionType,
    /// Customer name.
    pub customer: String,
    /// Packages.
    #[serde(default)]
    pub packages: Vec<NewPackage>,
}

/// Partial update of a submission. `None` leaves a field unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubmissionPatch {
    /// New customer name.
    #[serde(default)]
    pub customer: Option<String>,
    /// Replacement packages (only while the status is `pengajuan`).
    #[serde(default)]
    pub packages: Option<Vec<NewPackage>>,
    /// Target document status.
    #[serde(default, alias = "documentStatus")]
    pub document_status: Option<DocumentStatus>,
    /// BC document number.
    #[serde(default, alias = "bcDocumentNumber")]
    pub bc_document_number: Option<String>,
    /// Rejection reason.
    #[serde(default, alias = "rejectionReason")]
    pub rejection_reason: Option<String>,
    /// Rejection date.
    #[serde(default, alias = "rejectionDate")]
    pub rejection_date: Option<NaiveDate>,
}

/// Status of a BC document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CustomsDocumentStatus {
    /// Generated by confirming a submission.
    Confirmed,
    /// Stub mirroring a financial posting.
    Draft,
}

/// A BC customs declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomsDocument {
    /// Document id.
    pub id: CustomsDocumentId,
    /// Document type code, e.g. "BC 2.3".
    #[serde(rename = "type", alias = "doc_type")]
    pub doc_type: String,
    /// Document number, e.g. "BC23-001".
    pub number: String,
    /// Document date.
    pub date: NaiveDate,
    /// Linked submission.
    #[serde(default, alias = "submissionId")]
    pub submission_id: Option<SubmissionId>,
    /// Free-form reference (posting reference for stubs).
    #[serde(default)]
    pub reference: Option<String>,
    /// Document status.
    pub status: CustomsDocumentStatus,
}

/// Kind of transaction log written on a customs decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionLogKind {
    /// Approved inbound submission.
    Inbound,
    /// Approved outbound submission.
    Outbound,
    /// Rejected submission.
    Reject,
}

/// Log of one customs decision. Exactly one per approved or rejected submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionLog {
    /// Log id.
    pub id: TransactionLogId,
    /// Inbound, outbound or reject.
    pub kind: TransactionLogKind,
    /// The decided submission.
    #[serde(alias = "submissionId")]
    pub submission_id: SubmissionId,
    /// Decision date.
    pub date: NaiveDate,
    /// Total quantity of the submission.
    pub quantity: Decimal,
    /// Total declared value.
    pub value: Money,
    /// Resulting document status.
    pub status: DocumentStatus,
    /// BC document number for approvals.
    #[serde(default, alias = "bcDocumentNumber")]
    pub bc_document_number: Option<String>,
    /// Rejection reason for rejections.
    #[serde(default)]
    pub notes: Option<String>,
}

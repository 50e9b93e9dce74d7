//! Chart-of-accounts and journal entry types.
//!
//! Field names are snake_case internally. The camelCase spellings accepted
//! through `alias` exist only so documents written by older clients decode at
//! the store boundary.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tppb_shared::types::{AccountId, JournalEntryId};
use uuid::Uuid;

/// Account classification in the chart of accounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AccountType {
    /// Asset account (debit-normal).
    #[serde(alias = "asset")]
    Asset,
    /// Liability account (credit-normal).
    #[serde(alias = "liability")]
    Liability,
    /// Equity account (credit-normal).
    #[serde(alias = "equity")]
    Equity,
    /// Revenue account (credit-normal).
    #[serde(alias = "revenue")]
    Revenue,
    /// Expense account (debit-normal).
    #[serde(alias = "expense")]
    Expense,
}

impl AccountType {
    /// Returns the upper-case name used in documents.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Asset => "ASSET",
            Self::Liability => "LIABILITY",
            Self::Equity => "EQUITY",
            Self::Revenue => "REVENUE",
            Self::Expense => "EXPENSE",
        }
    }

    /// Parses an account type, case-insensitive.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "asset" => Some(Self::Asset),
            "liability" => Some(Self::Liability),
            "equity" => Some(Self::Equity),
            "revenue" => Some(Self::Revenue),
            "expense" => Some(Self::Expense),
            _ => None,
        }
    }

    /// Returns the side on which this account type carries its balance.
    #[must_use]
    pub fn normal_balance(&self) -> NormalBalance {
        match self {
            Self::Asset | Self::Expense => NormalBalance::Debit,
            Self::Liability | Self::Equity | Self::Revenue => NormalBalance::Credit,
        }
    }
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Balance direction for an account type.
///
/// - Asset/Expense: balance += debit - credit (debit-normal)
/// - Liability/Equity/Revenue: balance += credit - debit (credit-normal)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NormalBalance {
    /// Debits increase the balance.
    Debit,
    /// Credits increase the balance.
    Credit,
}

impl NormalBalance {
    /// Calculates the balance change for one entry.
    #[must_use]
    pub fn balance_change(self, debit: Decimal, credit: Decimal) -> Decimal {
        match self {
            Self::Debit => debit - credit,
            Self::Credit => credit - debit,
        }
    }
}

/// A master chart-of-accounts record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Account {
    /// Account id.
    pub id: AccountId,
    /// Account code, unique within the chart.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    #[serde(rename = "type", alias = "account_type", alias = "accountType")]
    pub account_type: AccountType,
}

/// Input for adding an account to the chart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewAccount {
    /// Account code.
    pub code: String,
    /// Account name.
    pub name: String,
    /// Account classification.
    #[serde(rename = "type", alias = "account_type", alias = "accountType")]
    pub account_type: AccountType,
}

/// Whether a finance transaction is income or expense.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Money earned (credited to a revenue account).
    Income,
    /// Money spent (debited to an expense account).
    Expense,
}

/// A finance transaction / journal entry row.
///
/// `account_code` and `account_name` are cached copies of the master account
/// referenced by `coa_id`; the reconciler repairs them when they drift.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalEntry {
    /// Entry id.
    pub id: JournalEntryId,
    /// Global write-order sequence, the tie-break for same-date entries.
    #[serde(default)]
    pub sequence: u64,
    /// Income or expense.
    #[serde(rename = "type", alias = "kind")]
    pub kind: EntryKind,
    /// Free-form category ("pembelian", "penjualan", "operasional").
    #[serde(default)]
    pub category: String,
    /// Gross amount.
    pub amount: Decimal,
    /// Booking date.
    pub date: NaiveDate,
    /// Referenced master account.
    #[serde(default, alias = "coaId")]
    pub coa_id: Option<AccountId>,
    /// Cached account code.
    #[serde(default, alias = "accountCode")]
    pub account_code: String,
    /// Cached account name.
    #[serde(default, alias = "accountName")]
    pub account_name: String,
    /// Debit amount.
    #[serde(default)]
    pub debit: Decimal,
    /// Credit amount.
    #[serde(default)]
    pub credit: Decimal,
    /// Description.
    #[serde(default)]
    pub description: String,
    /// Id of the posting (transaction reference) that produced this entry.
    #[serde(default, alias = "sourceId")]
    pub source_id: Option<Uuid>,
}

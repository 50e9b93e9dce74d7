//! General ledger logic.
//!
//! This module implements:
//! - Chart-of-accounts and journal entry types
//! - Running balance and trial balance calculations
//! - Chart-of-accounts reconciliation

pub mod balance;
pub mod reconcile;
pub mod types;

#[cfg(test)]
mod ledger_props;

pub use balance::{
    AccountBalance, BalanceLine, chronological, running_balance, sort_chronologically,
    trial_balance,
};
pub use reconcile::{
    Discrepancy, DriftField, Orphan, ReconcileMode, ReconcileReport, reconcile,
};
pub use types::{Account, AccountType, EntryKind, JournalEntry, NewAccount, NormalBalance};

//! Chart-of-accounts reconciliation.
//!
//! Journal entries cache the code and name of the account they reference.
//! The reconciler compares those caches with the master chart, reports
//! orphans and drift, and in repair mode copies the master values back.
//! Entries are never removed or reordered.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use tppb_shared::types::{AccountId, JournalEntryId};

use super::types::{Account, JournalEntry};
use crate::error::DomainError;

/// Whether a pass only reports or also repairs drifted caches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ReconcileMode {
    /// Report findings, leave entries untouched.
    Report,
    /// Overwrite drifted code/name from the master record.
    Repair,
}

/// Which cached field drifted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriftField {
    /// `account_code` differs from the master code.
    AccountCode,
    /// `account_name` differs from the master name.
    AccountName,
}

/// One cached value that differs from the master account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discrepancy {
    /// The drifted entry.
    pub entry_id: JournalEntryId,
    /// The referenced account.
    pub coa_id: AccountId,
    /// The drifted field.
    pub field: DriftField,
    /// Master value.
    pub expected: String,
    /// Cached value found on the entry.
    pub found: String,
}

/// An entry whose account reference cannot be resolved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orphan {
    /// The orphaned entry.
    pub entry_id: JournalEntryId,
    /// The unresolved reference, `None` when the entry has no `coa_id`.
    pub coa_id: Option<AccountId>,
}

impl Orphan {
    /// Converts the finding into the typed error the taxonomy uses.
    #[must_use]
    pub fn to_error(&self) -> DomainError {
        DomainError::OrphanReference {
            reference: self.entry_id.to_string(),
            account: self
                .coa_id
                .map_or_else(|| "<none>".to_string(), |id| id.to_string()),
        }
    }
}

/// Outcome of a reconciliation pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ReconcileReport {
    /// Number of entries examined.
    pub checked: usize,
    /// Entries with a missing or unknown account reference.
    pub orphans: Vec<Orphan>,
    /// Drifted cached fields.
    pub discrepancies: Vec<Discrepancy>,
    /// Ids of entries rewritten in repair mode.
    pub repaired: Vec<JournalEntryId>,
}

impl ReconcileReport {
    /// True when there is nothing to report.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.orphans.is_empty() && self.discrepancies.is_empty()
    }

    /// Orphan findings as typed errors.
    #[must_use]
    pub fn orphan_errors(&self) -> Vec<DomainError> {
        self.orphans.iter().map(Orphan::to_error).collect()
    }
}

/// Reconciles `entries` against `master` in place.
///
/// In [`ReconcileMode::Report`] the entries are not modified. In
/// [`ReconcileMode::Repair`] drifted entries get the master code and name, so
/// an immediate second pass reports no discrepancies.
pub fn reconcile(
    master: &[Account],
    entries: &mut [JournalEntry],
    mode: ReconcileMode,
) -> ReconcileReport {
    let index: HashMap<AccountId, &Account> = master.iter().map(|a| (a.id, a)).collect();
    let mut report = ReconcileReport {
        checked: entries.len(),
        ..ReconcileReport::default()
    };

    for entry in entries.iter_mut() {
        let Some(coa_id) = entry.coa_id else {
            report.orphans.push(Orphan {
                entry_id: entry.id,
                coa_id: None,
            });
            continue;
        };
        let Some(account) = index.get(&coa_id) else {
            report.orphans.push(Orphan {
                entry_id: entry.id,
                coa_id: Some(coa_id),
            });
            continue;
        };

        let mut drifted = false;
        if entry.account_code != account.code {
            report.discrepancies.push(Discrepancy {
                entry_id: entry.id,
                coa_id,
                field: DriftField::AccountCode,
                expected: account.code.clone(),
                found: entry.account_code.clone(),
            });
            drifted = true;
        }
        if entry.account_name != account.name {
            report.discrepancies.push(Discrepancy {
                entry_id: entry.id,
                coa_id,
                field: DriftField::AccountName,
                expected: account.name.clone(),
                found: entry.account_name.clone(),
            });
            drifted = true;
        }

        if drifted && mode == ReconcileMode::Repair {
            entry.account_code.clone_from(&account.code);
            entry.account_name.clone_from(&account.name);
            report.repaired.push(entry.id);
        }
    }

    report
}

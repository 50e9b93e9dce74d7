//! Ledger repository: chart of accounts, running balances and reconciliation.
//!
//! Balance and reconciliation passes read accounts and journal entries from
//! one snapshot.

use tppb_core::ledger::{
    Account, AccountBalance, BalanceLine, JournalEntry, NewAccount, ReconcileMode,
    ReconcileReport, reconcile, running_balance, sort_chronologically, trial_balance,
};
use tppb_core::{DomainError, DomainResult};
use tppb_shared::types::AccountId;
use tracing::{info, warn};

use super::{all, load};
use crate::database::Database;
use crate::locks::LockKey;
use crate::record::decode_all;
use crate::store::{Collection, Filter, Store};
use crate::unit_of_work::UnitOfWork;

/// Ledger repository.
#[derive(Debug)]
pub struct LedgerRepository<S> {
    db: Database<S>,
}

impl<S: Store> LedgerRepository<S> {
    /// Creates a new ledger repository.
    #[must_use]
    pub const fn new(db: Database<S>) -> Self {
        Self { db }
    }

    /// Adds an account to the chart.
    ///
    /// # Errors
    ///
    /// - `Validation` for a blank code or name.
    /// - `StateConflict` when the code is already taken.
    pub async fn create_account(&self, input: NewAccount) -> DomainResult<Account> {
        let code = input.code.trim().to_string();
        let name = input.name.trim().to_string();
        if code.is_empty() {
            return Err(DomainError::validation("account", "code cannot be empty"));
        }
        if name.is_empty() {
            return Err(DomainError::validation("account", "name cannot be empty"));
        }

        let _locks = self.db.locks().acquire([LockKey::Accounts]).await;
        let taken = self
            .db
            .store()
            .select_all(
                Collection::Accounts,
                Some(&Filter::new().where_eq("code", code.as_str())),
            )
            .await?;
        if !taken.is_empty() {
            return Err(DomainError::conflict("account", &code, "code already exists"));
        }

        let account = Account {
            id: AccountId::new(),
            code,
            name,
            account_type: input.account_type,
        };
        let mut uow = UnitOfWork::new();
        uow.insert(&account)?;
        uow.commit(self.db.store()).await?;

        info!(
            account_id = %account.id,
            code = %account.code,
            account_type = %account.account_type,
            "account created"
        );
        Ok(account)
    }

    /// Loads an account.
    ///
    /// # Errors
    ///
    /// `StateConflict` (not found) when the id is unknown.
    pub async fn get_account(&self, id: AccountId) -> DomainResult<Account> {
        load(self.db.store(), "account", &id.to_string()).await
    }

    /// The chart of accounts in insertion order.
    pub async fn list_accounts(&self) -> DomainResult<Vec<Account>> {
        all(self.db.store()).await
    }

    /// Journal entries in chronological order.
    pub async fn journal_entries(&self) -> DomainResult<Vec<JournalEntry>> {
        let mut entries: Vec<JournalEntry> = all(self.db.store()).await?;
        sort_chronologically(&mut entries);
        Ok(entries)
    }

    /// Running balance of one account.
    ///
    /// # Errors
    ///
    /// `StateConflict` (not found) when the account is unknown.
    pub async fn running_balance(&self, account_id: AccountId) -> DomainResult<Vec<BalanceLine>> {
        let (accounts, entries) = self.read_ledger().await?;
        let account = accounts
            .iter()
            .find(|a| a.id == account_id)
            .ok_or_else(|| DomainError::not_found("account", account_id))?;
        Ok(running_balance(account, &entries))
    }

    /// Debit total, credit total and normal-side balance of every account.
    pub async fn trial_balance(&self) -> DomainResult<Vec<AccountBalance>> {
        let (accounts, entries) = self.read_ledger().await?;
        Ok(trial_balance(&accounts, &entries))
    }

    /// Checks cached account code/name on every entry against the chart.
    ///
    /// In repair mode the rewritten entries are committed in one batch.
    pub async fn reconcile_coa(&self, mode: ReconcileMode) -> DomainResult<ReconcileReport> {
        let _locks = match mode {
            ReconcileMode::Repair => Some(
                self.db
                    .locks()
                    .acquire([LockKey::Accounts, LockKey::Journal])
                    .await,
            ),
            ReconcileMode::Report => None,
        };

        let (accounts, mut entries) = self.read_ledger().await?;
        let report = reconcile(&accounts, &mut entries, mode);

        if !report.repaired.is_empty() {
            let mut uow = UnitOfWork::new();
            for entry in entries.iter().filter(|e| report.repaired.contains(&e.id)) {
                uow.update(entry)?;
            }
            uow.commit(self.db.store()).await?;
        }

        if report.is_clean() {
            info!(checked = report.checked, ?mode, "chart of accounts reconciled");
        } else {
            warn!(
                checked = report.checked,
                orphans = report.orphans.len(),
                discrepancies = report.discrepancies.len(),
                repaired = report.repaired.len(),
                ?mode,
                "chart of accounts findings"
            );
        }
        Ok(report)
    }

    async fn read_ledger(&self) -> DomainResult<(Vec<Account>, Vec<JournalEntry>)> {
        let snapshot = self
            .db
            .store()
            .snapshot(&[Collection::Accounts, Collection::JournalEntries])
            .await?;
        let accounts = decode_all(snapshot.get(Collection::Accounts).to_vec())?;
        let entries = decode_all(snapshot.get(Collection::JournalEntries).to_vec())?;
        Ok((accounts, entries))
    }
}

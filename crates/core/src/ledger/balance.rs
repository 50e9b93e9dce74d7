//! Account balance calculations.
//!
//! The running balance is a fold over an account's entries in chronological
//! order. Ordering is fixed here, not by the caller: entries are sorted by
//! date, then by write `sequence`, then by id, so two entries booked on the
//! same day always fold in the order they were written.

use std::cmp::Ordering;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tppb_shared::types::AccountId;

use super::types::{Account, AccountType, JournalEntry};

/// Chronological ordering of journal entries: date, sequence, id.
#[must_use]
pub fn chronological(a: &JournalEntry, b: &JournalEntry) -> Ordering {
    a.date
        .cmp(&b.date)
        .then(a.sequence.cmp(&b.sequence))
        .then(a.id.cmp(&b.id))
}

/// Sorts entries into folding order.
pub fn sort_chronologically(entries: &mut [JournalEntry]) {
    entries.sort_by(chronological);
}

/// Running balance information for a ledger entry.
///
/// - `version`: 1-based position of the entry in the account's fold
/// - `previous_balance`: balance before this entry
/// - `balance`: balance after this entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BalanceLine {
    /// The entry that produced this line.
    pub entry: JournalEntry,
    /// Position in the fold (monotonically increasing from 1).
    pub version: u64,
    /// Balance before this entry.
    pub previous_balance: Decimal,
    /// Signed change contributed by this entry.
    pub delta: Decimal,
    /// Balance after this entry.
    pub balance: Decimal,
}

/// Folds the entries referencing `account` into a running balance.
///
/// Entries that reference other accounts (or none) are skipped. The result
/// depends only on the account type and the entries themselves.
#[must_use]
pub fn running_balance(account: &Account, entries: &[JournalEntry]) -> Vec<BalanceLine> {
    let mut own: Vec<JournalEntry> = entries
        .iter()
        .filter(|e| e.coa_id == Some(account.id))
        .cloned()
        .collect();
    sort_chronologically(&mut own);

    let normal = account.account_type.normal_balance();
    let mut balance = Decimal::ZERO;

    own.into_iter()
        .zip(1u64..)
        .map(|(entry, version)| {
            let previous_balance = balance;
            let delta = normal.balance_change(entry.debit, entry.credit);
            balance += delta;
            BalanceLine {
                entry,
                version,
                previous_balance,
                delta,
                balance,
            }
        })
        .collect()
}

/// Account balance at a point in time (one trial balance row).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountBalance {
    /// The account ID.
    pub account_id: AccountId,
    /// Account code.
    pub account_code: String,
    /// Account name.
    pub account_name: String,
    /// Account classification.
    pub account_type: AccountType,
    /// Total debit amount.
    pub debit_total: Decimal,
    /// Total credit amount.
    pub credit_total: Decimal,
    /// Net balance on the account's normal side.
    pub balance: Decimal,
}

impl AccountBalance {
    /// Creates an empty balance for an account.
    #[must_use]
    pub fn new(account: &Account) -> Self {
        Self {
            account_id: account.id,
            account_code: account.code.clone(),
            account_name: account.name.clone(),
            account_type: account.account_type,
            debit_total: Decimal::ZERO,
            credit_total: Decimal::ZERO,
            balance: Decimal::ZERO,
        }
    }

    /// Adds one entry's debit and credit.
    pub fn add(&mut self, debit: Decimal, credit: Decimal) {
        self.debit_total += debit;
        self.credit_total += credit;
        self.balance = self
            .account_type
            .normal_balance()
            .balance_change(self.debit_total, self.credit_total);
    }
}

/// Computes one balance row per master account, in chart order.
///
/// Entries without a resolvable `coa_id` are left out; they are reported by
/// the reconciler instead.
#[must_use]
pub fn trial_balance(accounts: &[Account], entries: &[JournalEntry]) -> Vec<AccountBalance> {
    let mut rows: Vec<AccountBalance> = accounts.iter().map(AccountBalance::new).collect();
    for entry in entries {
        let Some(coa_id) = entry.coa_id else {
            continue;
        };
        if let Some(row) = rows.iter_mut().find(|r| r.account_id == coa_id) {
            row.add(entry.debit, entry.credit);
        }
    }
    rows
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::types::EntryKind;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;
    use tppb_shared::types::JournalEntryId;
    use uuid::Uuid;

    fn account(account_type: AccountType) -> Account {
        Account {
            id: AccountId::from_uuid(Uuid::from_u128(1)),
            code: "2100".to_string(),
            name: "Utang Usaha".to_string(),
            account_type,
        }
    }

    fn entry(seq: u64, day: u32, debit: Decimal, credit: Decimal, coa: &Account) -> JournalEntry {
        JournalEntry {
            id: JournalEntryId::from_uuid(Uuid::from_u128(u128::from(seq) + 100)),
            sequence: seq,
            kind: EntryKind::Expense,
            category: String::new(),
            amount: debit + credit,
            date: NaiveDate::from_ymd_opt(2026, 1, day).unwrap(),
            coa_id: Some(coa.id),
            account_code: coa.code.clone(),
            account_name: coa.name.clone(),
            debit,
            credit,
            description: String::new(),
            source_id: None,
        }
    }

    fn balances(lines: &[BalanceLine]) -> Vec<Decimal> {
        lines.iter().map(|l| l.balance).collect()
    }

    #[test]
    fn test_liability_running_balance() {
        let acc = account(AccountType::Liability);
        let entries = vec![
            entry(1, 1, dec!(0), dec!(100), &acc),
            entry(2, 2, dec!(50), dec!(0), &acc),
        ];
        let lines = running_balance(&acc, &entries);
        assert_eq!(balances(&lines), vec![dec!(100), dec!(50)]);
        assert_eq!(lines[1].previous_balance, dec!(100));
        assert_eq!(lines[1].delta, dec!(-50));
    }

    #[test]
    fn test_asset_running_balance() {
        let acc = account(AccountType::Asset);
        let entries = vec![
            entry(1, 1, dec!(0), dec!(100), &acc),
            entry(2, 2, dec!(50), dec!(0), &acc),
        ];
        assert_eq!(
            balances(&running_balance(&acc, &entries)),
            vec![dec!(-100), dec!(-50)]
        );
    }

    #[test]
    fn test_unsorted_input_is_sorted_by_date() {
        let acc = account(AccountType::Liability);
        let entries = vec![
            entry(2, 5, dec!(50), dec!(0), &acc),
            entry(1, 1, dec!(0), dec!(100), &acc),
        ];
        let lines = running_balance(&acc, &entries);
        assert_eq!(balances(&lines), vec![dec!(100), dec!(50)]);
        assert_eq!(lines[0].entry.sequence, 1);
    }

    #[test]
    fn test_same_date_tie_break_uses_sequence() {
        let acc = account(AccountType::Asset);
        let entries = vec![
            entry(7, 3, dec!(0), dec!(40), &acc),
            entry(3, 3, dec!(100), dec!(0), &acc),
            entry(5, 3, dec!(10), dec!(0), &acc),
        ];
        let lines = running_balance(&acc, &entries);
        let order: Vec<u64> = lines.iter().map(|l| l.entry.sequence).collect();
        assert_eq!(order, vec![3, 5, 7]);
        assert_eq!(balances(&lines), vec![dec!(100), dec!(110), dec!(70)]);
    }

    #[test]
    fn test_entries_for_other_accounts_are_skipped() {
        let acc = account(AccountType::Expense);
        let mut other = account(AccountType::Expense);
        other.id = AccountId::from_uuid(Uuid::from_u128(2));
        let mut orphan = entry(3, 1, dec!(5), dec!(0), &acc);
        orphan.coa_id = None;

        let entries = vec![
            entry(1, 1, dec!(10), dec!(0), &acc),
            entry(2, 1, dec!(99), dec!(0), &other),
            orphan,
        ];
        let lines = running_balance(&acc, &entries);
        assert_eq!(lines.len(), 1);
        assert_eq!(lines[0].balance, dec!(10));
    }

    #[test]
    fn test_versions_are_contiguous() {
        let acc = account(AccountType::Revenue);
        let entries: Vec<_> = (1..=5)
            .map(|i| entry(i, 1, dec!(0), dec!(1), &acc))
            .collect();
        let versions: Vec<u64> = running_balance(&acc, &entries)
            .iter()
            .map(|l| l.version)
            .collect();
        assert_eq!(versions, vec![1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_empty_entries_yield_no_lines() {
        let acc = account(AccountType::Equity);
        assert!(running_balance(&acc, &[]).is_empty());
    }

    #[test]
    fn test_trial_balance_uses_normal_side() {
        let liability = account(AccountType::Liability);
        let mut expense = account(AccountType::Expense);
        expense.id = AccountId::from_uuid(Uuid::from_u128(2));
        expense.code = "5100".to_string();

        let mut orphan = entry(4, 1, dec!(1000), dec!(0), &expense);
        orphan.coa_id = None;

        let entries = vec![
            entry(1, 1, dec!(0), dec!(300), &liability),
            entry(2, 1, dec!(100), dec!(0), &liability),
            entry(3, 1, dec!(250), dec!(0), &expense),
            orphan,
        ];
        let rows = trial_balance(&[liability.clone(), expense.clone()], &entries);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].account_code, "2100");
        assert_eq!(rows[0].credit_total, dec!(300));
        assert_eq!(rows[0].debit_total, dec!(100));
        assert_eq!(rows[0].balance, dec!(200));
        assert_eq!(rows[1].balance, dec!(250));
    }
}

//! Property-based tests for the balance calculator and reconciler.

use chrono::NaiveDate;
use proptest::prelude::*;
use rust_decimal::Decimal;
use tppb_shared::types::{AccountId, JournalEntryId};
use uuid::Uuid;

use super::balance::running_balance;
use super::reconcile::{ReconcileMode, reconcile};
use super::types::{Account, AccountType, EntryKind, JournalEntry};

fn arb_account_type() -> impl Strategy<Value = AccountType> {
    prop_oneof![
        Just(AccountType::Asset),
        Just(AccountType::Liability),
        Just(AccountType::Equity),
        Just(AccountType::Revenue),
        Just(AccountType::Expense),
    ]
}

fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn account(account_type: AccountType) -> Account {
    Account {
        id: AccountId::from_uuid(Uuid::from_u128(7)),
        code: "1100".to_string(),
        name: "Kas".to_string(),
        account_type,
    }
}

/// (day offset, debit, credit) triples.
fn arb_rows(max: usize) -> impl Strategy<Value = Vec<(u32, Decimal, Decimal)>> {
    prop::collection::vec((0u32..5, amount(), amount()), 0..=max)
}

fn build_entries(acc: &Account, rows: &[(u32, Decimal, Decimal)]) -> Vec<JournalEntry> {
    rows.iter()
        .zip(1u64..)
        .map(|(&(day, debit, credit), seq)| JournalEntry {
            id: JournalEntryId::from_uuid(Uuid::from_u128(u128::from(seq))),
            sequence: seq,
            kind: EntryKind::Expense,
            category: String::new(),
            amount: debit + credit,
            date: NaiveDate::from_ymd_opt(2026, 1, 1 + day).unwrap(),
            coa_id: Some(acc.id),
            account_code: acc.code.clone(),
            account_name: acc.name.clone(),
            debit,
            credit,
            description: String::new(),
            source_id: None,
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// Same inputs always produce the same sequence of balances.
    #[test]
    fn prop_running_balance_is_deterministic(
        account_type in arb_account_type(),
        rows in arb_rows(20),
    ) {
        let acc = account(account_type);
        let entries = build_entries(&acc, &rows);
        prop_assert_eq!(running_balance(&acc, &entries), running_balance(&acc, &entries));
    }

    /// Input order does not matter: the calculator sorts before folding.
    #[test]
    fn prop_running_balance_ignores_input_order(
        account_type in arb_account_type(),
        rows in arb_rows(20),
    ) {
        let acc = account(account_type);
        let entries = build_entries(&acc, &rows);
        let mut reversed = entries.clone();
        reversed.reverse();
        prop_assert_eq!(running_balance(&acc, &entries), running_balance(&acc, &reversed));
    }

    /// The final balance equals the signed sum on the normal side.
    #[test]
    fn prop_final_balance_equals_sum_of_changes(
        account_type in arb_account_type(),
        rows in arb_rows(20),
    ) {
        let acc = account(account_type);
        let entries = build_entries(&acc, &rows);
        let lines = running_balance(&acc, &entries);
        let normal = account_type.normal_balance();
        let expected: Decimal = rows.iter().map(|&(_, d, c)| normal.balance_change(d, c)).sum();
        let last = lines.last().map_or(Decimal::ZERO, |l| l.balance);
        prop_assert_eq!(last, expected);
    }

    /// Each line continues from the one before it.
    #[test]
    fn prop_previous_equals_prior_balance(
        account_type in arb_account_type(),
        rows in arb_rows(20),
    ) {
        let acc = account(account_type);
        let lines = running_balance(&acc, &build_entries(&acc, &rows));
        for pair in lines.windows(2) {
            prop_assert_eq!(pair[1].previous_balance, pair[0].balance);
            prop_assert!(pair[0].entry.date <= pair[1].entry.date);
        }
    }

    /// Repair then repair again: the second pass finds no discrepancies.
    #[test]
    fn prop_reconcile_repair_is_idempotent(
        rows in arb_rows(10),
        drift in prop::collection::vec(any::<bool>(), 10),
    ) {
        let acc = account(AccountType::Expense);
        let mut entries = build_entries(&acc, &rows);
        for (entry, drifted) in entries.iter_mut().zip(drift) {
            if drifted {
                entry.account_code = "stale".to_string();
            }
        }
        let master = vec![acc];

        reconcile(&master, &mut entries, ReconcileMode::Repair);
        let second = reconcile(&master, &mut entries, ReconcileMode::Repair);
        prop_assert!(second.discrepancies.is_empty());
        prop_assert!(second.repaired.is_empty());
        prop_assert_eq!(second.checked, rows.len());
    }
}

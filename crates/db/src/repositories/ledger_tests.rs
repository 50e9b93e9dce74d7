use chrono::NaiveDate;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use tppb_core::DomainError;
use tppb_core::ledger::{Account, AccountType, EntryKind, JournalEntry, NewAccount, ReconcileMode};
use tppb_shared::types::{AccountId, JournalEntryId};

use super::test_support::seeded_db;
use crate::database::Database;
use crate::memory::MemoryStore;
use crate::record::encode;
use crate::store::{Collection, Store};

fn entry(
    account: &Account,
    day: u32,
    sequence: u64,
    debit: Decimal,
    credit: Decimal,
) -> JournalEntry {
    JournalEntry {
        id: JournalEntryId::new(),
        sequence,
        kind: if credit > Decimal::ZERO {
            EntryKind::Income
        } else {
            EntryKind::Expense
        },
        category: "penyesuaian".to_string(),
        amount: debit + credit,
        date: NaiveDate::from_ymd_opt(2026, 4, day).unwrap(),
        coa_id: Some(account.id),
        account_code: account.code.clone(),
        account_name: account.name.clone(),
        debit,
        credit,
        description: String::new(),
        source_id: None,
    }
}

async fn store_entry(db: &Database<MemoryStore>, entry: &JournalEntry) {
    db.store()
        .insert(Collection::JournalEntries, encode(entry).unwrap())
        .await
        .unwrap();
}

async fn account(db: &Database<MemoryStore>, code: &str) -> Account {
    db.ledger()
        .list_accounts()
        .await
        .unwrap()
        .into_iter()
        .find(|a| a.code == code)
        .unwrap()
}

#[tokio::test]
async fn test_liability_running_balance() {
    let db = seeded_db().await;
    let payable = account(&db, "2100").await;
    // Stored out of order; the fold sorts by date.
    store_entry(&db, &entry(&payable, 2, 2, dec!(50), dec!(0))).await;
    store_entry(&db, &entry(&payable, 1, 1, dec!(0), dec!(100))).await;

    let lines = db.ledger().running_balance(payable.id).await.unwrap();
    let balances: Vec<Decimal> = lines.iter().map(|l| l.balance).collect();
    assert_eq!(balances, vec![dec!(100), dec!(50)]);
    assert_eq!(lines[1].previous_balance, dec!(100));
    assert_eq!(lines[1].version, 2);
}

#[tokio::test]
async fn test_same_day_entries_fold_in_write_order() {
    let db = seeded_db().await;
    let cash = account(&db, "1100").await;
    store_entry(&db, &entry(&cash, 5, 9, dec!(0), dec!(30))).await;
    store_entry(&db, &entry(&cash, 5, 3, dec!(100), dec!(0))).await;

    let lines = db.ledger().running_balance(cash.id).await.unwrap();
    let balances: Vec<Decimal> = lines.iter().map(|l| l.balance).collect();
    assert_eq!(balances, vec![dec!(100), dec!(70)]);

    let ordered = db.ledger().journal_entries().await.unwrap();
    assert_eq!(ordered[0].sequence, 3);
}

#[tokio::test]
async fn test_running_balance_unknown_account() {
    let db = seeded_db().await;
    let err = db
        .ledger()
        .running_balance(AccountId::new())
        .await
        .unwrap_err();
    assert_eq!(err.status_code(), 404);
}

#[tokio::test]
async fn test_duplicate_account_code_is_conflict() {
    let db = seeded_db().await;
    let err = db
        .ledger()
        .create_account(NewAccount {
            code: " 1100 ".to_string(),
            name: "Kas Kecil".to_string(),
            account_type: AccountType::Asset,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::StateConflict { .. }));

    let err = db
        .ledger()
        .create_account(NewAccount {
            code: "1300".to_string(),
            name: "  ".to_string(),
            account_type: AccountType::Asset,
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Validation { .. }));
    assert_eq!(db.ledger().list_accounts().await.unwrap().len(), 7);
}

#[tokio::test]
async fn test_repair_then_clean_pass() {
    let db = seeded_db().await;
    let revenue = account(&db, "4100").await;
    let mut drifted = entry(&revenue, 1, 1, dec!(0), dec!(500));
    drifted.account_name = "Pendapatan Lama".to_string();
    store_entry(&db, &drifted).await;

    let mut orphan = entry(&revenue, 1, 2, dec!(0), dec!(10));
    orphan.coa_id = Some(AccountId::new());
    store_entry(&db, &orphan).await;

    let ledger = db.ledger();
    let report = ledger.reconcile_coa(ReconcileMode::Report).await.unwrap();
    assert_eq!(report.discrepancies.len(), 1);
    assert_eq!(report.orphans.len(), 1);
    assert!(report.repaired.is_empty());

    let repaired = ledger.reconcile_coa(ReconcileMode::Repair).await.unwrap();
    assert_eq!(repaired.repaired, vec![drifted.id]);

    let again = ledger.reconcile_coa(ReconcileMode::Report).await.unwrap();
    assert!(again.discrepancies.is_empty());
    assert_eq!(again.orphans.len(), 1);
    assert_eq!(again.orphan_errors().len(), 1);

    let stored = ledger
        .journal_entries()
        .await
        .unwrap()
        .into_iter()
        .find(|e| e.id == drifted.id)
        .unwrap();
    assert_eq!(stored.account_name, "Pendapatan Penjualan");
    assert_eq!(stored.credit, dec!(500));
}

#[tokio::test]
async fn test_trial_balance_totals() {
    let db = seeded_db().await;
    let cash = account(&db, "1100").await;
    let revenue = account(&db, "4100").await;
    store_entry(&db, &entry(&cash, 1, 1, dec!(250), dec!(0))).await;
    store_entry(&db, &entry(&revenue, 1, 2, dec!(0), dec!(250))).await;

    let rows = db.ledger().trial_balance().await.unwrap();
    assert_eq!(rows.len(), 7);
    let cash_row = rows.iter().find(|r| r.account_code == "1100").unwrap();
    assert_eq!(cash_row.debit_total, dec!(250));
    assert_eq!(cash_row.balance, dec!(250));
    let revenue_row = rows.iter().find(|r| r.account_code == "4100").unwrap();
    assert_eq!(revenue_row.balance, dec!(250));

    let debits: Decimal = rows.iter().map(|r| r.debit_total).sum();
    let credits: Decimal = rows.iter().map(|r| r.credit_total).sum();
    assert_eq!(debits, credits);
}

//! Fixtures shared by the integration tests.

#![allow(dead_code)]

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tppb_core::customs::{NewItem, NewPackage, NewSubmission, SubmissionType};
use tppb_core::ledger::{AccountType, NewAccount};
use tppb_db::{Database, Store};
use tppb_shared::AppConfig;

/// Creates the default chart of accounts on a fresh database.
pub async fn seed_accounts<S: Store>(db: &Database<S>) {
    for seed in &db.config().seed.accounts {
        db.ledger()
            .create_account(NewAccount {
                code: seed.code.clone(),
                name: seed.name.clone(),
                account_type: AccountType::parse(&seed.account_type).unwrap(),
            })
            .await
            .unwrap();
    }
}

/// Wraps `store` with the default configuration and chart of accounts.
pub async fn seeded<S: Store>(store: S) -> Database<S> {
    let db = Database::new(store, AppConfig::default());
    seed_accounts(&db).await;
    db
}

/// An inbound submission with one package holding `items`.
pub fn submission(items: &[(&str, &str, Decimal, Decimal)]) -> NewSubmission {
    NewSubmission {
        submission_type: SubmissionType::Inbound,
        customer: "CV Expo Mandiri".to_string(),
        packages: vec![NewPackage {
            package_number: "PKG-01".to_string(),
            items: items
                .iter()
                .map(|(name, serial, quantity, value)| NewItem {
                    name: (*name).to_string(),
                    serial_number: (*serial).to_string(),
                    quantity: *quantity,
                    unit: "pcs".to_string(),
                    condition: "baru".to_string(),
                    value: *value,
                })
                .collect(),
        }],
    }
}

/// A date `days` after today, later than any movement approval stamps.
pub fn days_from_today(days: u64) -> NaiveDate {
    Utc::now().date_naive() + Days::new(days)
}

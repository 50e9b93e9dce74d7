//! Fixtures shared by the repository tests.

use chrono::{Days, NaiveDate, Utc};
use rust_decimal::Decimal;
use tppb_core::customs::{NewItem, NewPackage, NewSubmission, SubmissionType};
use tppb_core::ledger::{AccountType, NewAccount};
use tppb_shared::AppConfig;

use crate::database::Database;
use crate::memory::MemoryStore;

/// A database with the default chart of accounts.
pub(crate) async fn seeded_db() -> Database<MemoryStore> {
    let config = AppConfig::default();
    let db = Database::new(MemoryStore::new(), config.clone());
    for seed in &config.seed.accounts {
        db.ledger()
            .create_account(NewAccount {
                code: seed.code.clone(),
                name: seed.name.clone(),
                account_type: AccountType::parse(&seed.account_type).unwrap(),
            })
            .await
            .unwrap();
    }
    db
}

/// A one-package, one-item submission request.
pub(crate) fn single_item(quantity: Decimal, value: Decimal) -> NewSubmission {
    NewSubmission {
        submission_type: SubmissionType::Inbound,
        customer: "PT Pameran Nusantara".to_string(),
        packages: vec![NewPackage {
            package_number: "PKG-001".to_string(),
            items: vec![NewItem {
                name: "Excavator".to_string(),
                serial_number: "EX-01".to_string(),
                quantity,
                unit: "unit".to_string(),
                condition: "baru".to_string(),
                value,
            }],
        }],
    }
}

/// A date `days` after today, later than any movement approval stamps.
pub(crate) fn days_from_today(days: u64) -> NaiveDate {
    Utc::now().date_naive() + Days::new(days)
}

//! Seeder for TPPB development and testing.
//!
//! Creates the configured chart of accounts and, when `TPPB_SEED_DEMO` is
//! set, a demo submission. Safe to run repeatedly: existing account codes
//! and a non-empty submission list are left alone.
//!
//! Usage: cargo run --bin seeder

use anyhow::Context;
use rust_decimal::Decimal;
use tppb_core::DomainError;
use tppb_core::customs::{NewItem, NewPackage, NewSubmission, SubmissionType};
use tppb_core::ledger::{AccountType, NewAccount};
use tppb_db::{Database, MemoryStore, SubmissionFilter};
use tppb_shared::config::SeedAccount;
use tppb_shared::{AppConfig, init_tracing};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = AppConfig::load().context("loading configuration")?;
    init_tracing(&config.logging).context("installing tracing subscriber")?;

    let db = tppb_db::connect(config.clone())
        .await
        .context("opening store")?;
    match db.store().snapshot_path() {
        Some(path) => info!(path = %path.display(), "seeding store snapshot"),
        None => {
            warn!("no store.snapshot_path configured, seeded data will not outlive this process");
        }
    }

    info!("seeding chart of accounts");
    let created = seed_accounts(&db, &config.seed.accounts).await?;
    info!(created, total = config.seed.accounts.len(), "chart of accounts seeded");

    if std::env::var_os("TPPB_SEED_DEMO").is_some() {
        seed_demo_submission(&db).await?;
    }

    info!("seeding complete");
    Ok(())
}

/// Creates every seed account whose code is not taken yet.
async fn seed_accounts(
    db: &Database<MemoryStore>,
    seeds: &[SeedAccount],
) -> anyhow::Result<usize> {
    let mut created = 0;
    for seed in seeds {
        let account_type = AccountType::parse(&seed.account_type).with_context(|| {
            format!("unknown account type {:?} for {}", seed.account_type, seed.code)
        })?;
        let result = db
            .ledger()
            .create_account(NewAccount {
                code: seed.code.clone(),
                name: seed.name.clone(),
                account_type,
            })
            .await;
        match result {
            Ok(account) => {
                created += 1;
                info!(code = %account.code, name = %account.name, "account seeded");
            }
            Err(DomainError::StateConflict { .. }) => {
                info!(code = %seed.code, "account already exists, skipping");
            }
            Err(e) => return Err(e).with_context(|| format!("seeding account {}", seed.code)),
        }
    }
    Ok(created)
}

/// Creates one pending inbound submission for manual testing.
async fn seed_demo_submission(db: &Database<MemoryStore>) -> anyhow::Result<()> {
    let submissions = db.submissions();
    if !submissions.list(SubmissionFilter::default()).await?.is_empty() {
        info!("submissions already present, skipping demo data");
        return Ok(());
    }

    let submission = submissions
        .create(NewSubmission {
            submission_type: SubmissionType::Inbound,
            customer: "PT Demo Pameran".to_string(),
            packages: vec![NewPackage {
                package_number: "PKG-DEMO-01".to_string(),
                items: vec![
                    NewItem {
                        name: "Exhibition Booth".to_string(),
                        serial_number: "EB-001".to_string(),
                        quantity: Decimal::from(2),
                        unit: "set".to_string(),
                        condition: "baru".to_string(),
                        value: Decimal::from(15_000_000),
                    },
                    NewItem {
                        name: "LED Screen".to_string(),
                        serial_number: "LS-104".to_string(),
                        quantity: Decimal::from(4),
                        unit: "unit".to_string(),
                        condition: "baru".to_string(),
                        value: Decimal::from(8_500_000),
                    },
                ],
            }],
        })
        .await
        .context("creating demo submission")?;

    info!(submission_id = %submission.id, "demo submission seeded");
    Ok(())
}

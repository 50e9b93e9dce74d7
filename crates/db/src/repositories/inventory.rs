//! Inventory repository: stock movements and their audit log.

use chrono::Utc;
use rust_decimal::Decimal;
use tppb_core::{DomainError, DomainResult};
use tppb_core::inventory::{InventoryRecord, MutationLog, NewMovement, StockLedger};
use tppb_shared::types::{InventoryId, SubmissionId};
use tracing::{info, warn};

use super::{all, find, load};
use crate::database::Database;
use crate::locks::LockKey;
use crate::record::{decode, decode_all};
use crate::store::{Collection, Filter, Store, document_id};
use crate::unit_of_work::UnitOfWork;

/// Result of recording a movement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementOutcome {
    /// The record after the movement.
    pub record: InventoryRecord,
    /// The mutation-log entry written with it.
    pub mutation: MutationLog,
}

/// Inventory repository.
#[derive(Debug)]
pub struct InventoryRepository<S> {
    db: Database<S>,
}

impl<S: Store> InventoryRepository<S> {
    /// Creates a new inventory repository.
    #[must_use]
    pub const fn new(db: Database<S>) -> Self {
        Self { db }
    }

    /// Appends a movement to a record together with its mutation log entry.
    ///
    /// # Errors
    ///
    /// - `StateConflict` when the record does not exist or its counter drifted.
    /// - `Validation` for a non-positive quantity.
    /// - `InsufficientStock` when an outbound movement exceeds the stock.
    pub async fn record_movement(
        &self,
        inventory_id: InventoryId,
        input: NewMovement,
    ) -> DomainResult<MovementOutcome> {
        let _locks = self
            .db
            .locks()
            .acquire([LockKey::Inventory(inventory_id)])
            .await;
        let current = self.get(inventory_id).await?;

        let (record, mutation) = StockLedger::apply_movement(&current, input, Utc::now())
            .inspect_err(|e| {
                warn!(inventory_id = %inventory_id, error = %e, "movement refused");
            })?;

        let mut uow = UnitOfWork::new();
        uow.update(&record)?;
        uow.insert(&mutation)?;
        uow.commit(self.db.store()).await?;

        info!(
            inventory_id = %inventory_id,
            movement_type = %mutation.movement.movement_type,
            quantity = %mutation.movement.quantity,
            remaining = %mutation.movement.remaining_stock,
            status = ?record.status,
            "movement recorded"
        );
        Ok(MovementOutcome { record, mutation })
    }

    /// Loads a record.
    ///
    /// # Errors
    ///
    /// `StateConflict` (not found) when the id is unknown.
    pub async fn get(&self, id: InventoryId) -> DomainResult<InventoryRecord> {
        load(self.db.store(), "inventory", &id.to_string()).await
    }

    /// All records in insertion order.
    pub async fn list(&self) -> DomainResult<Vec<InventoryRecord>> {
        all(self.db.store()).await
    }

    /// Records opened by approving a submission.
    pub async fn list_for_submission(
        &self,
        submission_id: SubmissionId,
    ) -> DomainResult<Vec<InventoryRecord>> {
        find(
            self.db.store(),
            &Filter::new().where_eq("submission_id", submission_id.to_string()),
        )
        .await
    }

    /// Mutation log of a record, in movement order.
    pub async fn mutation_log(&self, inventory_id: InventoryId) -> DomainResult<Vec<MutationLog>> {
        let mut logs: Vec<MutationLog> = find(
            self.db.store(),
            &Filter::new().where_eq("inventory_id", inventory_id.to_string()),
        )
        .await?;
        logs.sort_by_key(|log| log.movement.sequence);
        Ok(logs)
    }

    /// Recomputes a record's stock from its movements.
    ///
    /// Returns the verified current stock.
    ///
    /// # Errors
    ///
    /// `StateConflict` when the counter disagrees with the movement log or
    /// the mutation log is not one entry per movement.
    pub async fn verify_stock(&self, inventory_id: InventoryId) -> DomainResult<Decimal> {
        let snapshot = self
            .db
            .store()
            .snapshot(&[Collection::Inventory, Collection::MutationLogs])
            .await?;
        let id = inventory_id.to_string();
        let record: InventoryRecord = snapshot
            .get(Collection::Inventory)
            .iter()
            .find(|doc| document_id(doc) == Some(id.as_str()))
            .cloned()
            .map(decode)
            .transpose()?
            .ok_or_else(|| DomainError::not_found("inventory", &id))?;
        StockLedger::verify(&record)?;

        let by_inventory = Filter::new().where_eq("inventory_id", id.as_str());
        let mut logs: Vec<MutationLog> = decode_all(
            snapshot
                .get(Collection::MutationLogs)
                .iter()
                .filter(|doc| by_inventory.matches(doc))
                .cloned()
                .collect(),
        )?;
        logs.sort_by_key(|log| log.movement.sequence);

        let mirrored = logs.len() == record.movements.len()
            && logs
                .iter()
                .zip(&record.movements)
                .all(|(log, movement)| &log.movement == movement);
        if !mirrored {
            warn!(inventory_id = %inventory_id, "mutation log out of step with movements");
            return Err(DomainError::conflict(
                "inventory",
                inventory_id,
                "mutation log does not mirror the movement log",
            ));
        }
        Ok(record.current_stock)
    }
}

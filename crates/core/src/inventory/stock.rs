//! Stock movement rules.
//!
//! A movement and its mutation-log mirror are always produced together. The
//! stored `current_stock` counter is updated by the same call, so a record's
//! counter, the fold of its movements and the last `remaining_stock` agree.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use tppb_shared::types::{InventoryId, MutationLogId, SubmissionId};

use super::types::{
    InventoryRecord, InventoryStatus, Movement, MovementType, MutationLog, NewMovement,
};
use crate::error::{DomainError, DomainResult};

/// Identity of a record about to be opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordSeed {
    /// Originating submission, if any.
    pub submission_id: Option<SubmissionId>,
    /// Item name.
    pub item_name: String,
    /// Serial number.
    pub serial_number: String,
    /// Unit of measure.
    pub unit: String,
}

/// Stateless service for stock movements.
pub struct StockLedger;

impl StockLedger {
    /// Stock after applying one movement to `previous`.
    #[must_use]
    pub fn remaining_after(
        previous: Decimal,
        movement_type: MovementType,
        quantity: Decimal,
    ) -> Decimal {
        match movement_type {
            MovementType::In => previous + quantity,
            MovementType::Out => previous - quantity,
        }
    }

    /// Folds a movement log into a stock level.
    #[must_use]
    pub fn folded_stock(movements: &[Movement]) -> Decimal {
        movements.iter().fold(Decimal::ZERO, |stock, m| {
            Self::remaining_after(stock, m.movement_type, m.quantity)
        })
    }

    /// Creates a record whose first movement is the given inbound movement.
    ///
    /// # Errors
    ///
    /// `Validation` if the item name is blank, the movement is not `in`, or
    /// the quantity is not positive.
    pub fn open_record(
        seed: RecordSeed,
        initial: NewMovement,
        now: DateTime<Utc>,
    ) -> DomainResult<(InventoryRecord, MutationLog)> {
        if seed.item_name.trim().is_empty() {
            return Err(DomainError::validation(
                "inventory",
                "item name cannot be empty",
            ));
        }
        if initial.movement_type != MovementType::In {
            return Err(DomainError::validation(
                "inventory",
                "the first movement of a record must be inbound",
            ));
        }

        let record = InventoryRecord {
            id: InventoryId::new(),
            submission_id: seed.submission_id,
            item_name: seed.item_name,
            serial_number: seed.serial_number,
            unit: seed.unit,
            quantity: initial.quantity,
            current_stock: Decimal::ZERO,
            location: initial.destination.clone(),
            condition: initial.condition.clone(),
            status: InventoryStatus::from_destination(&initial.destination),
            movements: Vec::new(),
            created_at: now,
        };

        Self::apply_movement(&record, initial, now)
    }

    /// Appends a movement to a record and produces the matching mutation log.
    ///
    /// Returns the updated record; the input record is not modified.
    ///
    /// # Errors
    ///
    /// - `Validation` if the quantity is not positive or the movement occurs
    ///   before the last recorded one.
    /// - `InsufficientStock` if an outbound movement exceeds the current stock.
    /// - `StateConflict` if the stored counter disagrees with the movement log.
    pub fn apply_movement(
        record: &InventoryRecord,
        input: NewMovement,
        now: DateTime<Utc>,
    ) -> DomainResult<(InventoryRecord, MutationLog)> {
        if input.quantity <= Decimal::ZERO {
            return Err(DomainError::validation(
                "movement",
                format!("quantity must be positive, got {}", input.quantity),
            ));
        }
        if let Some(last) = record.movements.last() {
            if (input.date, input.time) < (last.date, last.time) {
                return Err(DomainError::validation(
                    "movement",
                    format!(
                        "movement at {} {} precedes the last movement at {} {}",
                        input.date, input.time, last.date, last.time
                    ),
                ));
            }
        }
        Self::verify(record)?;

        let previous = record.current_stock;
        if input.movement_type == MovementType::Out && input.quantity > previous {
            return Err(DomainError::InsufficientStock {
                item: record.id.to_string(),
                requested: input.quantity,
                available: previous,
            });
        }

        let sequence = u32::try_from(record.movements.len() + 1).map_err(|_| {
            DomainError::conflict("inventory", record.id, "movement log is full")
        })?;
        let remaining = Self::remaining_after(previous, input.movement_type, input.quantity);

        let movement = Movement {
            sequence,
            date: input.date,
            time: input.time,
            quantity: input.quantity,
            movement_type: input.movement_type,
            origin: input.origin,
            destination: input.destination,
            condition: input.condition,
            remaining_stock: remaining,
            pic: input.pic,
            notes: input.notes,
        };

        let mut updated = record.clone();
        updated.current_stock = remaining;
        updated.location.clone_from(&movement.destination);
        if !movement.condition.is_empty() {
            updated.condition.clone_from(&movement.condition);
        }
        updated.status = InventoryStatus::from_destination(&movement.destination);
        updated.movements.push(movement.clone());

        let mutation = MutationLog {
            id: MutationLogId::new(),
            inventory_id: record.id,
            item_name: record.item_name.clone(),
            serial_number: record.serial_number.clone(),
            movement,
            recorded_at: now,
        };

        Ok((updated, mutation))
    }

    /// Checks that the stored counter matches the movement log.
    ///
    /// # Errors
    ///
    /// `StateConflict` describing the drift.
    pub fn verify(record: &InventoryRecord) -> DomainResult<()> {
        let folded = Self::folded_stock(&record.movements);
        if folded != record.current_stock {
            return Err(DomainError::conflict(
                "inventory",
                record.id,
                format!(
                    "current stock {} does not match movement log {}",
                    record.current_stock, folded
                ),
            ));
        }
        if let Some(last) = record.movements.last() {
            if last.remaining_stock != record.current_stock {
                return Err(DomainError::conflict(
                    "inventory",
                    record.id,
                    format!(
                        "current stock {} does not match last remaining stock {}",
                        record.current_stock, last.remaining_stock
                    ),
                ));
            }
        }
        Ok(())
    }
}

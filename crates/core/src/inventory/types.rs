//! Inventory record, movement and mutation-log types.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use tppb_shared::types::{InventoryId, MutationLogId, SubmissionId};

/// Direction of a stock movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Goods arriving.
    In,
    /// Goods leaving.
    Out,
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::In => write!(f, "in"),
            Self::Out => write!(f, "out"),
        }
    }
}

/// Display status of an inventory record, derived from the last destination.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InventoryStatus {
    /// Stored in the bonded warehouse ("gudang").
    InWarehouse,
    /// On display at the exhibition floor ("pameran").
    InExhibition,
    /// Damaged goods ("rusak").
    Damaged,
    /// Left the bonded area.
    Sold,
}

impl InventoryStatus {
    /// Maps a destination/position label to a status.
    ///
    /// `gudang` → in_warehouse, `pameran` → in_exhibition, `rusak` → damaged,
    /// anything else → sold. Matching ignores case and surrounding spaces.
    #[must_use]
    pub fn from_destination(destination: &str) -> Self {
        match destination.trim().to_lowercase().as_str() {
            "gudang" => Self::InWarehouse,
            "pameran" => Self::InExhibition,
            "rusak" => Self::Damaged,
            _ => Self::Sold,
        }
    }
}

/// One append-only stock movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Movement {
    /// 1-based position in the record's movement log.
    pub sequence: u32,
    /// Date of occurrence.
    pub date: NaiveDate,
    /// Time of occurrence.
    pub time: NaiveTime,
    /// Quantity moved (always positive).
    pub quantity: Decimal,
    /// Direction.
    #[serde(alias = "movementType")]
    pub movement_type: MovementType,
    /// Where the goods came from.
    #[serde(default)]
    pub origin: String,
    /// Where the goods went.
    #[serde(alias = "position")]
    pub destination: String,
    /// Condition of the goods.
    #[serde(default)]
    pub condition: String,
    /// Stock after this movement, as recorded at write time.
    #[serde(alias = "remainingStock")]
    pub remaining_stock: Decimal,
    /// Person in charge.
    #[serde(default)]
    pub pic: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// Input for recording a movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMovement {
    /// Date of occurrence.
    pub date: NaiveDate,
    /// Time of occurrence.
    pub time: NaiveTime,
    /// Quantity moved.
    pub quantity: Decimal,
    /// Direction.
    #[serde(alias = "movementType")]
    pub movement_type: MovementType,
    /// Where the goods came from.
    #[serde(default)]
    pub origin: String,
    /// Where the goods went.
    #[serde(alias = "position")]
    pub destination: String,
    /// Condition of the goods.
    #[serde(default)]
    pub condition: String,
    /// Person in charge.
    #[serde(default)]
    pub pic: String,
    /// Free-form notes.
    #[serde(default)]
    pub notes: Option<String>,
}

/// A stocked item with its movement history.
///
/// `current_stock` is maintained on every movement and always equals the
/// `remaining_stock` of the last movement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryRecord {
    /// Record id.
    pub id: InventoryId,
    /// Submission that brought the goods in, if any.
    #[serde(default, alias = "submissionId")]
    pub submission_id: Option<SubmissionId>,
    /// Item name.
    #[serde(alias = "itemName")]
    pub item_name: String,
    /// Serial number (empty when the goods are not serialised).
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Unit of measure.
    #[serde(default)]
    pub unit: String,
    /// Initial quantity.
    pub quantity: Decimal,
    /// Stock after the last movement.
    #[serde(alias = "currentStock")]
    pub current_stock: Decimal,
    /// Last known location.
    #[serde(default)]
    pub location: String,
    /// Last known condition.
    #[serde(default)]
    pub condition: String,
    /// Display status.
    pub status: InventoryStatus,
    /// Movement log, append-only.
    #[serde(default)]
    pub movements: Vec<Movement>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

/// Audit mirror of one movement. Never edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationLog {
    /// Entry id.
    pub id: MutationLogId,
    /// The record the movement belongs to.
    #[serde(alias = "inventoryId")]
    pub inventory_id: InventoryId,
    /// Item name at the time of the movement.
    #[serde(alias = "itemName")]
    pub item_name: String,
    /// Serial number at the time of the movement.
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Copy of the movement.
    pub movement: Movement,
    /// When the entry was written.
    pub recorded_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("gudang", InventoryStatus::InWarehouse)]
    #[case("Gudang ", InventoryStatus::InWarehouse)]
    #[case("pameran", InventoryStatus::InExhibition)]
    #[case("PAMERAN", InventoryStatus::InExhibition)]
    #[case("rusak", InventoryStatus::Damaged)]
    #[case("pembeli", InventoryStatus::Sold)]
    #[case("", InventoryStatus::Sold)]
    fn test_status_from_destination(#[case] destination: &str, #[case] expected: InventoryStatus) {
        assert_eq!(InventoryStatus::from_destination(destination), expected);
    }

    #[test]
    fn test_new_movement_accepts_position_alias() {
        let json = serde_json::json!({
            "date": "2026-04-01",
            "time": "09:30:00",
            "quantity": "3",
            "movementType": "out",
            "position": "pameran"
        });
        let movement: NewMovement = serde_json::from_value(json).unwrap();
        assert_eq!(movement.destination, "pameran");
        assert_eq!(movement.movement_type, MovementType::Out);
        assert!(movement.notes.is_none());
    }

    #[test]
    fn test_status_serializes_snake_case() {
        assert_eq!(
            serde_json::to_string(&InventoryStatus::InWarehouse).unwrap(),
            "\"in_warehouse\""
        );
    }
}

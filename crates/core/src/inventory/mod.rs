//! Inventory stock ledger.
//!
//! - `types` - Inventory records, movements and mutation logs
//! - `stock` - Movement rules and counter verification

pub mod stock;
pub mod types;

#[cfg(test)]
mod stock_props;

pub use stock::{RecordSeed, StockLedger};
pub use types::{
    InventoryRecord, InventoryStatus, Movement, MovementType, MutationLog, NewMovement,
};

//! Posting transaction types.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Operational cost breakdown of a transaction.
///
/// Every field other than `notes` is a cost component; components are open
/// ended (freight, handling, storage, ...).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct OperationalCosts {
    /// Named cost components.
    #[serde(flatten)]
    pub components: BTreeMap<String, Decimal>,
    /// Free-form notes, never summed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl OperationalCosts {
    /// Sum of all components.
    #[must_use]
    pub fn total(&self) -> Decimal {
        self.components.values().copied().sum()
    }
}

/// Goods bought into the bonded area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InboundTransaction {
    /// Transaction date.
    pub date: NaiveDate,
    /// External reference (invoice, AWB).
    #[serde(default)]
    pub reference: String,
    /// Item name.
    #[serde(alias = "itemName")]
    pub item_name: String,
    /// Serial number.
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Unit of measure.
    #[serde(default)]
    pub unit: String,
    /// Quantity received.
    pub quantity: Decimal,
    /// Purchase value of the goods.
    #[serde(alias = "goodsValue")]
    pub goods_value: Decimal,
    /// Operational costs.
    #[serde(default, alias = "operationalCosts")]
    pub operational_costs: OperationalCosts,
    /// Supplier or origin.
    #[serde(default)]
    pub origin: String,
    /// Storage position.
    #[serde(default = "default_destination", alias = "position")]
    pub destination: String,
    /// Person in charge.
    #[serde(default)]
    pub pic: String,
    /// Description copied to the journal entries.
    #[serde(default)]
    pub description: String,
}

/// Goods sold out of the bonded area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundTransaction {
    /// Transaction date.
    pub date: NaiveDate,
    /// External reference (invoice number).
    #[serde(default)]
    pub reference: String,
    /// Item name.
    #[serde(alias = "itemName")]
    pub item_name: String,
    /// Serial number.
    #[serde(default, alias = "serialNumber")]
    pub serial_number: String,
    /// Quantity sold.
    pub quantity: Decimal,
    /// Sale value.
    #[serde(alias = "saleValue")]
    pub sale_value: Decimal,
    /// Operational costs.
    #[serde(default, alias = "operationalCosts")]
    pub operational_costs: OperationalCosts,
    /// Buyer or destination.
    #[serde(default = "default_buyer", alias = "position")]
    pub destination: String,
    /// Person in charge.
    #[serde(default)]
    pub pic: String,
    /// Description copied to the journal entries.
    #[serde(default)]
    pub description: String,
}

fn default_destination() -> String {
    "gudang".to_string()
}

fn default_buyer() -> String {
    "pembeli".to_string()
}

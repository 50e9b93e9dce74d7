//! Financial posting engine.
//!
//! Turns inbound and outbound goods transactions into journal entries, a
//! stock delta on the matching inventory record and a draft BC document.

pub mod service;
pub mod types;

pub use service::{PostingAccounts, PostingPlan, PostingService};
pub use types::{InboundTransaction, OperationalCosts, OutboundTransaction};

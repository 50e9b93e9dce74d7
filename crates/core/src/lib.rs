//! Core business logic for the TPPB bonded-area system.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! All domain types, validation rules, and calculations live here.
//!
//! # Modules
//!
//! - `customs` - Submission lifecycle and BC documents
//! - `inventory` - Append-only stock movements
//! - `posting` - Financial postings for goods transactions
//! - `ledger` - Running balances and chart-of-accounts reconciliation
//! - `error` - Error taxonomy shared by every module

pub mod customs;
pub mod error;
pub mod inventory;
pub mod ledger;
pub mod posting;

pub use error::{DomainError, DomainResult};

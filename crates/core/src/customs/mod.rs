//! Customs submission lifecycle.
//!
//! This module provides:
//! - Submission, package, item and BC document types
//! - The document-status state machine
//! - Pure builders for approval and rejection side effects

pub mod service;
pub mod state;
pub mod types;

#[cfg(test)]
mod service_props;

pub use service::{ApprovalEffects, PatchPlan, SubmissionService, WAREHOUSE};
pub use state::{SubmissionStateMachine, Transition};
pub use types::{
    CustomsDocument, CustomsDocumentStatus, CustomsStatus, DocumentStatus, Item, NewItem,
    NewPackage, NewSubmission, Package, Submission, SubmissionPatch, SubmissionType,
    TransactionLog, TransactionLogKind,
};

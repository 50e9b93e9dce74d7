//! Document-status state machine for submissions.
//!
//! ```text
//!              ┌──────────► approved
//! pengajuan ───┤
//!              └──────────► rejected
//! ```
//!
//! Repeating the current status is a no-op. Leaving a terminal status is a
//! conflict.

use serde::{Deserialize, Serialize};
use tppb_shared::types::SubmissionId;

use super::types::DocumentStatus;
use crate::error::{DomainError, DomainResult};

/// What an accepted status change does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transition {
    /// pengajuan → approved: create inventory records and an inbound/outbound log.
    Approve,
    /// pengajuan → rejected: create a reject log.
    Reject,
    /// Status unchanged: no side effects.
    NoOp,
}

impl Transition {
    /// Returns true if the transition fires side effects.
    #[must_use]
    pub fn has_side_effects(&self) -> bool {
        !matches!(self, Self::NoOp)
    }
}

/// Stateless transition table.
pub struct SubmissionStateMachine;

impl SubmissionStateMachine {
    /// Resolves a requested status change.
    ///
    /// # Errors
    ///
    /// `StateConflict` when the move leaves a terminal status.
    pub fn transition(
        id: SubmissionId,
        from: DocumentStatus,
        to: DocumentStatus,
    ) -> DomainResult<Transition> {
        match (from, to) {
            (a, b) if a == b => Ok(Transition::NoOp),
            (DocumentStatus::Pengajuan, DocumentStatus::Approved) => Ok(Transition::Approve),
            (DocumentStatus::Pengajuan, DocumentStatus::Rejected) => Ok(Transition::Reject),
            _ => Err(DomainError::conflict(
                "submission",
                id,
                format!("cannot move from {from} to {to}"),
            )),
        }
    }

    /// Packages may only change while customs has not decided.
    ///
    /// # Errors
    ///
    /// `StateConflict` once the status is terminal.
    pub fn ensure_editable(id: SubmissionId, status: DocumentStatus) -> DomainResult<()> {
        if status.is_terminal() {
            return Err(DomainError::conflict(
                "submission",
                id,
                format!("packages cannot change once {status}"),
            ));
        }
        Ok(())
    }
}

//! Domain error taxonomy shared by every TPPB component.
//!
//! Validation and insufficient-stock errors are raised before any write is
//! attempted. Persistence errors come from the store adapter and abort the
//! whole unit of work.

use rust_decimal::Decimal;
use thiserror::Error;

/// Result alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;

/// Errors that can occur in the customs, inventory, posting and ledger core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A required precondition is missing before a side-effecting transition.
    #[error("Validation failed for {entity}: {rule}")]
    Validation {
        /// The entity being validated (e.g. "submission").
        entity: &'static str,
        /// The rule that was violated.
        rule: String,
    },

    /// The target was not found, the transition is illegal, or stored state is inconsistent.
    #[error("State conflict on {entity} {id}: {reason}")]
    StateConflict {
        /// The entity kind.
        entity: &'static str,
        /// The entity identifier (or lookup key).
        id: String,
        /// What went wrong.
        reason: String,
    },

    /// An outbound quantity exceeds the recorded stock.
    #[error("Insufficient stock for {item}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Inventory record id, or item name when no record exists.
        item: String,
        /// Requested quantity.
        requested: Decimal,
        /// Quantity currently in stock.
        available: Decimal,
    },

    /// A journal entry (or posting rule) references an unknown or missing account.
    #[error("Orphan account reference from {reference}: {account}")]
    OrphanReference {
        /// The referring entry id or posting rule.
        reference: String,
        /// The missing account id or code ("<none>" when absent).
        account: String,
    },

    /// The underlying store operation failed.
    #[error("Persistence error: {0}")]
    Persistence(String),
}

impl DomainError {
    /// Shorthand for a validation error.
    pub fn validation(entity: &'static str, rule: impl Into<String>) -> Self {
        Self::Validation {
            entity,
            rule: rule.into(),
        }
    }

    /// Shorthand for a not-found state conflict.
    pub fn not_found(entity: &'static str, id: impl ToString) -> Self {
        Self::StateConflict {
            entity,
            id: id.to_string(),
            reason: "not found".to_string(),
        }
    }

    /// Shorthand for a state conflict.
    pub fn conflict(entity: &'static str, id: impl ToString, reason: impl Into<String>) -> Self {
        Self::StateConflict {
            entity,
            id: id.to_string(),
            reason: reason.into(),
        }
    }

    /// Returns the error code for API responses.
    #[must_use]
    pub fn error_code(&self) -> &'static str {
        match self {
            Self::Validation { .. } => "VALIDATION_ERROR",
            Self::StateConflict { .. } => "STATE_CONFLICT",
            Self::InsufficientStock { .. } => "INSUFFICIENT_STOCK",
            Self::OrphanReference { .. } => "ORPHAN_REFERENCE",
            Self::Persistence(_) => "PERSISTENCE_ERROR",
        }
    }

    /// Returns the HTTP status code an outer layer should map this error to.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Self::Validation { .. } => 400,
            Self::StateConflict { reason, .. } if reason == "not found" => 404,
            Self::StateConflict { .. } => 409,
            Self::InsufficientStock { .. } | Self::OrphanReference { .. } => 422,
            Self::Persistence(_) => 500,
        }
    }

    /// Returns true if this error is a transient I/O failure rather than a data problem.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Persistence(_))
    }
}

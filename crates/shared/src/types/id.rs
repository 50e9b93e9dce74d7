//! Typed IDs for type-safe entity references.
//!
//! Using typed IDs prevents accidentally passing an `InventoryId` where a
//! `SubmissionId` is expected. Every id is a UUID v7, so ids created later
//! sort after ids created earlier.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! typed_ids {
    ($($(#[$meta:meta])* $name:ident;)+) => {$(
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub Uuid);

        impl $name {
            /// Generates a fresh time-ordered id.
            #[must_use]
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Wraps an existing UUID.
            #[must_use]
            pub const fn from_uuid(uuid: Uuid) -> Self {
                Self(uuid)
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<$name> for Uuid {
            fn from(value: $name) -> Self {
                value.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                std::fmt::Display::fmt(&self.0, f)
            }
        }

        impl std::str::FromStr for $name {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Uuid::parse_str(s).map(Self)
            }
        }
    )+};
}

typed_ids! {
    /// A customs submission (pengajuan).
    SubmissionId;
    /// A package inside a submission.
    PackageId;
    /// An item inside a package.
    ItemId;
    /// A BC customs document.
    CustomsDocumentId;
    /// An inventory record.
    InventoryId;
    /// A stock mutation audit entry.
    MutationLogId;
    /// An inbound, outbound or reject transaction log.
    TransactionLogId;
    /// A journal entry.
    JournalEntryId;
    /// A chart of accounts entry.
    AccountId;
}

#[cfg(test)]
#[path = "id_tests.rs"]
mod tests;

//! Mapping between domain types and store documents.

use serde::{Deserialize, Serialize, de::DeserializeOwned};
use serde_json::Value;
use tppb_core::DomainError;
use tppb_core::customs::{CustomsDocument, Submission, TransactionLog};
use tppb_core::inventory::{InventoryRecord, MutationLog};
use tppb_core::ledger::{Account, JournalEntry};

use crate::store::{Collection, StoreError, StoreResult};

/// A domain type stored as a document in one collection.
pub trait Record: Serialize + DeserializeOwned + Send + Sync {
    /// Collection holding this type.
    const COLLECTION: Collection;

    /// Document id.
    fn record_id(&self) -> String;
}

/// Encodes a record into a document.
pub fn encode<R: Record>(record: &R) -> StoreResult<Value> {
    Ok(serde_json::to_value(record)?)
}

/// Decodes a document into a record.
pub fn decode<R: Record>(document: Value) -> StoreResult<R> {
    Ok(serde_json::from_value(document)?)
}

/// Decodes every document of a listing.
pub fn decode_all<R: Record>(documents: Vec<Value>) -> StoreResult<Vec<R>> {
    documents.into_iter().map(decode).collect()
}

impl From<StoreError> for DomainError {
    fn from(err: StoreError) -> Self {
        Self::Persistence(err.to_string())
    }
}

/// A named monotonic counter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counter {
    /// Counter name, e.g. `numbering:BC 2.3` or `journal`.
    pub id: String,
    /// Last value handed out.
    pub value: u64,
}

macro_rules! record {
    ($ty:ty, $collection:expr) => {
        impl Record for $ty {
            const COLLECTION: Collection = $collection;

            fn record_id(&self) -> String {
                self.id.to_string()
            }
        }
    };
}

record!(Submission, Collection::Submissions);
record!(CustomsDocument, Collection::CustomsDocuments);
record!(InventoryRecord, Collection::Inventory);
record!(MutationLog, Collection::MutationLogs);
record!(TransactionLog, Collection::TransactionLogs);
record!(JournalEntry, Collection::JournalEntries);
record!(Account, Collection::Accounts);
record!(Counter, Collection::Counters);

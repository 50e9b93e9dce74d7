//! Abstract document store.
//!
//! Records cross this boundary as JSON documents keyed by a string `id`.
//! `apply_batch` is the only write primitive an implementation must provide;
//! single inserts and updates are batches of one.

use std::collections::BTreeMap;
use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Named collections of documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Collection {
    /// Customs submissions.
    Submissions,
    /// BC documents.
    CustomsDocuments,
    /// Inventory records with their movements.
    Inventory,
    /// Mutation log (movement audit mirror).
    MutationLogs,
    /// Inbound/outbound/reject transaction logs.
    TransactionLogs,
    /// Finance transactions / journal entries.
    JournalEntries,
    /// Chart of accounts.
    Accounts,
    /// Named monotonic counters (document numbering, journal sequence).
    Counters,
}

impl Collection {
    /// Returns the collection name.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Submissions => "submissions",
            Self::CustomsDocuments => "customs_documents",
            Self::Inventory => "inventory",
            Self::MutationLogs => "mutation_logs",
            Self::TransactionLogs => "transaction_logs",
            Self::JournalEntries => "journal_entries",
            Self::Accounts => "accounts",
            Self::Counters => "counters",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Store failures.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No document with this id.
    #[error("{collection}/{id} not found")]
    NotFound {
        /// Collection searched.
        collection: Collection,
        /// Missing id.
        id: String,
    },

    /// Insert of an id that already exists.
    #[error("{collection}/{id} already exists")]
    Duplicate {
        /// Target collection.
        collection: Collection,
        /// Duplicated id.
        id: String,
    },

    /// Document without a string `id` field.
    #[error("document in {0} has no string id")]
    MissingId(Collection),

    /// Document could not be encoded or decoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Snapshot file could not be read or written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The backend refused the operation.
    #[error("Backend error: {0}")]
    Backend(String),
}

/// One write inside a batch.
#[derive(Debug, Clone, PartialEq)]
pub enum WriteOp {
    /// Add a new document.
    Insert {
        /// Target collection.
        collection: Collection,
        /// Document with a string `id` field.
        record: Value,
    },
    /// Merge a JSON merge patch into an existing document.
    Update {
        /// Target collection.
        collection: Collection,
        /// Document id.
        id: String,
        /// Merge patch: objects merge, `null` removes, anything else replaces.
        patch: Value,
    },
}

impl WriteOp {
    /// The collection this write touches.
    #[must_use]
    pub fn collection(&self) -> Collection {
        match self {
            Self::Insert { collection, .. } | Self::Update { collection, .. } => *collection,
        }
    }
}

/// Field-equality filter on top-level document fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Filter {
    fields: Vec<(String, Value)>,
}

impl Filter {
    /// An empty filter matching everything.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an equality condition.
    #[must_use]
    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.push((field.into(), value.into()));
        self
    }

    /// Returns true if every condition holds for `document`.
    #[must_use]
    pub fn matches(&self, document: &Value) -> bool {
        self.fields
            .iter()
            .all(|(field, expected)| document.get(field) == Some(expected))
    }
}

/// Consistent read of several collections.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    tables: BTreeMap<Collection, Vec<Value>>,
}

impl Snapshot {
    /// Builds a snapshot from captured tables.
    #[must_use]
    pub fn new(tables: BTreeMap<Collection, Vec<Value>>) -> Self {
        Self { tables }
    }

    /// Documents of a captured collection, empty if it was not captured.
    #[must_use]
    pub fn get(&self, collection: Collection) -> &[Value] {
        self.tables.get(&collection).map_or(&[], Vec::as_slice)
    }
}

/// Reads the string `id` of a document.
#[must_use]
pub fn document_id(document: &Value) -> Option<&str> {
    document.get("id").and_then(Value::as_str)
}

/// Applies a JSON merge patch (RFC 7396) to `target` in place.
pub fn merge_patch(target: &mut Value, patch: &Value) {
    let Value::Object(patch_fields) = patch else {
        *target = patch.clone();
        return;
    };
    if !target.is_object() {
        *target = Value::Object(serde_json::Map::new());
    }
    if let Value::Object(fields) = target {
        for (key, value) in patch_fields {
            if value.is_null() {
                fields.remove(key);
            } else {
                merge_patch(
                    fields.entry(key.clone()).or_insert(Value::Null),
                    value,
                );
            }
        }
    }
}

/// Persistence interface consumed by the repositories.
#[async_trait]
pub trait Store: Send + Sync + 'static {
    /// Applies every write or none of them.
    async fn apply_batch(&self, ops: Vec<WriteOp>) -> StoreResult<()>;

    /// Documents of a collection in insertion order, optionally filtered.
    async fn select_all(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> StoreResult<Vec<Value>>;

    /// Reads several collections under one consistent view.
    async fn snapshot(&self, collections: &[Collection]) -> StoreResult<Snapshot>;

    /// Inserts one document.
    async fn insert(&self, collection: Collection, record: Value) -> StoreResult<()> {
        self.apply_batch(vec![WriteOp::Insert { collection, record }])
            .await
    }

    /// Merges a patch into one document.
    async fn update_by_id(
        &self,
        collection: Collection,
        id: &str,
        patch: Value,
    ) -> StoreResult<()> {
        self.apply_batch(vec![WriteOp::Update {
            collection,
            id: id.to_string(),
            patch,
        }])
        .await
    }

    /// Looks up one document by id.
    async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let filter = Filter::new().where_eq("id", id);
        Ok(self
            .select_all(collection, Some(&filter))
            .await?
            .into_iter()
            .next())
    }
}

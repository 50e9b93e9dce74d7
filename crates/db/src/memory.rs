//! In-memory transactional store.
//!
//! Tables are shared behind `Arc`s. A batch copies only the tables it
//! touches, applies every write to the copy and swaps the copy in; a failed
//! write leaves the published state as it was. When a snapshot path is set,
//! the new state is written to disk before it is published.

use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;
use tokio::sync::RwLock;
use tracing::{debug, info};

use crate::store::{
    Collection, Filter, Snapshot, Store, StoreError, StoreResult, WriteOp, document_id,
    merge_patch,
};

#[derive(Debug, Clone, Default)]
struct Table {
    rows: Vec<Value>,
    index: HashMap<String, usize>,
}

impl Table {
    fn from_rows(collection: Collection, rows: Vec<Value>) -> StoreResult<Self> {
        let mut table = Self::default();
        for row in rows {
            table.insert(collection, row)?;
        }
        Ok(table)
    }

    fn insert(&mut self, collection: Collection, record: Value) -> StoreResult<()> {
        let id = document_id(&record)
            .ok_or(StoreError::MissingId(collection))?
            .to_string();
        if self.index.contains_key(&id) {
            return Err(StoreError::Duplicate { collection, id });
        }
        self.index.insert(id, self.rows.len());
        self.rows.push(record);
        Ok(())
    }

    fn update(&mut self, collection: Collection, id: &str, patch: &Value) -> StoreResult<()> {
        let position = *self.index.get(id).ok_or_else(|| StoreError::NotFound {
            collection,
            id: id.to_string(),
        })?;
        let row = &mut self.rows[position];
        merge_patch(row, patch);
        if document_id(row) != Some(id) {
            return Err(StoreError::Backend(format!(
                "patch on {collection}/{id} changed the document id"
            )));
        }
        Ok(())
    }

    fn get(&self, id: &str) -> Option<&Value> {
        self.index.get(id).map(|&i| &self.rows[i])
    }
}

type Tables = BTreeMap<Collection, Arc<Table>>;

/// Transactional in-memory [`Store`] with an optional JSON snapshot file.
#[derive(Debug, Default)]
pub struct MemoryStore {
    state: RwLock<Arc<Tables>>,
    snapshot_path: Option<PathBuf>,
}

impl MemoryStore {
    /// Creates an empty store without persistence.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Opens a store backed by a snapshot file, loading it when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file exists but cannot be read or parsed.
    pub async fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let tables = match tokio::fs::read(&path).await {
            Ok(bytes) => {
                let raw: BTreeMap<Collection, Vec<Value>> = serde_json::from_slice(&bytes)?;
                let mut tables = Tables::new();
                for (collection, rows) in raw {
                    tables.insert(collection, Arc::new(Table::from_rows(collection, rows)?));
                }
                info!(path = %path.display(), collections = tables.len(), "loaded store snapshot");
                tables
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Tables::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self {
            state: RwLock::new(Arc::new(tables)),
            snapshot_path: Some(path),
        })
    }

    /// Path of the snapshot file, if any.
    #[must_use]
    pub fn snapshot_path(&self) -> Option<&Path> {
        self.snapshot_path.as_deref()
    }

    async fn persist(path: &Path, tables: &Tables) -> StoreResult<()> {
        let raw: BTreeMap<Collection, &Vec<Value>> =
            tables.iter().map(|(c, t)| (*c, &t.rows)).collect();
        let bytes = serde_json::to_vec_pretty(&raw)?;
        let tmp = path.with_extension("tmp");
        tokio::fs::write(&tmp, bytes).await?;
        tokio::fs::rename(&tmp, path).await?;
        Ok(())
    }
}

#[async_trait]
impl Store for MemoryStore {
    async fn apply_batch(&self, ops: Vec<WriteOp>) -> StoreResult<()> {
        if ops.is_empty() {
            return Ok(());
        }
        let mut state = self.state.write().await;
        let mut next: Tables = (**state).clone();
        let count = ops.len();

        for op in ops {
            match op {
                WriteOp::Insert { collection, record } => {
                    Arc::make_mut(next.entry(collection).or_default()).insert(collection, record)?;
                }
                WriteOp::Update {
                    collection,
                    id,
                    patch,
                } => {
                    let table = next.get_mut(&collection).ok_or_else(|| StoreError::NotFound {
                        collection,
                        id: id.clone(),
                    })?;
                    Arc::make_mut(table).update(collection, &id, &patch)?;
                }
            }
        }

        if let Some(path) = &self.snapshot_path {
            Self::persist(path, &next).await?;
        }
        *state = Arc::new(next);
        debug!(writes = count, "batch committed");
        Ok(())
    }

    async fn select_all(
        &self,
        collection: Collection,
        filter: Option<&Filter>,
    ) -> StoreResult<Vec<Value>> {
        let state = Arc::clone(&*self.state.read().await);
        Ok(state.get(&collection).map_or_else(Vec::new, |table| {
            table
                .rows
                .iter()
                .filter(|row| filter.is_none_or(|f| f.matches(row)))
                .cloned()
                .collect()
        }))
    }

    async fn snapshot(&self, collections: &[Collection]) -> StoreResult<Snapshot> {
        let state = Arc::clone(&*self.state.read().await);
        let tables = collections
            .iter()
            .map(|c| {
                let rows = state.get(c).map(|t| t.rows.clone()).unwrap_or_default();
                (*c, rows)
            })
            .collect();
        Ok(Snapshot::new(tables))
    }

    async fn find_by_id(&self, collection: Collection, id: &str) -> StoreResult<Option<Value>> {
        let state = Arc::clone(&*self.state.read().await);
        Ok(state
            .get(&collection)
            .and_then(|table| table.get(id))
            .cloned())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;

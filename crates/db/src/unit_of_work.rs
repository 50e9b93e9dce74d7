//! Buffered writes committed as one batch.

use tracing::debug;

use crate::record::{Counter, Record, encode};
use crate::store::{Collection, Store, StoreResult, WriteOp};

/// Collects writes and commits them through [`Store::apply_batch`].
#[derive(Debug, Default)]
pub struct UnitOfWork {
    ops: Vec<WriteOp>,
}

impl UnitOfWork {
    /// Creates an empty unit.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Stages an insert.
    pub fn insert<R: Record>(&mut self, record: &R) -> StoreResult<()> {
        self.ops.push(WriteOp::Insert {
            collection: R::COLLECTION,
            record: encode(record)?,
        });
        Ok(())
    }

    /// Stages a full-document update.
    pub fn update<R: Record>(&mut self, record: &R) -> StoreResult<()> {
        self.ops.push(WriteOp::Update {
            collection: R::COLLECTION,
            id: record.record_id(),
            patch: encode(record)?,
        });
        Ok(())
    }

    /// Stages a counter write, inserting it when it did not exist.
    pub fn counter(&mut self, sequence: &Sequence) -> StoreResult<()> {
        if !sequence.dirty() {
            return Ok(());
        }
        let counter = Counter {
            id: sequence.name.clone(),
            value: sequence.current,
        };
        if sequence.existed {
            self.update(&counter)
        } else {
            self.insert(&counter)
        }
    }

    /// Number of staged writes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    /// Returns true if nothing is staged.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// Commits every staged write atomically.
    pub async fn commit<S: Store + ?Sized>(self, store: &S) -> StoreResult<()> {
        debug!(writes = self.ops.len(), "committing unit of work");
        store.apply_batch(self.ops).await
    }
}

/// A counter read under its lock and advanced locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sequence {
    name: String,
    start: u64,
    current: u64,
    existed: bool,
}

impl Sequence {
    /// Counter name for a BC document type.
    #[must_use]
    pub fn numbering_key(doc_type: &str) -> String {
        format!("numbering:{doc_type}")
    }

    /// Counter name for the journal entry sequence.
    pub const JOURNAL: &'static str = "journal";

    /// Reads the counter's current value (zero when absent).
    pub async fn load<S: Store + ?Sized>(store: &S, name: &str) -> StoreResult<Self> {
        let existing = store.find_by_id(Collection::Counters, name).await?;
        let (start, existed) = match existing {
            Some(doc) => (crate::record::decode::<Counter>(doc)?.value, true),
            None => (0, false),
        };
        Ok(Self {
            name: name.to_string(),
            start,
            current: start,
            existed,
        })
    }

    /// Hands out the next value.
    pub fn next_value(&mut self) -> u64 {
        self.current += 1;
        self.current
    }

    /// Returns true if a value was handed out since loading.
    #[must_use]
    pub fn dirty(&self) -> bool {
        self.current != self.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::MemoryStore;

    #[tokio::test]
    async fn test_sequence_persists_through_unit_of_work() {
        let store = MemoryStore::new();

        let mut seq = Sequence::load(&store, Sequence::JOURNAL).await.unwrap();
        assert_eq!(seq.next_value(), 1);
        assert_eq!(seq.next_value(), 2);
        let mut uow = UnitOfWork::new();
        uow.counter(&seq).unwrap();
        assert_eq!(uow.len(), 1);
        uow.commit(&store).await.unwrap();

        let mut seq = Sequence::load(&store, Sequence::JOURNAL).await.unwrap();
        assert_eq!(seq.next_value(), 3);
        let mut uow = UnitOfWork::new();
        uow.counter(&seq).unwrap();
        uow.commit(&store).await.unwrap();

        let seq = Sequence::load(&store, Sequence::JOURNAL).await.unwrap();
        assert_eq!(seq.current, 3);
    }

    #[tokio::test]
    async fn test_untouched_sequence_stages_nothing() {
        let store = MemoryStore::new();
        let seq = Sequence::load(&store, &Sequence::numbering_key("BC 2.3"))
            .await
            .unwrap();
        let mut uow = UnitOfWork::new();
        uow.counter(&seq).unwrap();
        assert!(uow.is_empty());
    }
}

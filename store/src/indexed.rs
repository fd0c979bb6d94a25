//! Records stored under derived keys plus one all-ids index record.
//!
//! Each record is kept under `prefix ++ id`. A single [`StringList`] under the
//! key space's index key lists every saved id in insertion order, so the
//! whole set can be listed without scanning the keyspace.
//!
//! Mutations of one store are serialized by an internal writer lock, and the
//! record write and index rewrite reach the engine as one atomic batch. Two
//! store instances over the same area are not coordinated.

use std::marker::PhantomData;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::codec;
use crate::{BatchOp, IndexState, KeySpace, KeyValueEngine, Record, StoreError, StringList};

pub struct IndexedRecordStore<E, R> {
    engine: Arc<E>,
    area: String,
    keys: KeySpace,
    write_lock: Mutex<()>,
    _record: PhantomData<fn() -> R>,
}

impl<E: KeyValueEngine, R: Record> IndexedRecordStore<E, R> {
    pub fn new(engine: Arc<E>, area: impl Into<String>, keys: KeySpace) -> Self {
        Self {
            engine,
            area: area.into(),
            keys,
            write_lock: Mutex::new(()),
            _record: PhantomData,
        }
    }

    pub fn key_space(&self) -> &KeySpace {
        &self.keys
    }

    pub fn engine(&self) -> &Arc<E> {
        &self.engine
    }

    /// Persist `record` and make sure its id is indexed.
    ///
    /// Returns `Ok(1)` when the write was applied and `Ok(0)` when the record
    /// has an empty id or the engine declined the write. A declined write
    /// leaves both the record and the index untouched.
    pub fn save(&self, record: &R) -> Result<usize, StoreError> {
        let id = record.record_id();
        if id.is_empty() {
            tracing::debug!(area = %self.area, "ignoring record with empty id");
            return Ok(0);
        }
        let record_key = self.keys.record_key(id);
        let value = codec::encode(record)?;

        let _guard = self.lock_writes();
        let applied = match self.index()? {
            IndexState::Initialized(ids) if ids.iter().any(|known| known == id) => {
                self.engine.put(&self.area, &record_key, &value)?
            }
            state => {
                let mut ids = match state {
                    IndexState::Initialized(ids) => ids,
                    IndexState::Uninitialized => Vec::with_capacity(1),
                };
                ids.push(id.to_string());
                let index = codec::encode(&StringList::new(ids))?;
                let ops = [
                    BatchOp::put(record_key, value),
                    BatchOp::put(self.keys.index_key(), index),
                ];
                self.engine.write_batch(&self.area, &ops)?
            }
        };

        if applied {
            tracing::trace!(area = %self.area, id, "record saved");
            Ok(1)
        } else {
            tracing::warn!(area = %self.area, id, "engine declined record write");
            Ok(0)
        }
    }

    /// Point lookup by id. Does not consult the index.
    pub fn find_by_id(&self, id: &str) -> Result<Option<R>, StoreError> {
        codec::get_model(&*self.engine, &self.area, &self.keys.record_key(id))
    }

    /// Remove the record and drop its id from the index.
    ///
    /// With no index yet, only the record key is deleted.
    pub fn delete_by_id(&self, id: &str) -> Result<(), StoreError> {
        let record_key = self.keys.record_key(id);

        let _guard = self.lock_writes();
        match self.index()? {
            IndexState::Uninitialized => {
                tracing::warn!(area = %self.area, id, "deleting record with no index present");
                self.engine.delete(&self.area, &record_key)
            }
            IndexState::Initialized(mut ids) => {
                if let Some(pos) = ids.iter().position(|known| known == id) {
                    ids.remove(pos);
                }
                let index = codec::encode(&StringList::new(ids))?;
                let ops = [
                    BatchOp::delete(record_key),
                    BatchOp::put(self.keys.index_key(), index),
                ];
                if self.engine.write_batch(&self.area, &ops)? {
                    tracing::trace!(area = %self.area, id, "record deleted");
                    Ok(())
                } else {
                    Err(StoreError::Backend(format!(
                        "engine declined delete of '{}' in area '{}'",
                        id, self.area
                    )))
                }
            }
        }
    }

    /// Every indexed record in insertion order, or `None` if nothing was
    /// ever saved.
    ///
    /// Ids whose record has gone missing are skipped with a warning.
    pub fn find_all(&self) -> Result<Option<Vec<R>>, StoreError> {
        let ids = match self.index()? {
            IndexState::Initialized(ids) => ids,
            IndexState::Uninitialized => return Ok(None),
        };
        let mut records = Vec::with_capacity(ids.len());
        for id in &ids {
            match self.find_by_id(id)? {
                Some(record) => records.push(record),
                None => {
                    tracing::warn!(area = %self.area, id = %id, "index lists a missing record, skipping");
                }
            }
        }
        Ok(Some(records))
    }

    /// Read the all-ids index.
    pub fn index(&self) -> Result<IndexState, StoreError> {
        let list: Option<StringList> =
            codec::get_model(&*self.engine, &self.area, self.keys.index_key())?;
        Ok(IndexState::from(list))
    }

    pub fn contains(&self, id: &str) -> Result<bool, StoreError> {
        Ok(self.index()?.contains(id))
    }

    /// Number of indexed ids.
    pub fn len(&self) -> Result<usize, StoreError> {
        Ok(self.index()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, StoreError> {
        Ok(self.len()? == 0)
    }

    fn lock_writes(&self) -> MutexGuard<'_, ()> {
        // The guarded data is `()`, so a poisoned lock carries no broken state.
        self.write_lock.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

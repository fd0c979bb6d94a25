//! Nullable store: thread-safe in-memory key-value engine for testing.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

use xbridge_store::{BatchOp, KeyValueEngine, StoreError};

type AreaKey = (String, Vec<u8>);

/// An in-memory [`KeyValueEngine`] for testing.
///
/// Writes can be made to be declined ([`NullEngine::reject_writes`]) or every
/// call can be made to fail ([`NullEngine::fail_io`]). The `*_raw` methods
/// touch storage directly, bypassing whatever store sits on top.
pub struct NullEngine {
    entries: Mutex<HashMap<AreaKey, Vec<u8>>>,
    reject_writes: AtomicBool,
    fail_io: AtomicBool,
}

impl NullEngine {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(HashMap::new()),
            reject_writes: AtomicBool::new(false),
            fail_io: AtomicBool::new(false),
        }
    }

    /// Make `put` and `write_batch` report `Ok(false)` without applying anything.
    pub fn reject_writes(&self, reject: bool) {
        self.reject_writes.store(reject, Ordering::SeqCst);
    }

    /// Make every engine call fail with [`StoreError::Backend`].
    pub fn fail_io(&self, fail: bool) {
        self.fail_io.store(fail, Ordering::SeqCst);
    }

    pub fn insert_raw(&self, area: &str, key: &[u8], value: &[u8]) {
        self.entries
            .lock()
            .unwrap()
            .insert((area.to_string(), key.to_vec()), value.to_vec());
    }

    pub fn remove_raw(&self, area: &str, key: &[u8]) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap()
            .remove(&(area.to_string(), key.to_vec()))
    }

    pub fn get_raw(&self, area: &str, key: &[u8]) -> Option<Vec<u8>> {
        self.entries
            .lock()
            .unwrap()
            .get(&(area.to_string(), key.to_vec()))
            .cloned()
    }

    /// Number of stored entries across all areas.
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of stored entries in one area.
    pub fn area_len(&self, area: &str) -> usize {
        self.entries
            .lock()
            .unwrap()
            .keys()
            .filter(|(a, _)| a == area)
            .count()
    }

    fn check_io(&self) -> Result<(), StoreError> {
        if self.fail_io.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("null engine I/O failure".to_string()));
        }
        Ok(())
    }

    fn writes_rejected(&self) -> bool {
        self.reject_writes.load(Ordering::SeqCst)
    }
}

impl Default for NullEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueEngine for NullEngine {
    fn get(&self, area: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError> {
        self.check_io()?;
        Ok(self.get_raw(area, key))
    }

    fn put(&self, area: &str, key: &[u8], value: &[u8]) -> Result<bool, StoreError> {
        self.check_io()?;
        if self.writes_rejected() {
            return Ok(false);
        }
        self.insert_raw(area, key, value);
        Ok(true)
    }

    fn delete(&self, area: &str, key: &[u8]) -> Result<(), StoreError> {
        self.check_io()?;
        self.remove_raw(area, key);
        Ok(())
    }

    fn write_batch(&self, area: &str, ops: &[BatchOp]) -> Result<bool, StoreError> {
        self.check_io()?;
        if self.writes_rejected() {
            return Ok(false);
        }
        let mut entries = self.entries.lock().unwrap();
        for op in ops {
            match op {
                BatchOp::Put { key, value } => {
                    entries.insert((area.to_string(), key.clone()), value.clone());
                }
                BatchOp::Delete { key } => {
                    entries.remove(&(area.to_string(), key.clone()));
                }
            }
        }
        Ok(true)
    }
}

//! The key-value engine capability.

use crate::StoreError;

/// A single mutation inside an atomic [`KeyValueEngine::write_batch`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum BatchOp {
    Put { key: Vec<u8>, value: Vec<u8> },
    Delete { key: Vec<u8> },
}

impl BatchOp {
    pub fn put(key: impl Into<Vec<u8>>, value: impl Into<Vec<u8>>) -> Self {
        Self::Put {
            key: key.into(),
            value: value.into(),
        }
    }

    pub fn delete(key: impl Into<Vec<u8>>) -> Self {
        Self::Delete { key: key.into() }
    }
}

/// An embedded key-value store partitioned into named areas.
///
/// Single-key operations are atomic. Missing keys read as `Ok(None)`, never
/// as an error. `put` and `write_batch` return `Ok(false)` when the engine
/// declined the write without an I/O failure; nothing was applied in that case.
pub trait KeyValueEngine: Send + Sync {
    /// Read the value stored under `key` in `area`.
    fn get(&self, area: &str, key: &[u8]) -> Result<Option<Vec<u8>>, StoreError>;

    /// Store `value` under `key` in `area`, replacing any previous value.
    fn put(&self, area: &str, key: &[u8], value: &[u8]) -> Result<bool, StoreError>;

    /// Remove `key` from `area`. Removing a missing key is not an error.
    fn delete(&self, area: &str, key: &[u8]) -> Result<(), StoreError>;

    /// Apply every op in `ops` to `area` as one all-or-nothing unit.
    fn write_batch(&self, area: &str, ops: &[BatchOp]) -> Result<bool, StoreError>;
}

//! Storage key layout for one record type.
//!
//! Record keys are `prefix ++ id`; the index lives under a single fixed key
//! that can never be produced by the prefix scheme.

use crate::StoreError;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeySpace {
    prefix: String,
    index_key: String,
}

impl KeySpace {
    /// Build a key space, rejecting an index key that a record id could reproduce.
    pub fn new(prefix: impl Into<String>, index_key: impl Into<String>) -> Result<Self, StoreError> {
        let prefix = prefix.into();
        let index_key = index_key.into();
        if prefix.is_empty() {
            return Err(StoreError::InvalidKeySpace(
                "record prefix must not be empty".to_string(),
            ));
        }
        if index_key.starts_with(&prefix) {
            return Err(StoreError::InvalidKeySpace(format!(
                "index key '{}' collides with record prefix '{}'",
                index_key, prefix
            )));
        }
        Ok(Self { prefix, index_key })
    }

    /// Storage key of the record with the given id.
    pub fn record_key(&self, id: &str) -> Vec<u8> {
        let mut key = Vec::with_capacity(self.prefix.len() + id.len());
        key.extend_from_slice(self.prefix.as_bytes());
        key.extend_from_slice(id.as_bytes());
        key
    }

    /// Storage key of the all-ids index.
    pub fn index_key(&self) -> &[u8] {
        self.index_key.as_bytes()
    }
}

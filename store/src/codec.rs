//! Typed value access on top of a [`KeyValueEngine`], using bincode.

use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::{KeyValueEngine, StoreError};

pub fn encode<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, StoreError> {
    Ok(bincode::serialize(value)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, StoreError> {
    Ok(bincode::deserialize(bytes)?)
}

/// Read and decode the value under `key`; `Ok(None)` when missing.
pub fn get_model<E, T>(engine: &E, area: &str, key: &[u8]) -> Result<Option<T>, StoreError>
where
    E: KeyValueEngine + ?Sized,
    T: DeserializeOwned,
{
    engine
        .get(area, key)?
        .map(|bytes| decode(&bytes))
        .transpose()
}

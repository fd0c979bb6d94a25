//! Records persisted by an [`IndexedRecordStore`](crate::IndexedRecordStore).

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A serializable value identified by a unique string id (e.g. a transaction hash).
pub trait Record: Serialize + DeserializeOwned {
    fn record_id(&self) -> &str;
}

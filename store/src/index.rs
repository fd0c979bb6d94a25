//! The all-ids index record.

use serde::{Deserialize, Serialize};

/// Serialized form of the index: record ids in insertion order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StringList {
    pub collection: Vec<String>,
}

impl StringList {
    pub fn new(collection: Vec<String>) -> Self {
        Self { collection }
    }
}

/// Result of reading the index.
///
/// `Uninitialized` means no record was ever saved in this area; it is not the
/// same as an index that became empty after deletes.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum IndexState {
    Initialized(Vec<String>),
    Uninitialized,
}

impl IndexState {
    pub fn is_initialized(&self) -> bool {
        matches!(self, Self::Initialized(_))
    }

    /// Indexed ids in insertion order (empty when uninitialized).
    pub fn ids(&self) -> &[String] {
        match self {
            Self::Initialized(ids) => ids,
            Self::Uninitialized => &[],
        }
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids().iter().any(|known| known == id)
    }

    pub fn len(&self) -> usize {
        self.ids().len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids().is_empty()
    }
}

impl From<Option<StringList>> for IndexState {
    fn from(list: Option<StringList>) -> Self {
        match list {
            Some(list) => Self::Initialized(list.collection),
            None => Self::Uninitialized,
        }
    }
}
